// src/models/jwt.rs
use chrono::{Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identity payload carried by both the access and the refresh token.
///
/// Fields decode to empty strings when absent or null so that an incomplete
/// token still decodes and can be rejected with a precise cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserClaims {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub role: String,
    // passed through on renewal, never inspected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<serde_json::Value>,
}

impl UserClaims {
    pub fn new(email: &str, username: &str, role: &str) -> Self {
        Self {
            email: email.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            groups: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.email.is_empty() && !self.role.is_empty()
    }

    /// Field-by-field identity comparison; `groups` does not take part.
    pub fn same_identity(&self, other: &UserClaims) -> bool {
        self.username == other.username && self.email == other.email && self.role == other.role
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub user: UserClaims,
    pub exp: i64, // expiration time
    // issued at; tokens from other signers may leave it out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenClaims {
    pub fn new(user: UserClaims, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = now + ttl;

        Self {
            user,
            exp: expires_at.timestamp(),
            iat: Some(now.timestamp()),
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
