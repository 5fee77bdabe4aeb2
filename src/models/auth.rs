use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

pub const ADMIN_ROLE: &str = "Admin";
pub const REGULAR_ROLE: &str = "Regular";

/// Authorization mode requested by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AuthType {
    Simple,
    User,
    Admin,
    Group,
    Unknown(String),
}

impl From<&str> for AuthType {
    fn from(value: &str) -> Self {
        match value {
            "Simple" => AuthType::Simple,
            "User" => AuthType::User,
            "Admin" => AuthType::Admin,
            "Group" => AuthType::Group,
            other => AuthType::Unknown(other.to_string()),
        }
    }
}

impl From<String> for AuthType {
    fn from(value: String) -> Self {
        AuthType::from(value.as_str())
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthType::Simple => f.write_str("Simple"),
            AuthType::User => f.write_str("User"),
            AuthType::Admin => f.write_str("Admin"),
            AuthType::Group => f.write_str("Group"),
            AuthType::Unknown(other) => f.write_str(other),
        }
    }
}

/// `username` only matters for [`AuthType::User`], `emails` only for
/// [`AuthType::Group`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub auth_type: AuthType,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
}

impl AuthRequest {
    pub fn simple() -> Self {
        Self::of(AuthType::Simple)
    }

    pub fn admin() -> Self {
        Self::of(AuthType::Admin)
    }

    pub fn user(username: &str) -> Self {
        Self {
            username: Some(username.to_string()),
            ..Self::of(AuthType::User)
        }
    }

    pub fn group<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            emails: emails.into_iter().map(Into::into).collect(),
            ..Self::of(AuthType::Group)
        }
    }

    pub fn of(auth_type: AuthType) -> Self {
        Self {
            auth_type,
            username: None,
            emails: Vec::new(),
        }
    }
}

/// Raw values of the two token cookies, as found on the request.
#[derive(Debug, Clone, Default)]
pub struct TokenCookies {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl TokenCookies {
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }
}

/// Why a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFault {
    Expired,
    InvalidSignature,
    Malformed,
    Immature,
}

impl fmt::Display for TokenFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenFault::Expired => f.write_str("TokenExpiredError"),
            TokenFault::InvalidSignature | TokenFault::Malformed => f.write_str("JsonWebTokenError"),
            TokenFault::Immature => f.write_str("NotBeforeError"),
        }
    }
}

/// Closed set of outcomes; the strings produced by `Display` are part of the
/// public contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    Authorized,
    Unauthorized,
    MissingInformation,
    MismatchedUsers,
    InvalidAuthType,
    LoginAgain,
    Token(TokenFault),
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Authorized => f.write_str("Authorized"),
            Cause::Unauthorized => f.write_str("Unauthorized"),
            Cause::MissingInformation => f.write_str("Token is missing information"),
            Cause::MismatchedUsers => f.write_str("Mismatched users"),
            Cause::InvalidAuthType => f.write_str("Invalid authType"),
            Cause::LoginAgain => f.write_str("Perform login again"),
            Cause::Token(fault) => fault.fmt(f),
        }
    }
}

impl Serialize for Cause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResult {
    pub authorized: bool,
    pub cause: Cause,
}

impl AuthResult {
    pub fn granted() -> Self {
        Self {
            authorized: true,
            cause: Cause::Authorized,
        }
    }

    pub fn denied(cause: Cause) -> Self {
        Self {
            authorized: false,
            cause,
        }
    }
}
