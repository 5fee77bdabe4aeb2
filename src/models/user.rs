use serde::Serialize;

use crate::models::jwt::UserClaims;

#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub refresh_token: Option<String>,
}

impl User {
    pub fn new(username: &str, email: &str, password_hash: String, role: &str) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            role: role.to_string(),
            refresh_token: None,
        }
    }

    pub fn claims(&self) -> UserClaims {
        UserClaims::new(&self.email, &self.username, &self.role)
    }
}

/// Public projection of a [`User`], without credentials.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    pub member_emails: Vec<String>,
}
