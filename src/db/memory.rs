use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::models::user::{Group, User};

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("user not found")]
    UserNotFound,
    #[error("group already exists")]
    GroupAlreadyExists,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>, // keyed by email
    groups: HashMap<String, Group>,
}

/// Process-local account storage shared by all request handlers.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn add_user(&self, user: User) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let taken = inner
            .users
            .values()
            .any(|u| u.email == user.email || u.username == user.username);
        if taken {
            warn!("Rejected duplicate user");
            return Err(StoreError::UserAlreadyExists);
        }
        info!(username = %user.username, "Stored new user");
        inner.users.insert(user.email.clone(), user);
        Ok(())
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.inner.read().await.users.get(email).cloned()
    }

    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    pub async fn find_by_refresh_token(&self, token: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.refresh_token.as_deref() == Some(token))
            .cloned()
    }

    pub async fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.inner.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }

    #[instrument(skip(self, token))]
    pub async fn set_refresh_token(&self, email: &str, token: Option<String>) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(email).ok_or(StoreError::UserNotFound)?;
        user.refresh_token = token;
        Ok(())
    }

    #[instrument(skip(self, group), fields(name = %group.name))]
    pub async fn add_group(&self, group: Group) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.groups.contains_key(&group.name) {
            return Err(StoreError::GroupAlreadyExists);
        }
        info!(members = group.member_emails.len(), "Stored new group");
        inner.groups.insert(group.name.clone(), group);
        Ok(())
    }

    pub async fn find_group(&self, name: &str) -> Option<Group> {
        self.inner.read().await.groups.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::REGULAR_ROLE;

    fn user(username: &str, email: &str) -> User {
        User::new(username, email, "hash".to_string(), REGULAR_ROLE)
    }

    #[tokio::test]
    async fn test_add_user_rejects_duplicates() {
        let store = MemoryStore::new();
        assert_eq!(Ok(()), store.add_user(user("tester", "tester@test.com")).await);
        assert_eq!(
            Err(StoreError::UserAlreadyExists),
            store.add_user(user("tester", "other@test.com")).await
        );
        assert_eq!(
            Err(StoreError::UserAlreadyExists),
            store.add_user(user("other", "tester@test.com")).await
        );
    }

    #[tokio::test]
    async fn test_refresh_token_lookup() {
        let store = MemoryStore::new();
        store.add_user(user("tester", "tester@test.com")).await.unwrap();
        store
            .set_refresh_token("tester@test.com", Some("abc".to_string()))
            .await
            .unwrap();

        let found = store.find_by_refresh_token("abc").await.unwrap();
        assert_eq!(found.username, "tester");

        store.set_refresh_token("tester@test.com", None).await.unwrap();
        assert!(store.find_by_refresh_token("abc").await.is_none());
        assert_eq!(
            Err(StoreError::UserNotFound),
            store.set_refresh_token("nobody@test.com", None).await
        );
    }
}
