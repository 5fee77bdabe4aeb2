use bcrypt::{hash, verify};
use thiserror::Error;
use tracing::{info, instrument};

use crate::db::{MemoryStore, StoreError};
use crate::models::jwt::TokenPair;
use crate::models::user::User;
use crate::services::jwt_service::JwtService;

#[derive(Clone)]
pub struct AuthService {
    store: MemoryStore,
    jwt_service: JwtService,
    bcrypt_cost: u32,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("wrong credentials")]
    InvalidCredentials,
    #[error("user not found")]
    UserNotFound,
    #[error("you are already registered")]
    UserAlreadyExists,
    #[error("password hashing failed")]
    PasswordHashError(#[from] bcrypt::BcryptError),
    #[error("token signing failed")]
    TokenError(#[from] jsonwebtoken::errors::Error),
    #[error("unexpected store failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserAlreadyExists => AuthError::UserAlreadyExists,
            StoreError::UserNotFound => AuthError::UserNotFound,
            other => AuthError::Store(other),
        }
    }
}

impl AuthService {
    pub fn new(store: MemoryStore, jwt_service: JwtService, bcrypt_cost: u32) -> Self {
        Self {
            store,
            jwt_service,
            bcrypt_cost,
        }
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.jwt_service.refresh_ttl_secs()
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        // Find user by email
        let user = self
            .store
            .find_by_email(email)
            .await
            .ok_or(AuthError::UserNotFound)?;

        // Verify password
        if !verify(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.jwt_service.create_tokens(&user.claims())?;

        // Keep the refresh token on the account so logout can revoke it
        self.store
            .set_refresh_token(&user.email, Some(tokens.refresh_token.clone()))
            .await?;

        info!(username = %user.username, "User logged in");
        Ok(tokens)
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<User, AuthError> {
        let password_hash = hash(password, self.bcrypt_cost)?;
        let user = User::new(username, email, password_hash, role);
        self.store.add_user(user.clone()).await?;

        Ok(user)
    }

    /// Forget the stored refresh token of whoever owns `refresh_token`.
    #[instrument(skip_all)]
    pub async fn logout(&self, refresh_token: &str) -> Result<User, AuthError> {
        let user = self
            .store
            .find_by_refresh_token(refresh_token)
            .await
            .ok_or(AuthError::UserNotFound)?;

        self.store.set_refresh_token(&user.email, None).await?;

        info!(username = %user.username, "User logged out");
        Ok(user)
    }
}
