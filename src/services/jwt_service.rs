// src/services/jwt_service.rs
use crate::models::auth::TokenFault;
use crate::models::jwt::{TokenClaims, TokenPair, UserClaims};
use crate::utils::Config;

use chrono::Duration;
use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use tracing::{debug, instrument};

/// Signs and verifies the HS256 access/refresh tokens with one shared secret.
#[derive(Clone)]
pub struct JwtService {
    enc_key: EncodingKey,
    dec_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtService {
    pub fn new(config: &Config) -> Self {
        let enc_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let dec_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        Self {
            enc_key,
            dec_key,
            access_ttl: Duration::seconds(config.access_ttl_secs),
            refresh_ttl: Duration::seconds(config.refresh_ttl_secs),
        }
    }

    /* ---------- PUBLIC API ---------- */

    /// Sign a fresh access/refresh pair carrying the same identity claims.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub fn create_tokens(&self, user: &UserClaims) -> Result<TokenPair, JwtError> {
        let access_token = self.create_access_token(user)?;
        let refresh_token = self.create_jwt(&TokenClaims::new(user.clone(), self.refresh_ttl))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Sign a short-lived access token only.
    pub fn create_access_token(&self, user: &UserClaims) -> Result<String, JwtError> {
        self.create_jwt(&TokenClaims::new(user.clone(), self.access_ttl))
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl.num_seconds()
    }

    /// Verify signature and expiry, then hand back the claims.
    /// Expiry is enforced with no leeway.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenFault> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.dec_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                classify(&e)
            })
    }

    /* ---------- PRIVATE HELPERS ---------- */

    fn create_jwt<T: serde::Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.enc_key)
    }
}

fn classify(err: &JwtError) -> TokenFault {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenFault::Expired,
        ErrorKind::InvalidSignature => TokenFault::InvalidSignature,
        ErrorKind::ImmatureSignature => TokenFault::Immature,
        _ => TokenFault::Malformed,
    }
}
