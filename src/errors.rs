use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::models::auth::Cause;
use crate::services::auth_service::AuthError;
use crate::services::authorizer::AuthorizeError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(Cause),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Something went wrong, please try again later.")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<AuthorizeError> for ApiError {
    fn from(err: AuthorizeError) -> Self {
        error!(error = %err, "authorization failed unexpectedly");
        ApiError::Internal
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::BadRequest(err.to_string()),
            AuthError::UserNotFound => ApiError::BadRequest(err.to_string()),
            AuthError::UserAlreadyExists => ApiError::Conflict(err.to_string()),
            AuthError::PasswordHashError(_) | AuthError::TokenError(_) | AuthError::Store(_) => {
                error!(error = %err, "account operation failed");
                ApiError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreError;

    #[test]
    fn test_store_errors_map_to_status() {
        let status = |err: StoreError| ApiError::from(AuthError::from(err)).into_response().status();

        assert_eq!(status(StoreError::UserAlreadyExists), StatusCode::CONFLICT);
        assert_eq!(status(StoreError::UserNotFound), StatusCode::BAD_REQUEST);
        assert_eq!(status(StoreError::GroupAlreadyExists), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unauthorized_carries_cause() {
        let err = ApiError::Unauthorized(Cause::MismatchedUsers);
        assert_eq!(err.to_string(), "Mismatched users");
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
