use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_cookies::Cookies;

use crate::{
    errors::ApiError,
    models::auth::{ADMIN_ROLE, REGULAR_ROLE},
    services::cookie_service::{CookieService, REFRESH_TOKEN_COOKIE},
    AppState,
};

#[derive(Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let fields = [&self.username, &self.email, &self.password];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ApiError::BadRequest("Missing or empty attributes".to_string()));
        }
        if !self.email.contains('@') {
            return Err(ApiError::BadRequest("Invalid email format".to_string()));
        }
        Ok(())
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    create_account(&state, payload, REGULAR_ROLE).await
}

pub async fn register_admin(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    create_account(&state, payload, ADMIN_ROLE).await
}

async fn create_account(
    state: &AppState,
    payload: RegisterRequest,
    role: &str,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    payload.validate()?;
    state
        .auth_service
        .register(&payload.username, &payload.email, &payload.password, role)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "data": { "message": "User added successfully" } })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest("Missing or empty attributes".to_string()));
    }

    let tokens = state.auth_service.login(&payload.email, &payload.password).await?;
    for cookie in CookieService::login_cookies(&tokens, state.auth_service.refresh_ttl_secs()) {
        cookies.add(cookie);
    }

    Ok(Json(json!({ "data": tokens })))
}

pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Result<Json<Value>, ApiError> {
    let refresh_token = cookies
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::BadRequest("Refresh token missing".to_string()))?;

    state.auth_service.logout(&refresh_token).await?;
    for cookie in CookieService::removal_cookies() {
        cookies.add(cookie);
    }

    Ok(Json(json!({ "data": { "message": "User logged out" } })))
}
