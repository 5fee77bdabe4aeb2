use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::Serialize;
use tower_cookies::Cookies;

use crate::{
    errors::ApiError,
    middleware::auth::{authorize, authorize_any, AuthContext},
    models::auth::AuthRequest,
    models::jwt::UserClaims,
    models::user::UserView,
    AppState,
};

/// Envelope shared by every protected endpoint.
#[derive(Serialize)]
pub struct DataResponse<T> {
    pub data: T,
    #[serde(rename = "refreshedTokenMessage", skip_serializing_if = "Option::is_none")]
    pub refreshed_token_message: Option<String>,
}

impl<T> DataResponse<T> {
    pub fn new(data: T, context: AuthContext) -> Self {
        Self {
            data,
            refreshed_token_message: context.refreshed_token_message,
        }
    }
}

pub async fn get_current_user(Extension(context): Extension<AuthContext>) -> Json<DataResponse<UserClaims>> {
    let identity = context.identity.clone();
    Json(DataResponse::new(identity, context))
}

pub async fn list_users(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<DataResponse<Vec<UserView>>>, ApiError> {
    let context = authorize(&state, &cookies, AuthRequest::admin())?;

    let users = state.store.list_users().await;
    let users = users.iter().map(UserView::from).collect();

    Ok(Json(DataResponse::new(users, context)))
}

pub async fn get_user(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(username): Path<String>,
) -> Result<Json<DataResponse<UserView>>, ApiError> {
    let context = authorize_any(&state, &cookies, &[AuthRequest::user(&username), AuthRequest::admin()])?;

    let user = state
        .store
        .find_by_username(&username)
        .await
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(DataResponse::new(UserView::from(&user), context)))
}
