use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    api::user::DataResponse,
    db::StoreError,
    errors::ApiError,
    middleware::auth::{authorize_any, AuthContext},
    models::auth::AuthRequest,
    models::user::Group,
    AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    name: String,
    #[serde(default)]
    member_emails: Vec<String>,
}

pub async fn create_group(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<Json<DataResponse<Group>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing or empty attributes".to_string()));
    }

    // Only registered users can join; the creator always does
    let mut members = vec![context.identity.email.clone()];
    for email in payload.member_emails {
        if !members.contains(&email) && state.store.find_by_email(&email).await.is_some() {
            members.push(email);
        }
    }

    let group = Group {
        name: payload.name,
        member_emails: members,
    };
    state.store.add_group(group.clone()).await.map_err(|e| match e {
        StoreError::GroupAlreadyExists => ApiError::Conflict("Group already exists".to_string()),
        _ => ApiError::Internal,
    })?;

    Ok(Json(DataResponse::new(group, context)))
}

pub async fn get_group(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(name): Path<String>,
) -> Result<Json<DataResponse<Group>>, ApiError> {
    let Some(group) = state.store.find_group(&name).await else {
        return Err(ApiError::NotFound("Group not found".to_string()));
    };

    let modes = [AuthRequest::group(group.member_emails.clone()), AuthRequest::admin()];
    let context = authorize_any(&state, &cookies, &modes)?;

    Ok(Json(DataResponse::new(group, context)))
}
