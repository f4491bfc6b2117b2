use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, patch},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::ports::user_repository::ProfileChanges;
use crate::application::use_cases::users::delete_account::DeleteAccount;
use crate::application::use_cases::users::get_profile::GetProfile;
use crate::application::use_cases::users::update_profile::UpdateProfile;
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::User;
use crate::presentation::http::auth::{
    Bearer, UserResponse, expired_access_cookie, require_user,
};
use crate::presentation::http::error::ApiError;
use crate::presentation::http::session::SessionId;

/// Another user's public profile; the email address is not exposed.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/users/me", patch(update_me).delete(delete_me))
        .route("/users/:username", get(get_profile))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/users/{username}", tag = "Users",
    params(("username" = String, Path, description = "Username")),
    responses((status = 200, body = ProfileResponse), (status = 404)))]
pub async fn get_profile(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    require_user(&ctx.cfg, bearer?)?;
    let repo = ctx.user_repo();
    let uc = GetProfile {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(&username).await?.into()))
}

#[utoipa::path(patch, path = "/api/users/me", tag = "Users", request_body = UpdateProfileRequest,
    responses((status = 200, body = UserResponse), (status = 400), (status = 409)))]
pub async fn update_me(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    let repo = ctx.user_repo();
    let uc = UpdateProfile {
        repo: repo.as_ref(),
    };
    let changes = ProfileChanges {
        first_name: req.first_name.map(|v| v.trim().to_string()),
        last_name: req.last_name.map(|v| v.trim().to_string()),
        email: req.email.map(|v| v.trim().to_string()),
    };
    Ok(Json(uc.execute(user_id, &changes).await?.into()))
}

#[utoipa::path(delete, path = "/api/users/me", tag = "Users", responses((status = 204)))]
pub async fn delete_me(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
) -> Result<(HeaderMap, StatusCode), ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    let users = ctx.user_repo();
    let sessions = ctx.session_store();
    let uc = DeleteAccount {
        user_repo: users.as_ref(),
        sessions: sessions.as_ref(),
    };
    uc.execute(session.0, user_id)
        .await
        .map_err(ApiError::internal)?;
    tracing::info!(user_id, "account_deleted");
    Ok((expired_access_cookie(&ctx.cfg), StatusCode::NO_CONTENT))
}
