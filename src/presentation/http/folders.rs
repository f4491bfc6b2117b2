use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::ports::folder_repository::{FolderChanges, NewFolder};
use crate::application::use_cases::folders::create_folder::CreateFolder;
use crate::application::use_cases::folders::delete_folder::DeleteFolder;
use crate::application::use_cases::folders::get_folder::GetFolder;
use crate::application::use_cases::folders::list_folders::{FolderPage, ListFolders};
use crate::application::use_cases::folders::update_folder::UpdateFolder;
use crate::application::use_cases::users::get_profile::GetProfile;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::{Bearer, require_user};
use crate::presentation::http::error::ApiError;
use crate::presentation::http::items::FolderView;
use crate::presentation::http::session::SessionId;

#[derive(Debug, Deserialize, IntoParams)]
pub struct FolderListQuery {
    /// Parent folder; root-level folders when omitted.
    pub parent_id: Option<i64>,
    pub page: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FolderPageResponse {
    pub folders: Vec<FolderView>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_folders: i64,
}

impl From<FolderPage> for FolderPageResponse {
    fn from(p: FolderPage) -> Self {
        Self {
            folders: p.folders.into_iter().map(Into::into).collect(),
            current_page: p.current_page,
            total_pages: p.total_pages,
            total_folders: p.total_folders,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFolderRequest {
    pub title: String,
    pub parent_id: Option<i64>,
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFolderRequest {
    pub title: Option<String>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/folders", get(list_folders).post(create_folder))
        .route(
            "/folders/:id",
            get(get_folder).patch(update_folder).delete(delete_folder),
        )
        .route("/users/:username/folders", get(list_user_folders))
        .with_state(ctx)
}

async fn folder_page(
    ctx: &AppContext,
    owner_id: i64,
    q: FolderListQuery,
) -> Result<FolderPageResponse, ApiError> {
    let repo = ctx.folder_repo();
    let uc = ListFolders {
        folders: repo.as_ref(),
        page_size: ctx.cfg.page_size,
    };
    let page = uc
        .execute(owner_id, q.parent_id, q.page.unwrap_or(1))
        .await?;
    Ok(page.into())
}

#[utoipa::path(get, path = "/api/folders", tag = "Folders", params(FolderListQuery),
    responses((status = 200, body = FolderPageResponse)))]
pub async fn list_folders(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Query(q): Query<FolderListQuery>,
) -> Result<Json<FolderPageResponse>, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    Ok(Json(folder_page(&ctx, user_id, q).await?))
}

#[utoipa::path(post, path = "/api/folders", tag = "Folders", request_body = CreateFolderRequest,
    responses((status = 201, body = FolderView), (status = 400), (status = 403)))]
pub async fn create_folder(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<FolderView>), ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    if req.title.trim().is_empty() {
        return Err(ApiError::bad_request("title should not be empty"));
    }
    let folders = ctx.folder_repo();
    let sessions = ctx.session_store();
    let uc = CreateFolder {
        folders: folders.as_ref(),
        sessions: sessions.as_ref(),
    };
    let folder = uc
        .execute(
            session.0,
            user_id,
            &NewFolder {
                title: req.title,
                parent_id: req.parent_id,
                position: req.position,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(folder.into())))
}

#[utoipa::path(get, path = "/api/folders/{id}", tag = "Folders",
    params(("id" = i64, Path, description = "Folder id")),
    responses((status = 200, body = FolderView), (status = 404)))]
pub async fn get_folder(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<i64>,
) -> Result<Json<FolderView>, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    let repo = ctx.folder_repo();
    let uc = GetFolder {
        folders: repo.as_ref(),
    };
    Ok(Json(uc.execute(user_id, id).await?.into()))
}

#[utoipa::path(patch, path = "/api/folders/{id}", tag = "Folders", request_body = UpdateFolderRequest,
    params(("id" = i64, Path, description = "Folder id")),
    responses((status = 200, body = FolderView), (status = 403)))]
pub async fn update_folder(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
    Path(id): Path<i64>,
    Json(req): Json<UpdateFolderRequest>,
) -> Result<Json<FolderView>, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    if req.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ApiError::bad_request("title should not be empty"));
    }
    let folders = ctx.folder_repo();
    let sessions = ctx.session_store();
    let uc = UpdateFolder {
        folders: folders.as_ref(),
        sessions: sessions.as_ref(),
    };
    let changes = FolderChanges { title: req.title };
    Ok(Json(uc.execute(session.0, user_id, id, &changes).await?.into()))
}

#[utoipa::path(delete, path = "/api/folders/{id}", tag = "Folders",
    params(("id" = i64, Path, description = "Folder id")),
    responses((status = 204), (status = 403)))]
pub async fn delete_folder(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    let folders = ctx.folder_repo();
    let sessions = ctx.session_store();
    let uc = DeleteFolder {
        folders: folders.as_ref(),
        sessions: sessions.as_ref(),
    };
    uc.execute(session.0, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/users/{username}/folders", tag = "Folders",
    params(("username" = String, Path, description = "Owner username"), FolderListQuery),
    responses((status = 200, body = FolderPageResponse), (status = 404)))]
pub async fn list_user_folders(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(username): Path<String>,
    Query(q): Query<FolderListQuery>,
) -> Result<Json<FolderPageResponse>, ApiError> {
    require_user(&ctx.cfg, bearer?)?;
    let users = ctx.user_repo();
    let owner = GetProfile {
        repo: users.as_ref(),
    }
    .execute(&username)
    .await?;
    Ok(Json(folder_page(&ctx, owner.id, q).await?))
}
