use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::application::pagination::{PageOutcome, PageWindow};
use crate::application::ports::session_store::CursorScope;
use crate::application::use_cases::items::browse_items::BrowseItems;
use crate::application::use_cases::items::list_folder_items::ListFolderItems;
use crate::application::use_cases::items::move_item::MoveItem;
use crate::application::use_cases::items::update_positions::{UpdatePositions, parse_batch};
use crate::application::use_cases::users::get_profile::GetProfile;
use crate::bootstrap::app_context::AppContext;
use crate::domain::items::{Folder, Item, ItemKey, ItemKind, Link};
use crate::presentation::http::auth::{Bearer, require_user};
use crate::presentation::http::error::ApiError;
use crate::presentation::http::session::SessionId;

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkView {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub folder_id: Option<i64>,
    pub position: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Link> for LinkView {
    fn from(l: Link) -> Self {
        Self {
            id: l.id,
            title: l.title,
            description: l.description,
            url: l.url,
            folder_id: l.folder_id,
            position: l.position,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FolderView {
    pub id: i64,
    pub title: String,
    pub parent_id: Option<i64>,
    pub position: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Folder> for FolderView {
    fn from(f: Folder) -> Self {
        Self {
            id: f.id,
            title: f.title,
            parent_id: f.parent_id,
            position: f.position,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// One entry of a merged listing. `type` tells links and folders apart;
/// link-only fields are omitted for folders.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemView {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Containing folder (`folder_id` for links, `parent_id` for folders).
    pub parent_id: Option<i64>,
    pub position: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemView {
    fn from(item: Item) -> Self {
        let kind = item.kind().as_str().to_string();
        match item {
            Item::Link(l) => Self {
                kind,
                id: l.id,
                title: l.title,
                url: Some(l.url),
                description: l.description,
                parent_id: l.folder_id,
                position: l.position,
                created_at: l.created_at,
                updated_at: l.updated_at,
            },
            Item::Folder(f) => Self {
                kind,
                id: f.id,
                title: f.title,
                url: None,
                description: None,
                parent_id: f.parent_id,
                position: f.position,
                created_at: f.created_at,
                updated_at: f.updated_at,
            },
        }
    }
}

fn views(items: Vec<Item>) -> Vec<ItemView> {
    items.into_iter().map(ItemView::from).collect()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemPageResponse {
    pub items: Vec<ItemView>,
    pub page: u32,
    pub is_first_page: bool,
    pub is_last_page: bool,
    /// Set when a cursor move ran past either end; `items` is then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<PageWindow> for ItemPageResponse {
    fn from(w: PageWindow) -> Self {
        Self {
            items: views(w.items),
            page: w.page,
            is_first_page: w.is_first_page,
            is_last_page: w.is_last_page,
            message: None,
        }
    }
}

impl From<PageOutcome> for ItemPageResponse {
    fn from(outcome: PageOutcome) -> Self {
        match outcome {
            PageOutcome::Page(w) => w.into(),
            PageOutcome::Terminal {
                message,
                page,
                is_first_page,
                is_last_page,
            } => Self {
                items: Vec::new(),
                page,
                is_first_page,
                is_last_page,
                message: Some(message.to_string()),
            },
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PositionEntry {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveItemRequest {
    /// Target folder; `null` moves the item to the root level.
    pub folder_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/items", get(list_items))
        .route("/items/next", get(next_items))
        .route("/items/previous", get(previous_items))
        .route("/items/folder/:folder_id", get(folder_items))
        .route("/items/positions", patch(update_positions))
        .route("/items/:id/move", patch(move_item))
        .route("/items/users/:username", get(list_user_items))
        .route("/items/users/:username/next", get(next_user_items))
        .route("/items/users/:username/previous", get(previous_user_items))
        .route(
            "/items/users/:username/folder/:folder_id",
            get(user_folder_items),
        )
        .with_state(ctx)
}

async fn owner_of(ctx: &AppContext, username: &str) -> Result<i64, ApiError> {
    let repo = ctx.user_repo();
    let user = GetProfile {
        repo: repo.as_ref(),
    }
    .execute(username)
    .await?;
    Ok(user.id)
}

async fn page_for(
    ctx: &AppContext,
    session: SessionId,
    scope: CursorScope,
    page: u32,
) -> Result<ItemPageResponse, ApiError> {
    let links = ctx.link_repo();
    let folders = ctx.folder_repo();
    let sessions = ctx.session_store();
    let uc = BrowseItems {
        links: links.as_ref(),
        folders: folders.as_ref(),
        sessions: sessions.as_ref(),
        page_size: ctx.cfg.page_size,
    };
    Ok(uc.page(session.0, scope, page).await?.into())
}

async fn step(
    ctx: &AppContext,
    session: SessionId,
    scope: CursorScope,
    forward: bool,
) -> Result<ItemPageResponse, ApiError> {
    let links = ctx.link_repo();
    let folders = ctx.folder_repo();
    let sessions = ctx.session_store();
    let uc = BrowseItems {
        links: links.as_ref(),
        folders: folders.as_ref(),
        sessions: sessions.as_ref(),
        page_size: ctx.cfg.page_size,
    };
    let outcome = if forward {
        uc.next(session.0, scope).await?
    } else {
        uc.previous(session.0, scope).await?
    };
    Ok(outcome.into())
}

async fn folder_contents(
    ctx: &AppContext,
    owner_id: i64,
    folder_id: i64,
) -> Result<Vec<ItemView>, ApiError> {
    let links = ctx.link_repo();
    let folders = ctx.folder_repo();
    let uc = ListFolderItems {
        links: links.as_ref(),
        folders: folders.as_ref(),
    };
    Ok(views(uc.execute(owner_id, folder_id).await?))
}

#[utoipa::path(get, path = "/api/items", tag = "Items", params(PageQuery),
    responses((status = 200, body = ItemPageResponse)))]
pub async fn list_items(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
    Query(q): Query<PageQuery>,
) -> Result<Json<ItemPageResponse>, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    let page = q.page.unwrap_or(1);
    Ok(Json(
        page_for(&ctx, session, CursorScope::Own(user_id), page).await?,
    ))
}

#[utoipa::path(get, path = "/api/items/next", tag = "Items",
    responses((status = 200, body = ItemPageResponse)))]
pub async fn next_items(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
) -> Result<Json<ItemPageResponse>, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    Ok(Json(
        step(&ctx, session, CursorScope::Own(user_id), true).await?,
    ))
}

#[utoipa::path(get, path = "/api/items/previous", tag = "Items",
    responses((status = 200, body = ItemPageResponse)))]
pub async fn previous_items(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
) -> Result<Json<ItemPageResponse>, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    Ok(Json(
        step(&ctx, session, CursorScope::Own(user_id), false).await?,
    ))
}

#[utoipa::path(get, path = "/api/items/folder/{folder_id}", tag = "Items",
    params(("folder_id" = i64, Path, description = "Folder id")),
    responses((status = 200, body = [ItemView]), (status = 404)))]
pub async fn folder_items(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(folder_id): Path<i64>,
) -> Result<Json<Vec<ItemView>>, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    Ok(Json(folder_contents(&ctx, user_id, folder_id).await?))
}

#[utoipa::path(patch, path = "/api/items/positions", tag = "Items", request_body = [PositionEntry],
    responses((status = 200, body = [ItemView]), (status = 400), (status = 403)))]
pub async fn update_positions(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
    Json(body): Json<Value>,
) -> Result<Json<Vec<ItemView>>, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    let updates = parse_batch(&body)?;
    let links = ctx.link_repo();
    let folders = ctx.folder_repo();
    let positions = ctx.position_repo();
    let sessions = ctx.session_store();
    let uc = UpdatePositions {
        links: links.as_ref(),
        folders: folders.as_ref(),
        positions: positions.as_ref(),
        sessions: sessions.as_ref(),
    };
    let items = uc.execute(session.0, user_id, &updates).await?;
    Ok(Json(views(items)))
}

#[utoipa::path(patch, path = "/api/items/{id}/move", tag = "Items", request_body = MoveItemRequest,
    params(("id" = i64, Path, description = "Link or folder id")),
    responses((status = 200, body = ItemView), (status = 403), (status = 409)))]
pub async fn move_item(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
    Path(id): Path<i64>,
    Json(req): Json<MoveItemRequest>,
) -> Result<Json<ItemView>, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    let kind = ItemKind::parse(&req.kind)
        .ok_or_else(|| ApiError::bad_request("type must be \"link\" or \"folder\""))?;
    let links = ctx.link_repo();
    let folders = ctx.folder_repo();
    let sessions = ctx.session_store();
    let uc = MoveItem {
        links: links.as_ref(),
        folders: folders.as_ref(),
        sessions: sessions.as_ref(),
    };
    let moved = uc
        .execute(session.0, user_id, ItemKey { kind, id }, req.folder_id)
        .await?;
    Ok(Json(moved.into()))
}

#[utoipa::path(get, path = "/api/items/users/{username}", tag = "Items",
    params(("username" = String, Path, description = "Owner username"), PageQuery),
    responses((status = 200, body = ItemPageResponse), (status = 404)))]
pub async fn list_user_items(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
    Path(username): Path<String>,
    Query(q): Query<PageQuery>,
) -> Result<Json<ItemPageResponse>, ApiError> {
    require_user(&ctx.cfg, bearer?)?;
    let owner_id = owner_of(&ctx, &username).await?;
    let page = q.page.unwrap_or(1);
    Ok(Json(
        page_for(&ctx, session, CursorScope::Other(owner_id), page).await?,
    ))
}

#[utoipa::path(get, path = "/api/items/users/{username}/next", tag = "Items",
    params(("username" = String, Path, description = "Owner username")),
    responses((status = 200, body = ItemPageResponse), (status = 404)))]
pub async fn next_user_items(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
    Path(username): Path<String>,
) -> Result<Json<ItemPageResponse>, ApiError> {
    require_user(&ctx.cfg, bearer?)?;
    let owner_id = owner_of(&ctx, &username).await?;
    Ok(Json(
        step(&ctx, session, CursorScope::Other(owner_id), true).await?,
    ))
}

#[utoipa::path(get, path = "/api/items/users/{username}/previous", tag = "Items",
    params(("username" = String, Path, description = "Owner username")),
    responses((status = 200, body = ItemPageResponse), (status = 404)))]
pub async fn previous_user_items(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
    Path(username): Path<String>,
) -> Result<Json<ItemPageResponse>, ApiError> {
    require_user(&ctx.cfg, bearer?)?;
    let owner_id = owner_of(&ctx, &username).await?;
    Ok(Json(
        step(&ctx, session, CursorScope::Other(owner_id), false).await?,
    ))
}

#[utoipa::path(get, path = "/api/items/users/{username}/folder/{folder_id}", tag = "Items",
    params(
        ("username" = String, Path, description = "Owner username"),
        ("folder_id" = i64, Path, description = "Folder id")
    ),
    responses((status = 200, body = [ItemView]), (status = 404)))]
pub async fn user_folder_items(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path((username, folder_id)): Path<(String, i64)>,
) -> Result<Json<Vec<ItemView>>, ApiError> {
    require_user(&ctx.cfg, bearer?)?;
    let owner_id = owner_of(&ctx, &username).await?;
    Ok(Json(folder_contents(&ctx, owner_id, folder_id).await?))
}
