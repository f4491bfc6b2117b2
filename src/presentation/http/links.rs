use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};

use crate::application::ports::link_repository::{LinkChanges, NewLink};
use crate::application::use_cases::links::create_link::CreateLink;
use crate::application::use_cases::links::delete_link::DeleteLink;
use crate::application::use_cases::links::get_link::GetLink;
use crate::application::use_cases::links::list_links::ListLinks;
use crate::application::use_cases::links::update_link::UpdateLink;
use crate::application::use_cases::users::get_profile::GetProfile;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::{Bearer, require_user};
use crate::presentation::http::error::ApiError;
use crate::presentation::http::items::LinkView;
use crate::presentation::http::session::SessionId;

#[derive(Debug, Deserialize, IntoParams)]
pub struct LinkListQuery {
    pub folder_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLinkRequest {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub folder_id: Option<i64>,
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLinkRequest {
    pub title: Option<String>,
    /// Omit to keep the description, send `null` to clear it.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Option<Option<String>>,
    pub url: Option<String>,
}

// Marks a field that was sent, so `null` can be told apart from an absent key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/links", get(list_links).post(create_link))
        .route(
            "/links/:id",
            get(get_link).patch(update_link).delete(delete_link),
        )
        .route("/users/:username/links", get(list_user_links))
        .with_state(ctx)
}

fn not_blank(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{field} should not be empty")));
    }
    Ok(())
}

#[utoipa::path(get, path = "/api/links", tag = "Links", params(LinkListQuery),
    responses((status = 200, body = [LinkView])))]
pub async fn list_links(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Query(q): Query<LinkListQuery>,
) -> Result<Json<Vec<LinkView>>, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    let repo = ctx.link_repo();
    let uc = ListLinks {
        links: repo.as_ref(),
    };
    let links = uc.execute(user_id, q.folder_id).await?;
    Ok(Json(links.into_iter().map(Into::into).collect()))
}

#[utoipa::path(post, path = "/api/links", tag = "Links", request_body = CreateLinkRequest,
    responses((status = 201, body = LinkView), (status = 400), (status = 403)))]
pub async fn create_link(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
    Json(req): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkView>), ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    not_blank("title", &req.title)?;
    not_blank("url", &req.url)?;
    let links = ctx.link_repo();
    let folders = ctx.folder_repo();
    let sessions = ctx.session_store();
    let uc = CreateLink {
        links: links.as_ref(),
        folders: folders.as_ref(),
        sessions: sessions.as_ref(),
    };
    let link = uc
        .execute(
            session.0,
            user_id,
            &NewLink {
                title: req.title,
                description: req.description,
                url: req.url,
                folder_id: req.folder_id,
                position: req.position,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(link.into())))
}

#[utoipa::path(get, path = "/api/links/{id}", tag = "Links",
    params(("id" = i64, Path, description = "Link id")),
    responses((status = 200, body = LinkView), (status = 404)))]
pub async fn get_link(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<i64>,
) -> Result<Json<LinkView>, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    let repo = ctx.link_repo();
    let uc = GetLink {
        links: repo.as_ref(),
    };
    Ok(Json(uc.execute(user_id, id).await?.into()))
}

#[utoipa::path(patch, path = "/api/links/{id}", tag = "Links", request_body = UpdateLinkRequest,
    params(("id" = i64, Path, description = "Link id")),
    responses((status = 200, body = LinkView), (status = 403)))]
pub async fn update_link(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
    Path(id): Path<i64>,
    Json(req): Json<UpdateLinkRequest>,
) -> Result<Json<LinkView>, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    if let Some(title) = &req.title {
        not_blank("title", title)?;
    }
    if let Some(url) = &req.url {
        not_blank("url", url)?;
    }
    let links = ctx.link_repo();
    let sessions = ctx.session_store();
    let uc = UpdateLink {
        links: links.as_ref(),
        sessions: sessions.as_ref(),
    };
    let changes = LinkChanges {
        title: req.title,
        description: req.description,
        url: req.url,
    };
    Ok(Json(uc.execute(session.0, user_id, id, &changes).await?.into()))
}

#[utoipa::path(delete, path = "/api/links/{id}", tag = "Links",
    params(("id" = i64, Path, description = "Link id")),
    responses((status = 204), (status = 403)))]
pub async fn delete_link(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    session: SessionId,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let user_id = require_user(&ctx.cfg, bearer?)?;
    let links = ctx.link_repo();
    let sessions = ctx.session_store();
    let uc = DeleteLink {
        links: links.as_ref(),
        sessions: sessions.as_ref(),
    };
    uc.execute(session.0, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/users/{username}/links", tag = "Links",
    params(("username" = String, Path, description = "Owner username"), LinkListQuery),
    responses((status = 200, body = [LinkView]), (status = 404)))]
pub async fn list_user_links(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(username): Path<String>,
    Query(q): Query<LinkListQuery>,
) -> Result<Json<Vec<LinkView>>, ApiError> {
    require_user(&ctx.cfg, bearer?)?;
    let users = ctx.user_repo();
    let owner = GetProfile {
        repo: users.as_ref(),
    }
    .execute(&username)
    .await?;
    let repo = ctx.link_repo();
    let uc = ListLinks {
        links: repo.as_ref(),
    };
    let links = uc.execute(owner.id, q.folder_id).await?;
    Ok(Json(links.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_description_is_told_apart_from_absent() {
        let cleared: UpdateLinkRequest =
            serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let untouched: UpdateLinkRequest = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(untouched.description, None);

        let set: UpdateLinkRequest =
            serde_json::from_str(r#"{"description": "notes"}"#).unwrap();
        assert_eq!(set.description, Some(Some("notes".to_string())));
    }
}
