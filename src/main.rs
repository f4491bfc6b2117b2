use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use axum::middleware;
use dotenvy::dotenv;
use http::HeaderValue;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use linktree::application::ports::session_store::SessionStore;
use linktree::bootstrap::app_context::{AppContext, AppServices};
use linktree::bootstrap::config::Config;
use linktree::infrastructure::db::repositories::{
    folder_repository_sqlx::SqlxFolderRepository,
    item_position_repository_sqlx::SqlxItemPositionRepository,
    link_repository_sqlx::SqlxLinkRepository, user_repository_sqlx::SqlxUserRepository,
};
use linktree::infrastructure::session::InMemorySessionStore;
use linktree::presentation::http::session::attach_session;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const SESSION_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(OpenApi)]
#[openapi(
        paths(
            linktree::presentation::http::auth::signup,
            linktree::presentation::http::auth::signin,
            linktree::presentation::http::auth::logout,
            linktree::presentation::http::auth::change_password,
            linktree::presentation::http::auth::me,
            linktree::presentation::http::items::list_items,
            linktree::presentation::http::items::next_items,
            linktree::presentation::http::items::previous_items,
            linktree::presentation::http::items::folder_items,
            linktree::presentation::http::items::update_positions,
            linktree::presentation::http::items::move_item,
            linktree::presentation::http::items::list_user_items,
            linktree::presentation::http::items::next_user_items,
            linktree::presentation::http::items::previous_user_items,
            linktree::presentation::http::items::user_folder_items,
            linktree::presentation::http::links::list_links,
            linktree::presentation::http::links::create_link,
            linktree::presentation::http::links::get_link,
            linktree::presentation::http::links::update_link,
            linktree::presentation::http::links::delete_link,
            linktree::presentation::http::links::list_user_links,
            linktree::presentation::http::folders::list_folders,
            linktree::presentation::http::folders::create_folder,
            linktree::presentation::http::folders::get_folder,
            linktree::presentation::http::folders::update_folder,
            linktree::presentation::http::folders::delete_folder,
            linktree::presentation::http::folders::list_user_folders,
            linktree::presentation::http::users::get_profile,
            linktree::presentation::http::users::update_me,
            linktree::presentation::http::users::delete_me,
            linktree::presentation::http::health::health,
        ),
        components(schemas(
            linktree::presentation::http::auth::SignupRequest,
            linktree::presentation::http::auth::SigninRequest,
            linktree::presentation::http::auth::ChangePasswordRequest,
            linktree::presentation::http::auth::AuthResponse,
            linktree::presentation::http::auth::UserResponse,
            linktree::presentation::http::items::LinkView,
            linktree::presentation::http::items::FolderView,
            linktree::presentation::http::items::ItemView,
            linktree::presentation::http::items::ItemPageResponse,
            linktree::presentation::http::items::PositionEntry,
            linktree::presentation::http::items::MoveItemRequest,
            linktree::presentation::http::links::CreateLinkRequest,
            linktree::presentation::http::links::UpdateLinkRequest,
            linktree::presentation::http::folders::CreateFolderRequest,
            linktree::presentation::http::folders::UpdateFolderRequest,
            linktree::presentation::http::folders::FolderPageResponse,
            linktree::presentation::http::users::ProfileResponse,
            linktree::presentation::http::users::UpdateProfileRequest,
            linktree::presentation::http::error::ErrorBody,
            linktree::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Auth", description = "Authentication"),
            (name = "Items", description = "Ordered links and folders, paging and reordering"),
            (name = "Links", description = "Link management"),
            (name = "Folders", description = "Folder management"),
            (name = "Users", description = "Profiles and accounts"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn cors_layer(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::PATCH,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        // FRONTEND_URL is mandatory in production; deny all if it is somehow absent.
        _ if cfg.is_production => base.allow_origin(AllowOrigin::exact(
            HeaderValue::from_static("http://invalid"),
        )),
        _ => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "linktree=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        api_port = cfg.api_port,
        page_size = cfg.page_size,
        production = cfg.is_production,
        "Starting linktree backend"
    );

    // Database
    let pool = linktree::infrastructure::db::connect_pool(&cfg.database_url).await?;
    linktree::infrastructure::db::migrate(&pool).await?;

    let session_store = Arc::new(InMemorySessionStore::new(Duration::from_secs(
        cfg.session_ttl_secs,
    )));
    let services = AppServices::new(
        Arc::new(SqlxLinkRepository::new(pool.clone())),
        Arc::new(SqlxFolderRepository::new(pool.clone())),
        Arc::new(SqlxItemPositionRepository::new(pool.clone())),
        Arc::new(SqlxUserRepository::new(pool.clone())),
        session_store.clone(),
    );
    let ctx = AppContext::new(cfg.clone(), services);

    let api_router = Router::new()
        .nest(
            "/api",
            linktree::presentation::http::health::routes(pool.clone()),
        )
        .nest(
            "/api/auth",
            linktree::presentation::http::auth::routes(ctx.clone()),
        )
        .nest(
            "/api",
            linktree::presentation::http::items::routes(ctx.clone()),
        )
        .nest(
            "/api",
            linktree::presentation::http::links::routes(ctx.clone()),
        )
        .nest(
            "/api",
            linktree::presentation::http::folders::routes(ctx.clone()),
        )
        .nest(
            "/api",
            linktree::presentation::http::users::routes(ctx.clone()),
        )
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(ctx.clone(), attach_session))
        .layer(cors_layer(&cfg))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    let api_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, api_router).await?;
        Ok(())
    });

    // Background session expiry
    let prune_handle: JoinHandle<()> = tokio::spawn(async move {
        loop {
            sleep(SESSION_PRUNE_INTERVAL).await;
            match session_store.prune_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "sessions_pruned"),
                Err(e) => tracing::error!(error = ?e, "session_prune_failed"),
            }
        }
    });

    match api_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(?e, "API server task failed"),
        Err(e) => error!(?e, "API server task panicked"),
    }

    prune_handle.abort();
    match prune_handle.await {
        Ok(()) => {}
        Err(e) if e.is_cancelled() => {}
        Err(e) => error!(?e, "Session prune task panicked"),
    }
    Ok(())
}
