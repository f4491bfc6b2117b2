use crate::application::ports::session_store::SessionStore;
use crate::application::use_cases::auth::change_password::{
    ChangePassword as ChangePasswordUc, ChangePasswordRequest as ChangePasswordDto,
};
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::users::User;
use crate::presentation::http::error::ApiError;
use crate::presentation::http::session::SessionId;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, patch, post},
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    /// Email address or username.
    pub identifier: String,
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: usize,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/logout", post(logout))
        .route("/change-password", patch(change_password))
        .route("/me", get(me))
        .with_state(ctx)
}

// Path segments under /users that would shadow a profile of the same name.
const RESERVED_USERNAMES: &[&str] = &["me"];

fn validate_signup(req: &SignupRequest) -> Result<(), ApiError> {
    if !req.email.contains('@') {
        return Err(ApiError::bad_request("email must be a valid address"));
    }
    if req.username.trim().is_empty() {
        return Err(ApiError::bad_request("username should not be empty"));
    }
    let username = req.username.trim();
    if RESERVED_USERNAMES
        .iter()
        .any(|r| r.eq_ignore_ascii_case(username))
    {
        return Err(ApiError::bad_request(format!(
            "username \"{username}\" is reserved"
        )));
    }
    if req.password.is_empty() {
        return Err(ApiError::bad_request("password should not be empty"));
    }
    Ok(())
}

#[utoipa::path(post, path = "/api/auth/signup", tag = "Auth", request_body = SignupRequest, security(()), responses(
    (status = 201, body = AuthResponse),
    (status = 403, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn signup(
    State(ctx): State<AppContext>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), ApiError> {
    validate_signup(&req)?;
    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
    };
    let dto = RegisterDto {
        email: req.email.trim().to_string(),
        username: req.username.trim().to_string(),
        password: req.password,
    };
    let user = uc.execute(&dto).await?;
    tracing::info!(user_id = user.id, "user_signed_up");
    let (headers, body) = issue_session(&ctx.cfg, user)?;
    Ok((StatusCode::CREATED, headers, Json(body)))
}

#[utoipa::path(post, path = "/api/auth/signin", tag = "Auth", request_body = SigninRequest, security(()), responses(
    (status = 200, body = AuthResponse),
    (status = 403, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn signin(
    State(ctx): State<AppContext>,
    Json(req): Json<SigninRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        email: req.email.trim().to_string(),
        password: req.password,
    };
    let user = uc.execute(&dto).await?;
    let (headers, body) = issue_session(&ctx.cfg, user)?;
    Ok((headers, Json(body)))
}

#[utoipa::path(patch, path = "/api/auth/change-password", tag = "Auth", request_body = ChangePasswordRequest, security(()), responses(
    (status = 204),
    (status = 403, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn change_password(
    State(ctx): State<AppContext>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    if req.new_password.is_empty() {
        return Err(ApiError::bad_request("new_password should not be empty"));
    }
    let repo = ctx.user_repo();
    let uc = ChangePasswordUc {
        repo: repo.as_ref(),
    };
    uc.execute(&ChangePasswordDto {
        identifier: req.identifier.trim().to_string(),
        old_password: req.old_password,
        new_password: req.new_password,
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/auth/me", tag = "Auth", responses((status = 200, body = UserResponse)))]
pub async fn me(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
) -> Result<Json<UserResponse>, StatusCode> {
    let id = require_user(&ctx.cfg, bearer?)?;
    let repo = ctx.user_repo();
    let uc = GetMe {
        repo: repo.as_ref(),
    };
    let user = uc
        .execute(id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Json(user.into()))
}

fn issue_session(cfg: &Config, user: User) -> Result<(HeaderMap, AuthResponse), ApiError> {
    let token = issue_token(cfg, &user)
        .map_err(|e| ApiError::internal(anyhow::anyhow!("token encoding failed: {e}")))?;

    // Set HttpOnly cookie with the access token
    let mut headers = HeaderMap::new();
    let cookie = build_access_cookie(&token, cfg.jwt_expires_secs, secure_cookies(cfg));
    if let Ok(v) = axum::http::HeaderValue::from_str(&cookie) {
        headers.insert(axum::http::header::SET_COOKIE, v);
    }
    Ok((
        headers,
        AuthResponse {
            access_token: token,
            user: user.into(),
        },
    ))
}

pub(crate) fn issue_token(cfg: &Config, user: &User) -> jsonwebtoken::errors::Result<String> {
    let now = chrono::Utc::now().timestamp().max(0) as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        exp: now + (cfg.jwt_expires_secs.max(0) as usize),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret_pem.as_bytes()),
    )
}

// --- Bearer extractor & JWT utils ---
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // 1) Prefer Authorization header if present
        if let Some(auth) = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(t) = auth.strip_prefix("Bearer ") {
                return Ok(Bearer(t.to_string()));
            }
        }

        // 2) Fallback to HttpOnly cookie `access_token`
        if let Some(cookie_hdr) = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(token) = get_cookie(cookie_hdr, "access_token") {
                return Ok(Bearer(token));
            }
        }

        Err(StatusCode::UNAUTHORIZED)
    }
}

pub(crate) fn validate_bearer(cfg: &Config, bearer: Bearer) -> Result<Claims, StatusCode> {
    let data = jsonwebtoken::decode::<Claims>(
        &bearer.0,
        &DecodingKey::from_secret(cfg.jwt_secret_pem.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;
    Ok(data.claims)
}

/// Id of the signed-in user carried by a valid token.
pub fn require_user(cfg: &Config, bearer: Bearer) -> Result<i64, StatusCode> {
    let claims = validate_bearer(cfg, bearer)?;
    claims.sub.parse().map_err(|_| StatusCode::UNAUTHORIZED)
}

// --- Cookie helpers & logout ---

pub(crate) fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

pub(crate) fn secure_cookies(cfg: &Config) -> bool {
    cfg.frontend_url
        .as_deref()
        .is_some_and(|u| u.starts_with("https://"))
}

fn build_access_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "access_token={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        token,
        secure_attr,
        max_age_secs.max(0)
    )
}

pub(crate) fn expired_access_cookie(cfg: &Config) -> HeaderMap {
    let cookie = if secure_cookies(cfg) {
        "access_token=; HttpOnly; Secure; Path=/; Max-Age=0; SameSite=Lax"
    } else {
        "access_token=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax"
    };
    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::SET_COOKIE,
        axum::http::HeaderValue::from_static(cookie),
    );
    headers
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "Auth", responses((status = 204)))]
pub async fn logout(
    State(ctx): State<AppContext>,
    session: SessionId,
) -> Result<(HeaderMap, StatusCode), StatusCode> {
    // Cursors belong to the signed-in user; drop them with the cookie
    if let Err(e) = ctx.session_store().clear(session.0).await {
        tracing::warn!(error = ?e, "session_clear_failed");
    }
    Ok((expired_access_cookie(&ctx.cfg), StatusCode::NO_CONTENT))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config {
            api_port: 0,
            frontend_url: None,
            database_url: String::new(),
            jwt_secret_pem: "test-secret-test-secret".into(),
            jwt_expires_secs: 900,
            page_size: 5,
            session_ttl_secs: 60,
            is_production: false,
        }
    }

    fn user() -> User {
        User {
            id: 42,
            email: "a@example.com".into(),
            username: "alice".into(),
            first_name: None,
            last_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_resolves_to_user_id() {
        let cfg = cfg();
        let token = issue_token(&cfg, &user()).unwrap();
        assert_eq!(require_user(&cfg, Bearer(token.clone())).unwrap(), 42);
        let claims = validate_bearer(&cfg, Bearer(token)).unwrap();
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token(&cfg(), &user()).unwrap();
        let other = Config {
            jwt_secret_pem: "another-secret-entirely".into(),
            ..cfg()
        };
        assert_eq!(
            require_user(&other, Bearer(token)).unwrap_err(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn reads_named_cookie() {
        let header = "theme=dark; access_token=abc.def; sid=123";
        assert_eq!(get_cookie(header, "access_token").as_deref(), Some("abc.def"));
        assert_eq!(get_cookie(header, "sid").as_deref(), Some("123"));
        assert_eq!(get_cookie(header, "missing"), None);
    }

    #[test]
    fn signup_shape_is_checked() {
        let bad = SignupRequest {
            email: "not-an-email".into(),
            username: "alice".into(),
            password: "pw".into(),
        };
        assert_eq!(
            validate_signup(&bad).unwrap_err().status,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn route_segment_names_cannot_be_usernames() {
        for name in ["me", " Me "] {
            let req = SignupRequest {
                email: "me@example.com".into(),
                username: name.into(),
                password: "pw".into(),
            };
            assert_eq!(
                validate_signup(&req).unwrap_err().status,
                StatusCode::BAD_REQUEST
            );
        }
        let ok = SignupRequest {
            email: "meg@example.com".into(),
            username: "meg".into(),
            password: "pw".into(),
        };
        assert!(validate_signup(&ok).is_ok());
    }
}
