use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::{get_cookie, secure_cookies};

pub const SESSION_COOKIE: &str = "sid";

/// Session id attached to every request by [`attach_session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

/// Reads the `sid` cookie or issues a fresh one, and stores the id in the
/// request extensions for handlers.
pub async fn attach_session(
    State(ctx): State<AppContext>,
    mut req: Request,
    next: Next,
) -> Response {
    let existing = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|c| get_cookie(c, SESSION_COOKIE))
        .and_then(|v| Uuid::parse_str(&v).ok());
    let (sid, fresh) = match existing {
        Some(sid) => (sid, false),
        None => (Uuid::new_v4(), true),
    };
    req.extensions_mut().insert(SessionId(sid));

    let mut res = next.run(req).await;
    if fresh {
        let cookie =
            build_session_cookie(sid, ctx.cfg.session_ttl_secs, secure_cookies(&ctx.cfg));
        if let Ok(v) = HeaderValue::from_str(&cookie) {
            res.headers_mut().append(header::SET_COOKIE, v);
        }
    }
    res
}

fn build_session_cookie(sid: Uuid, max_age_secs: u64, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!("{SESSION_COOKIE}={sid}; HttpOnly{secure_attr}; Path=/; Max-Age={max_age_secs}; SameSite=Lax")
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .copied()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_carries_ttl_and_flags() {
        let sid = Uuid::nil();
        let cookie = build_session_cookie(sid, 86_400, true);
        assert!(cookie.starts_with("sid=00000000-0000-0000-0000-000000000000;"));
        assert!(cookie.contains("HttpOnly; Secure;"));
        assert!(cookie.contains("Max-Age=86400"));
    }
}
