use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::state::AppState;

/// Authenticated user extracted from session claims.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub sub: String,
}

/// The resolved identity of the request, if any. Always present in request
/// extensions once [`resolve_caller`] has run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Caller(pub Option<AuthUser>);

impl Caller {
    pub fn owner_id(&self) -> Option<&str> {
        self.0.as_ref().map(|user| user.sub.as_str())
    }
}

/// Session resolution middleware.
///
/// Reads the session token from `Authorization: Bearer <token>` or, failing
/// that, from the session cookie. A missing, expired, or invalid token
/// resolves to an anonymous [`Caller`]; each service decides whether that
/// is acceptable.
pub async fn resolve_caller(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let user = session_token(req.headers(), &state.session_cookie).and_then(|token| {
        match state.verifier.verify(token) {
            Ok(claims) => Some(AuthUser { sub: claims.sub }),
            Err(e) => {
                debug!(error = %e, "ignoring invalid session token");
                None
            }
        }
    });

    req.extensions_mut().insert(Caller(user));

    next.run(req).await
}

/// The session token carried by a request, preferring the bearer header.
pub fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value)
}
