use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::inbound::http::router::AppState;

/// Paths served without token verification.
pub const PUBLIC_PATHS: [&str; 2] = ["/auth/register", "/auth/login"];

/// Principal established for one request from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub email: String,
}

/// Per-request authentication filter.
///
/// Public paths and requests without a bearer token pass through
/// unauthenticated. A presented token is verified exactly once: on success
/// the subject is attached as [`AuthenticatedUser`], on any failure the
/// request is answered with 401 and never reaches a handler.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    if is_public(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let Some(token) = bearer_token(&req) else {
        tracing::debug!(path = %req.uri().path(), "No bearer token presented");
        return Ok(next.run(req).await);
    };

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(path = %req.uri().path(), "Token rejected: {}", e);
        unauthorized("Invalid or expired token")
    })?;

    tracing::debug!(path = %req.uri().path(), "Request authenticated");
    req.extensions_mut().insert(AuthenticatedUser { email: claims.sub });

    Ok(next.run(req).await)
}

/// Reject requests the filter did not authenticate.
pub async fn require_authentication(req: Request, next: Next) -> Result<Response, Response> {
    if req.extensions().get::<AuthenticatedUser>().is_none() {
        tracing::debug!(path = %req.uri().path(), "Unauthenticated request to protected path");
        return Err(unauthorized("Authentication required"));
    }

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| unauthorized("Authentication required"))
    }
}

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Token from `Authorization: Bearer <token>`, if one is present.
fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}
