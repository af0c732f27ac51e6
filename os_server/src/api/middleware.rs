//! Admin authentication middleware.
//!
//! Organizer routes require `Authorization: Bearer <ADMIN_TOKEN>`. The token
//! comparison is constant time.
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::post, middleware};
//! # use os_server::api::middleware::admin_auth_middleware;
//! # use os_server::api::AppState;
//! # async fn handler() {}
//! # let state: AppState = unimplemented!();
//!
//! let admin_routes: Router<AppState> = Router::new()
//!     .route("/start", post(handler))
//!     .layer(middleware::from_fn_with_state(state, admin_auth_middleware));
//! # let _ = admin_routes;
//! ```

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use super::AppState;

/// Extract the bearer token from the `Authorization` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

fn token_matches(supplied: &str, expected: &str) -> bool {
    if supplied.len() != expected.len() {
        return false;
    }
    supplied.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Reject requests that do not carry the admin token.
///
/// - **Success**: token matches → calls next handler
/// - **Missing header or wrong format**: `401 Unauthorized`
/// - **Wrong token**: `401 Unauthorized`
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let authorized = bearer_token(request.headers())
        .is_some_and(|token| token_matches(token, &state.admin_token));

    if !authorized {
        tracing::warn!(uri = %request.uri(), "SECURITY: rejected admin request");
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}
