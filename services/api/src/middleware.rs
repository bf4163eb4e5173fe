//! Authentication middleware for token cookie validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use common::token::TOKEN_COOKIE;
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Gate for routes that require an authenticated user
///
/// The verified [`common::token::Identity`] is inserted into the request
/// extensions for handlers to extract.
pub async fn auth_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // An empty cookie counts as no cookie
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::Unauthenticated)?;

    let identity = state.token_service.verify(&token).map_err(|e| {
        warn!("Rejected token: {}", e);
        ApiError::Forbidden
    })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
