//! Authentication service routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::token::TOKEN_COOKIE;
use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    error::{AuthError, AuthResult},
    models::{LoginCredentials, LoginUser, NewUser, RegisterRequest},
    password::{hash_password, verify_password},
    state::AppState,
    validation::validate_registration,
};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/reg", post(register))
        .route("/", post(login))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(|e| AuthError::BadRequest(e.body_text()))?;
    validate_registration(&payload).map_err(AuthError::BadRequest)?;

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        AuthError::InternalServerError
    })?;

    let user = state
        .user_store
        .create(NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
        })
        .await?;

    info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "Success",
            "user": user,
        })),
    ))
}

/// User login endpoint
///
/// On success the token is set as an http-only, same-site strict cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginCredentials>, JsonRejection>,
) -> AuthResult<impl IntoResponse> {
    let Json(credentials) = payload.map_err(|e| AuthError::BadRequest(e.body_text()))?;
    info!("Login attempt for: {}", credentials.email);

    let user = state
        .user_store
        .find_by_email(&credentials.email)
        .await?
        .ok_or(AuthError::NoSuchUser)?;

    if !verify_password(&credentials.password, &user.password_hash) {
        warn!("Rejected login for user {}", user.id);
        return Err(AuthError::BadCredentials);
    }

    let token = state.token_service.issue(&user.identity()).map_err(|e| {
        error!("Failed to issue token: {}", e);
        AuthError::InternalServerError
    })?;

    let cookie = Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.secure_cookie)
        .path("/");

    Ok((
        jar.add(cookie),
        Json(json!({
            "status": "Success",
            "message": "Login successful",
            "user": LoginUser::from(&user),
        })),
    ))
}
