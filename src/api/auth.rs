use crate::api::AppState;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::UserResponse;
use crate::service::auth::{LoginRequest, SignupRequest};
use crate::service::LoginResponse;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let user = state.auth.signup(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    Ok(Json(state.auth.login(req).await?))
}

pub async fn profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserResponse>> {
    Ok(Json(state.auth.profile(claims.sub).await?))
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
}

/// JWT logout is client-side token disposal; this just acknowledges it.
pub async fn logout() -> Json<LogoutResponse> {
    Json(LogoutResponse {
        message: "Logged out successfully",
    })
}
