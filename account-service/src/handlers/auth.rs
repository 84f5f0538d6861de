use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::{
        auth::{LoginRequest, RegisterRequest, TokenResponse},
        ErrorResponse,
    },
    models::User,
    services::ServiceError,
    utils::ValidatedJson,
    AppState,
};

/// Register a new identity
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = User),
        (status = 400, description = "Malformed payload or invalid role", body = ErrorResponse),
        (status = 409, description = "Username already registered", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .credentials
        .register(&req.username, &req.password, &req.role)?;
    Ok((StatusCode::OK, Json(user)))
}

/// Exchange username and password for a one-hour bearer token
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Malformed payload", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .credentials
        .authenticate(&req.username, &req.password)
        .map_err(|e| {
            tracing::warn!(username = %req.username, "Failed login attempt");
            e
        })?;

    let token = state.tokens.issue(&user).map_err(ServiceError::Internal)?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok((StatusCode::OK, Json(TokenResponse { token })))
}
