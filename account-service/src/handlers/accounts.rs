use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::{account::CreateAccountRequest, ErrorResponse},
    middleware::AuthUser,
    models::Account,
    utils::ValidatedJson,
    AppState,
};

/// Open an account on behalf of a user (admin only)
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 200, description = "Account created", body = Account),
        (status = 400, description = "Malformed payload or negative balance", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    tag = "Accounts",
    security(("bearer_auth" = []))
)]
pub async fn create_account(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateAccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(admin = %claims.username, user_id = req.user_id, "Creating account");
    let account = state.ledger.create_account(req.user_id, req.balance)?;
    Ok((StatusCode::OK, Json(account)))
}

/// List every account (admin only)
#[utoipa::path(
    get,
    path = "/accounts",
    responses(
        (status = 200, description = "All accounts in creation order", body = [Account]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    tag = "Accounts",
    security(("bearer_auth" = []))
)]
pub async fn list_accounts(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let accounts = state.ledger.list_accounts()?;
    Ok((StatusCode::OK, Json(accounts)))
}
