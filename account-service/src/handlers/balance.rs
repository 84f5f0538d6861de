use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{
        account::{BalanceQuery, BalanceResponse, TransactionRequest},
        ErrorResponse,
    },
    middleware::AuthUser,
    models::Account,
    utils::AnyJsonBody,
    AppState,
};

/// Read the caller's own balance
#[utoipa::path(
    get,
    path = "/balance",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Current balance", body = BalanceResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not a user, or user_id is not the caller's", body = ErrorResponse),
        (status = 404, description = "Caller has no account", body = ErrorResponse)
    ),
    tag = "Balance",
    security(("bearer_auth" = []))
)]
pub async fn get_balance(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<BalanceQuery>,
) -> Result<impl IntoResponse, AppError> {
    let balance = state.ledger.balance(&claims, query.user_id())?;
    Ok((StatusCode::OK, Json(BalanceResponse { balance })))
}

/// Deposit into the caller's own account
#[utoipa::path(
    post,
    path = "/balance",
    request_body = TransactionRequest,
    responses(
        (status = 200, description = "Updated account", body = Account),
        (status = 400, description = "Malformed payload or negative amount", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not a user, or user_id is not the caller's", body = ErrorResponse),
        (status = 404, description = "Caller has no account", body = ErrorResponse)
    ),
    tag = "Balance",
    security(("bearer_auth" = []))
)]
pub async fn deposit(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    AnyJsonBody(req): AnyJsonBody<TransactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = state.ledger.deposit(&claims, req.user_id, req.amount)?;
    Ok((StatusCode::OK, Json(account)))
}

/// Withdraw from the caller's own account
#[utoipa::path(
    delete,
    path = "/balance",
    request_body = TransactionRequest,
    responses(
        (status = 200, description = "Updated account", body = Account),
        (status = 400, description = "Malformed payload, negative amount or insufficient funds", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not a user, or user_id is not the caller's", body = ErrorResponse),
        (status = 404, description = "Caller has no account", body = ErrorResponse)
    ),
    tag = "Balance",
    security(("bearer_auth" = []))
)]
pub async fn withdraw(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    AnyJsonBody(req): AnyJsonBody<TransactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = state.ledger.withdraw(&claims, req.user_id, req.amount)?;
    Ok((StatusCode::OK, Json(account)))
}
