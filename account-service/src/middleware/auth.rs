use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::IntoResponse,
};
use service_core::error::AppError;

use crate::{services::Claims, AppState};

/// Authorization gate: nothing behind this layer runs without verified claims.
///
/// A missing header, a bad signature and an expired token all yield the same
/// `401` so callers cannot tell which check failed.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, AppError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Missing token")))?;

    let claims = state
        .tokens
        .verify(token)
        .map_err(|_| AppError::Unauthorized(anyhow::anyhow!("Unauthorized")))?;

    tracing::debug!(username = %claims.username, role = %claims.role, "Request authenticated");

    // Store claims in request extensions so handlers can access them
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Token from the `Authorization` header; the `Bearer ` prefix is optional.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Extractor to easily get claims in handlers
pub struct AuthUser(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Unauthorized")))?;

        Ok(AuthUser(claims.clone()))
    }
}
