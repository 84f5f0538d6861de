use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::{models::Role, services::Claims};

/// Require the authenticated caller to hold `required`.
///
/// Must sit inside [`super::auth_middleware`]; without claims it fails closed.
pub async fn require_role(
    State(required): State<Role>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Unauthorized")))?;

    if claims.role != required {
        tracing::warn!(
            username = %claims.username,
            role = %claims.role,
            required_role = %required,
            path = %req.uri().path(),
            "Insufficient role"
        );
        return Err(AppError::Forbidden(anyhow::anyhow!("Forbidden")));
    }

    Ok(next.run(req).await)
}
