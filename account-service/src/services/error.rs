use service_core::error::AppError;
use thiserror::Error;

/// Token verification failure.
///
/// Carries no cause: a forged, malformed or expired token are all the same
/// error to callers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Unauthorized")]
pub struct AuthError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Invalid role")]
    InvalidRole,

    #[error("Username already registered")]
    UsernameTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized(#[from] AuthError),

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("Account not found")]
    AccountNotFound,
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::InvalidRole => AppError::BadRequest(anyhow::anyhow!("Invalid role")),
            ServiceError::UsernameTaken => {
                AppError::Conflict(anyhow::anyhow!("Username already registered"))
            }
            ServiceError::InvalidCredentials => {
                AppError::Unauthorized(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::Unauthorized(_) => AppError::Unauthorized(anyhow::anyhow!("Unauthorized")),
            ServiceError::Forbidden => AppError::Forbidden(anyhow::anyhow!("Forbidden")),
            ServiceError::InvalidAmount => AppError::BadRequest(anyhow::anyhow!("Invalid amount")),
            // A business rule violation, reported as a client error.
            ServiceError::InsufficientFunds => {
                AppError::BadRequest(anyhow::anyhow!("insufficient funds"))
            }
            ServiceError::AccountNotFound => {
                AppError::NotFound(anyhow::anyhow!("Account not found"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn maps_to_expected_status_classes() {
        let cases = [
            (ServiceError::InvalidRole, StatusCode::BAD_REQUEST),
            (ServiceError::UsernameTaken, StatusCode::CONFLICT),
            (ServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ServiceError::Unauthorized(AuthError), StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden, StatusCode::FORBIDDEN),
            (ServiceError::InvalidAmount, StatusCode::BAD_REQUEST),
            (ServiceError::InsufficientFunds, StatusCode::BAD_REQUEST),
            (ServiceError::AccountNotFound, StatusCode::NOT_FOUND),
            (
                ServiceError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let label = err.to_string();
            assert_eq!(AppError::from(err).status_code(), expected, "{}", label);
        }
    }
}
