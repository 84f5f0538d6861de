use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    /// Id of the user the account is opened for.
    #[validate(range(min = 1, message = "user_id must be positive"))]
    #[schema(example = 1)]
    pub user_id: i64,

    /// Opening balance, defaults to zero.
    #[serde(default)]
    #[schema(example = 0.0)]
    pub balance: f64,
}

/// `user_id` stays a raw string so an unparseable value can be treated as an
/// id nobody owns instead of a malformed request.
#[derive(Debug, Deserialize, IntoParams)]
pub struct BalanceQuery {
    #[param(example = "1")]
    pub user_id: Option<String>,
}

impl BalanceQuery {
    pub fn user_id(&self) -> i64 {
        self.user_id
            .as_deref()
            .and_then(|id| id.trim().parse().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = 100.0)]
    pub balance: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransactionRequest {
    #[schema(example = 1)]
    pub user_id: i64,
    #[schema(example = 50.0)]
    pub amount: f64,
}
