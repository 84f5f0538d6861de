//! Balance-holding account owned by one registered user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    #[schema(example = 1)]
    pub id: i64,
    /// Owning identity's id.
    #[schema(example = 1)]
    pub user_id: i64,
    #[schema(example = 100.0)]
    pub balance: f64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: i64, user_id: i64, balance: f64) -> Self {
        Self {
            id,
            user_id,
            balance,
            created_at: Utc::now(),
        }
    }
}
