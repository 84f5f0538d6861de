pub mod account;
pub mod auth;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Forbidden")]
    pub error: String,
    /// Field-level messages, present on validation failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
