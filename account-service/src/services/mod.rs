//! Services layer for account-service.
//!
//! Credential store, token issuance/verification, ownership checks and the
//! balance ledger. All state lives in process memory.

mod credentials;
pub mod error;
mod jwt;
mod ledger;
pub mod metrics;
mod ownership;

pub use credentials::CredentialStore;
pub use error::{AuthError, ServiceError};
pub use jwt::{Claims, TokenService, TOKEN_TTL_SECONDS};
pub use ledger::Ledger;
pub use ownership::OwnershipValidator;
