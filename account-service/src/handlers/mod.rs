//! HTTP handlers for account-service.

pub mod accounts;
pub mod auth;
pub mod balance;
pub mod metrics;

pub use accounts::{create_account, list_accounts};
pub use auth::{login, register};
pub use balance::{deposit, get_balance, withdraw};
