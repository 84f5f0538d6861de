//! Domain models for account-service.

mod account;
mod user;

pub use account::Account;
pub use user::{Role, User};
