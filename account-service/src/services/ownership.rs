//! Object-level authorization: binds a verified claim to a user id.

use crate::services::{Claims, CredentialStore, ServiceError};

#[derive(Clone)]
pub struct OwnershipValidator {
    credentials: CredentialStore,
}

impl OwnershipValidator {
    pub fn new(credentials: CredentialStore) -> Self {
        Self { credentials }
    }

    /// True only when the claim's username resolves to the identity with `user_id`.
    pub fn is_owner(&self, claims: &Claims, user_id: i64) -> Result<bool, ServiceError> {
        self.credentials.has_identity(&claims.username, user_id)
    }

    pub fn ensure_owner(&self, claims: &Claims, user_id: i64) -> Result<(), ServiceError> {
        if self.is_owner(claims, user_id)? {
            Ok(())
        } else {
            tracing::warn!(
                username = %claims.username,
                requested_user_id = user_id,
                "Ownership check failed"
            );
            Err(ServiceError::Forbidden)
        }
    }
}
