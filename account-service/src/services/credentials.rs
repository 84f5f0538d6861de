//! In-memory credential store.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::{Role, User};
use crate::services::ServiceError;

/// Registered identities behind a single lock.
///
/// Entries are append-only: never edited, never removed.
#[derive(Clone, Default)]
pub struct CredentialStore {
    users: Arc<Mutex<Vec<User>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn users(&self) -> Result<MutexGuard<'_, Vec<User>>, ServiceError> {
        self.users
            .lock()
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Credential store mutex poisoned: {}", e)))
    }

    /// Register a new identity. `role` must name one of the two known roles.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<User, ServiceError> {
        let role: Role = role.parse().map_err(|_| ServiceError::InvalidRole)?;

        let mut users = self.users()?;
        if users.iter().any(|u| u.username == username) {
            return Err(ServiceError::UsernameTaken);
        }

        let user = User {
            id: users.len() as i64 + 1,
            username: username.to_string(),
            password: password.to_string(),
            role,
        };
        users.push(user.clone());

        tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User registered");
        Ok(user)
    }

    /// Look up the identity matching both username and password.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        let users = self.users()?;
        users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .cloned()
            .ok_or(ServiceError::InvalidCredentials)
    }

    /// True when an identity has exactly this username and id.
    pub fn has_identity(&self, username: &str, user_id: i64) -> Result<bool, ServiceError> {
        let users = self.users()?;
        Ok(users
            .iter()
            .any(|u| u.username == username && u.id == user_id))
    }

    pub fn count(&self) -> Result<usize, ServiceError> {
        Ok(self.users()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_sequential_ids_and_echoes_role() -> Result<(), ServiceError> {
        let store = CredentialStore::new();
        let admin = store.register("root", "toor", "admin")?;
        let alice = store.register("alice", "pw", "user")?;

        assert_eq!(admin.id, 1);
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(alice.id, 2);
        assert_eq!(alice.role, Role::User);
        assert_eq!(store.count()?, 2);
        Ok(())
    }

    #[test]
    fn test_register_rejects_unknown_role() {
        let store = CredentialStore::new();
        for role in ["superuser", "Admin", "", "USER"] {
            assert!(matches!(
                store.register("mallory", "pw", role),
                Err(ServiceError::InvalidRole)
            ));
        }
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_register_rejects_duplicate_username() {
        let store = CredentialStore::new();
        store.register("alice", "pw", "user").unwrap();
        assert!(matches!(
            store.register("alice", "other", "admin"),
            Err(ServiceError::UsernameTaken)
        ));
    }

    #[test]
    fn test_authenticate_requires_matching_secret() {
        let store = CredentialStore::new();
        store.register("alice", "pw", "user").unwrap();

        assert_eq!(store.authenticate("alice", "pw").unwrap().id, 1);
        assert!(matches!(
            store.authenticate("alice", "wrong"),
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            store.authenticate("bob", "pw"),
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_has_identity_matches_username_and_id_together() {
        let store = CredentialStore::new();
        store.register("alice", "pw", "user").unwrap();
        store.register("bob", "pw", "user").unwrap();

        assert!(store.has_identity("alice", 1).unwrap());
        assert!(!store.has_identity("alice", 2).unwrap());
        assert!(!store.has_identity("carol", 1).unwrap());
    }
}
