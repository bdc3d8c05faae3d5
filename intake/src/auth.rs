//! Shared-password access gate backed by a session flag.

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::store::SessionStore;

const AUTHENTICATED: &str = "true";

/// Gates the form behind a shared password for the browser session.
pub struct PasswordGate<S: SessionStore> {
    store: S,
    session_key: String,
    password_sha256: String,
}

impl<S: SessionStore> PasswordGate<S> {
    pub fn new(store: S, config: &IntakeConfig) -> Self {
        Self {
            store,
            session_key: config.session_key.clone(),
            password_sha256: config.password_sha256.to_lowercase(),
        }
    }

    /// Whether this session already passed the gate.
    pub fn is_authenticated(&self) -> bool {
        match self.store.get(&self.session_key) {
            Ok(flag) => flag.as_deref() == Some(AUTHENTICATED),
            Err(e) => {
                warn!(error = %e, "Could not read session flag");
                false
            }
        }
    }

    /// Check a password and open the gate on success.
    pub fn check_password(&self, input: &str) -> Result<(), IntakeError> {
        if hash_password(input) != self.password_sha256 {
            info!("Rejected access attempt");
            return Err(IntakeError::IncorrectPassword);
        }
        self.store.set(&self.session_key, AUTHENTICATED)?;
        info!("Session authenticated");
        Ok(())
    }

    /// Close the gate for this session.
    pub fn logout(&self) -> Result<(), IntakeError> {
        self.store.clear(&self.session_key)?;
        Ok(())
    }
}

/// SHA-256 hex digest of a password.
pub fn hash_password(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_default_password() {
        let session = MemoryStore::new();
        let gate = PasswordGate::new(session.clone(), &IntakeConfig::default());
        assert!(!gate.is_authenticated());

        gate.check_password("speedrun2025").unwrap();

        assert!(gate.is_authenticated());
        assert_eq!(session.peek("speedrunAuthenticated").as_deref(), Some("true"));
    }

    #[test]
    fn test_wrong_password_leaves_gate_closed() {
        let gate = PasswordGate::new(MemoryStore::new(), &IntakeConfig::default());

        let err = gate.check_password("speedrun2024").unwrap_err();

        assert!(matches!(err, IntakeError::IncorrectPassword));
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn test_logout_and_custom_digest() {
        let config = IntakeConfig {
            password_sha256: hash_password("hunter2").to_uppercase(),
            ..IntakeConfig::default()
        };
        let gate = PasswordGate::new(MemoryStore::new(), &config);

        gate.check_password("hunter2").unwrap();
        gate.logout().unwrap();

        assert!(!gate.is_authenticated());
    }

    #[test]
    fn test_other_flag_values_are_not_authenticated() {
        let session = MemoryStore::new().with_entry("speedrunAuthenticated", "yes");
        let gate = PasswordGate::new(session, &IntakeConfig::default());
        assert!(!gate.is_authenticated());
    }
}
