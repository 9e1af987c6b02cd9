//! In-memory keyring.
//!
//! Suitable for tests and for embedding servers that load their keys at
//! startup. Nothing is persisted.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::keyring::{normalize_fingerprint, Keyring};
use crate::KeyringError;

/// Keyring holding exported key bytes in a map keyed by normalized fingerprint.
pub struct MemoryKeyring {
    keys: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryKeyring {
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Store key bytes under a fingerprint, replacing any previous key.
    pub fn import_key(&self, fingerprint: &str, key_data: &[u8]) -> Result<(), KeyringError> {
        let fingerprint = normalize_fingerprint(fingerprint)?;
        self.keys.write().insert(fingerprint, key_data.to_vec());
        Ok(())
    }

    pub fn remove_key(&self, fingerprint: &str) -> Result<bool, KeyringError> {
        let fingerprint = normalize_fingerprint(fingerprint)?;
        Ok(self.keys.write().remove(&fingerprint).is_some())
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }
}

impl Default for MemoryKeyring {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyring for MemoryKeyring {
    fn export_key(&self, fingerprint: &str) -> Result<Option<Vec<u8>>, KeyringError> {
        let fingerprint = normalize_fingerprint(fingerprint)?;
        Ok(self.keys.read().get(&fingerprint).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_export_remove() {
        let keyring = MemoryKeyring::new();
        assert!(keyring.is_empty());

        keyring.import_key("abcd1234", &[1, 2, 3]).unwrap();
        assert_eq!(keyring.len(), 1);
        assert_eq!(keyring.export_key("ABCD1234").unwrap(), Some(vec![1, 2, 3]));

        assert!(keyring.remove_key("ABCD 1234").unwrap());
        assert_eq!(keyring.export_key("ABCD1234").unwrap(), None);
        assert!(!keyring.remove_key("ABCD1234").unwrap());
    }

    #[test]
    fn unknown_fingerprint_is_absent() {
        let keyring = MemoryKeyring::default();
        assert_eq!(keyring.export_key("FFFF").unwrap(), None);
    }

    #[test]
    fn invalid_fingerprint_is_an_error() {
        let keyring = MemoryKeyring::new();
        assert!(matches!(
            keyring.export_key("not-a-fingerprint"),
            Err(KeyringError::InvalidFingerprint(_))
        ));
        assert!(keyring.import_key("xyz", &[1]).is_err());
    }
}
