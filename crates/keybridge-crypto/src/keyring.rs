use crate::KeyringError;

/// Trait for public key storage, addressed by key fingerprint.
///
/// The server implements this over its key store; keybridge only ever
/// exports. Key import, generation and revocation belong to whoever owns
/// the store.
pub trait Keyring: Send + Sync {
    /// Export the public key bytes for a fingerprint.
    ///
    /// Returns `Ok(None)` when the keyring has no key for it.
    fn export_key(&self, fingerprint: &str) -> Result<Option<Vec<u8>>, KeyringError>;
}

/// Canonical form of a fingerprint: hex digits only, upper-case.
///
/// Whitespace is dropped so that grouped display forms such as
/// `"37D0 E678 CDD1 ..."` resolve to the same key.
pub fn normalize_fingerprint(fingerprint: &str) -> Result<String, KeyringError> {
    let compact: String = fingerprint
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if compact.is_empty() {
        return Err(KeyringError::InvalidFingerprint("empty fingerprint".into()));
    }
    hex::decode(&compact)
        .map_err(|e| KeyringError::InvalidFingerprint(format!("{fingerprint:?}: {e}")))?;

    Ok(compact)
}
