use thiserror::Error;

#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("session not authorized: {0}")]
    NotAuthorized(String),

    #[error("storage access failed: {0}")]
    Storage(String),

    #[error("key export failed: {0}")]
    KeyExport(String),

    #[error("invalid plugin settings: {0}")]
    Config(String),
}

impl From<keybridge_crypto::KeyringError> for PresenceError {
    fn from(e: keybridge_crypto::KeyringError) -> Self {
        Self::KeyExport(e.to_string())
    }
}
