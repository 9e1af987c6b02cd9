use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyringError {
    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    #[error("keyring I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for KeyringError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
