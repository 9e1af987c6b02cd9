use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid JID: {0}")]
    InvalidJid(String),

    #[error("missing element: {0}")]
    MissingElement(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}
