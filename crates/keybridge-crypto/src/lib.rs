pub mod error;
pub mod file_keyring;
pub mod keyring;
pub mod memory_keyring;

pub use error::KeyringError;
pub use file_keyring::FileKeyring;
pub use keyring::{normalize_fingerprint, Keyring};
pub use memory_keyring::MemoryKeyring;
