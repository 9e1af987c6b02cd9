use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::keyring::{normalize_fingerprint, Keyring};
use crate::KeyringError;

/// File extension of exported key files.
pub const KEY_FILE_EXTENSION: &str = "key";

/// Keyring backed by a directory of exported keys, one `<FINGERPRINT>.key`
/// file per key.
///
/// Fingerprints are normalized (hex only) before a path is built, so a
/// lookup can never escape the directory.
#[derive(Debug, Clone)]
pub struct FileKeyring {
    dir: PathBuf,
}

impl FileKeyring {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open a keyring directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, KeyringError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "file keyring opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write key bytes for a fingerprint, replacing any previous file.
    pub fn import_key(&self, fingerprint: &str, key_data: &[u8]) -> Result<(), KeyringError> {
        let path = self.key_path(fingerprint)?;
        std::fs::write(&path, key_data)?;
        tracing::debug!(path = %path.display(), len = key_data.len(), "key imported");
        Ok(())
    }

    fn key_path(&self, fingerprint: &str) -> Result<PathBuf, KeyringError> {
        let fingerprint = normalize_fingerprint(fingerprint)?;
        Ok(self.dir.join(format!("{fingerprint}.{KEY_FILE_EXTENSION}")))
    }
}

impl Keyring for FileKeyring {
    fn export_key(&self, fingerprint: &str) -> Result<Option<Vec<u8>>, KeyringError> {
        let path = self.key_path(fingerprint)?;
        match std::fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KeyringError::Io(format!("{}: {e}", path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_then_export() {
        let dir = tempfile::TempDir::new().unwrap();
        let keyring = FileKeyring::open(dir.path().join("keys")).unwrap();

        keyring.import_key("abcd1234", &[0x01, 0x02, 0x03]).unwrap();
        assert!(keyring.dir().join("ABCD1234.key").exists());
        assert_eq!(
            keyring.export_key("ABCD1234").unwrap(),
            Some(vec![0x01, 0x02, 0x03])
        );
    }

    #[test]
    fn missing_key_is_absent() {
        let dir = tempfile::TempDir::new().unwrap();
        let keyring = FileKeyring::new(dir.path());
        assert_eq!(keyring.export_key("FFFF").unwrap(), None);
    }

    #[test]
    fn unreadable_key_is_an_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("ABCD.key")).unwrap();

        let keyring = FileKeyring::new(dir.path());
        assert!(matches!(
            keyring.export_key("abcd"),
            Err(KeyringError::Io(_))
        ));
    }

    #[test]
    fn path_traversal_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let keyring = FileKeyring::new(dir.path());
        assert!(matches!(
            keyring.export_key("../secret"),
            Err(KeyringError::InvalidFingerprint(_))
        ));
    }
}
