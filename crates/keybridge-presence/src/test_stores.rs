//! Collaborator fakes that fail on purpose.

use std::sync::atomic::{AtomicUsize, Ordering};

use keybridge_crypto::{Keyring, KeyringError};
use keybridge_protocol::{Jid, Stanza};

use crate::roster::{classify_presence, PresenceType, SubscriptionOracle};
use crate::session::Session;
use crate::PresenceError;

/// Which roster call fails.
#[derive(Debug, Clone, Copy)]
pub enum RosterFailure {
    Classify,
    SubscribedFrom,
}

/// Roster whose backing database is unreachable.
pub struct BrokenRoster(pub RosterFailure);

impl SubscriptionOracle for BrokenRoster {
    fn presence_type(
        &self,
        session: &Session,
        stanza: &Stanza,
    ) -> Result<Option<PresenceType>, PresenceError> {
        match self.0 {
            RosterFailure::Classify => Err(PresenceError::Storage("connection refused".into())),
            RosterFailure::SubscribedFrom => classify_presence(session, stanza),
        }
    }

    fn is_subscribed_from(&self, _session: &Session, _jid: &Jid) -> Result<bool, PresenceError> {
        Err(PresenceError::Storage("connection refused".into()))
    }
}

/// Roster that considers every session unauthorized.
pub struct UnauthorizedRoster;

impl SubscriptionOracle for UnauthorizedRoster {
    fn presence_type(
        &self,
        session: &Session,
        _stanza: &Stanza,
    ) -> Result<Option<PresenceType>, PresenceError> {
        Err(PresenceError::NotAuthorized(format!("session {}", session.id())))
    }

    fn is_subscribed_from(&self, session: &Session, _jid: &Jid) -> Result<bool, PresenceError> {
        Err(PresenceError::NotAuthorized(format!("session {}", session.id())))
    }
}

/// Keyring whose export always hits an I/O error.
pub struct FailingKeyring;

impl Keyring for FailingKeyring {
    fn export_key(&self, fingerprint: &str) -> Result<Option<Vec<u8>>, KeyringError> {
        Err(KeyringError::Io(format!("{fingerprint}.key: input/output error")))
    }
}

/// Keyring that counts lookups and never finds anything.
#[derive(Default)]
pub struct RecordingKeyring {
    calls: AtomicUsize,
}

impl RecordingKeyring {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Keyring for RecordingKeyring {
    fn export_key(&self, _fingerprint: &str) -> Result<Option<Vec<u8>>, KeyringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}
