use std::collections::HashMap;

use keybridge_protocol::Jid;
use parking_lot::RwLock;

use crate::PresenceError;

/// Session data node written by certificate authentication.
pub const DATA_NODE_AUTH: &str = "auth/certificate";
/// Key under [`DATA_NODE_AUTH`] holding the client key fingerprint.
pub const KEY_FINGERPRINT: &str = "fingerprint";

/// A client connection as seen by server rules.
///
/// An unauthenticated session has no user JID and is never authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    user: Option<Jid>,
}

impl Session {
    /// A session that has not completed authentication yet.
    pub fn unauthenticated(id: &str) -> Self {
        Self {
            id: id.to_string(),
            user: None,
        }
    }

    /// An authenticated session for `user` (stored as a bare JID).
    pub fn authenticated(id: &str, user: &Jid) -> Self {
        Self {
            id: id.to_string(),
            user: Some(user.to_bare()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_authorized(&self) -> bool {
        self.user.is_some()
    }

    /// Bare JID of the authenticated user.
    pub fn bare_jid(&self) -> Result<&Jid, PresenceError> {
        self.user
            .as_ref()
            .ok_or_else(|| PresenceError::NotAuthorized(format!("session {}", self.id)))
    }

    /// Whether `jid` (bare or full) belongs to this session's user.
    pub fn is_user_id(&self, jid: &Jid) -> bool {
        self.user.as_ref().is_some_and(|user| *user == jid.to_bare())
    }
}

/// Read access to per-session data set up by authentication.
pub trait SessionContext: Send + Sync {
    /// Fingerprint of the key the session authenticated with, if any.
    fn fingerprint(&self, session: &Session) -> Option<String>;
}

/// In-memory per-session key/value storage, grouped by data node.
#[derive(Default)]
pub struct MemorySessionData {
    data: RwLock<HashMap<String, HashMap<(String, String), String>>>,
}

impl MemorySessionData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_data(&self, session: &Session, node: &str, key: &str, value: &str) {
        self.data
            .write()
            .entry(session.id().to_string())
            .or_default()
            .insert((node.to_string(), key.to_string()), value.to_string());
    }

    pub fn get_data(&self, session: &Session, node: &str, key: &str) -> Option<String> {
        self.data
            .read()
            .get(session.id())
            .and_then(|entries| entries.get(&(node.to_string(), key.to_string())))
            .cloned()
    }

    pub fn remove_data(&self, session: &Session, node: &str, key: &str) -> Option<String> {
        self.data
            .write()
            .get_mut(session.id())
            .and_then(|entries| entries.remove(&(node.to_string(), key.to_string())))
    }

    /// Drop everything stored for a session (on disconnect).
    pub fn clear_session(&self, session: &Session) {
        self.data.write().remove(session.id());
    }
}

impl SessionContext for MemorySessionData {
    fn fingerprint(&self, session: &Session) -> Option<String> {
        self.get_data(session, DATA_NODE_AUTH, KEY_FINGERPRINT)
    }
}
