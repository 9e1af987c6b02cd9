use std::collections::VecDeque;
use std::sync::Arc;

use keybridge_crypto::Keyring;
use keybridge_protocol::{has_public_key, KeyPayload, Stanza, ELEM_PRESENCE};

use crate::config::PluginSettings;
use crate::preprocessor::StanzaPreprocessor;
use crate::roster::{PresenceType, SubscriptionOracle};
use crate::session::{Session, SessionContext};
use crate::PresenceError;

/// Rule identifier, recorded on stanzas this rule consumes.
pub const PLUGIN_ID: &str = "presence/urn:xmpp:pubkey:2";

/// What the pipeline should do with an intercepted stanza.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// Not ours: continue with default processing.
    Unhandled,
    /// Drop the original and route this stanza instead.
    Replace(Stanza),
}

/// Attaches the sender's public key to outbound subscription requests
/// towards contacts that do not yet receive the sender's presence.
///
/// The recipient can then verify who is asking before approving. Every
/// failure along the way degrades to [`Outcome::Unhandled`] so that
/// subscription delivery never depends on the keyring being healthy.
///
/// Holds no mutable state; one instance may serve all sessions concurrently.
pub struct PresenceSubscribePublicKey {
    roster: Arc<dyn SubscriptionOracle>,
    sessions: Arc<dyn SessionContext>,
    keyring: Arc<dyn Keyring>,
    settings: PluginSettings,
}

impl PresenceSubscribePublicKey {
    pub fn new(
        roster: Arc<dyn SubscriptionOracle>,
        sessions: Arc<dyn SessionContext>,
        keyring: Arc<dyn Keyring>,
    ) -> Self {
        Self {
            roster,
            sessions,
            keyring,
            settings: PluginSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PluginSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    /// Decide what happens to `stanza`.
    ///
    /// The original stanza is never modified; a replacement is a copy with
    /// the `<pubkey/>` element appended and the same routing addresses.
    pub fn intercept(&self, stanza: &Stanza, session: Option<&Session>) -> Outcome {
        if !self.settings.enabled {
            return Outcome::Unhandled;
        }
        let Some(session) = session.filter(|s| s.is_authorized()) else {
            return Outcome::Unhandled;
        };
        if stanza.elem_name() != ELEM_PRESENCE {
            return Outcome::Unhandled;
        }

        match self.try_intercept(stanza, session) {
            Ok(Some(replacement)) => Outcome::Replace(replacement),
            Ok(None) => Outcome::Unhandled,
            Err(e) => {
                log_failure(session, &e);
                Outcome::Unhandled
            }
        }
    }

    fn try_intercept(
        &self,
        stanza: &Stanza,
        session: &Session,
    ) -> Result<Option<Stanza>, PresenceError> {
        if !self.needs_public_key(stanza, session)? {
            return Ok(None);
        }
        self.attach_public_key(stanza, session)
    }

    /// Eligibility checks, in order: outbound subscribe, recipient not yet
    /// subscribed from us, no payload already present.
    fn needs_public_key(&self, stanza: &Stanza, session: &Session) -> Result<bool, PresenceError> {
        if self.roster.presence_type(session, stanza)? != Some(PresenceType::OutSubscribe) {
            return Ok(false);
        }
        let Some(to) = stanza.to() else {
            return Ok(false);
        };
        if self.roster.is_subscribed_from(session, to)? {
            tracing::trace!(rule = PLUGIN_ID, to = %to, "contact already subscribed from user");
            return Ok(false);
        }
        if has_public_key(stanza) {
            tracing::trace!(rule = PLUGIN_ID, to = %to, "stanza already carries a public key");
            return Ok(false);
        }
        Ok(true)
    }

    fn attach_public_key(
        &self,
        stanza: &Stanza,
        session: &Session,
    ) -> Result<Option<Stanza>, PresenceError> {
        let Some(fingerprint) = self.sessions.fingerprint(session) else {
            tracing::debug!(rule = PLUGIN_ID, session = session.id(), "no fingerprint on session");
            return Ok(None);
        };

        let key = match self.keyring.export_key(&fingerprint)? {
            Some(key) if !key.is_empty() => key,
            _ => {
                tracing::debug!(
                    rule = PLUGIN_ID,
                    fingerprint = %fingerprint,
                    "keyring has no key for fingerprint"
                );
                return Ok(None);
            }
        };

        let payload = KeyPayload::new(key, &fingerprint);
        let element = stanza.element().with_child(payload.to_element());
        let replacement =
            Stanza::with_addresses(element, stanza.from().cloned(), stanza.to().cloned());

        tracing::debug!(
            rule = PLUGIN_ID,
            to = ?stanza.to().map(ToString::to_string),
            fingerprint = %fingerprint,
            "public key attached to subscription request"
        );
        Ok(Some(replacement))
    }
}

impl StanzaPreprocessor for PresenceSubscribePublicKey {
    fn id(&self) -> &str {
        PLUGIN_ID
    }

    fn preprocess(
        &self,
        stanza: &mut Stanza,
        session: Option<&Session>,
        results: &mut VecDeque<Stanza>,
    ) -> bool {
        match self.intercept(stanza, session) {
            Outcome::Replace(replacement) => {
                stanza.mark_processed(PLUGIN_ID);
                results.push_back(replacement);
                true
            }
            Outcome::Unhandled => false,
        }
    }
}

fn log_failure(session: &Session, error: &PresenceError) {
    let user = session.bare_jid().map(ToString::to_string).unwrap_or_default();
    match error {
        PresenceError::Storage(_) => {
            tracing::error!(rule = PLUGIN_ID, user = %user, error = %error, "unable to access roster storage");
        }
        PresenceError::KeyExport(_) => {
            tracing::warn!(rule = PLUGIN_ID, user = %user, error = %error, "unable to load key for user");
        }
        PresenceError::NotAuthorized(_) => {
            tracing::warn!(rule = PLUGIN_ID, user = %user, error = %error, "not authorized");
        }
        PresenceError::Config(_) => {
            tracing::warn!(rule = PLUGIN_ID, error = %error, "rule misconfigured");
        }
    }
}
