use std::collections::HashMap;

use keybridge_protocol::{Jid, Stanza, StanzaType, ELEM_PRESENCE};
use parking_lot::RwLock;

use crate::session::Session;
use crate::PresenceError;

/// A presence stanza classified from the point of view of a session's user.
///
/// `Out*` stanzas are sent by the user, `In*` stanzas are addressed to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresenceType {
    OutInitial,
    OutSubscribe,
    OutSubscribed,
    OutUnsubscribe,
    OutUnsubscribed,
    OutProbe,
    InInitial,
    InSubscribe,
    InSubscribed,
    InUnsubscribe,
    InUnsubscribed,
    InProbe,
    Error,
}

/// Subscription state of one roster item (RFC 6121, appendix A).
///
/// `To` means the user receives the contact's presence, `From` means the
/// contact receives the user's presence. `Pending*` marks a request that has
/// been sent (`Out`) or received (`In`) but not answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubscriptionState {
    #[default]
    None,
    NonePendingOut,
    NonePendingIn,
    NonePendingOutIn,
    To,
    ToPendingIn,
    From,
    FromPendingOut,
    Both,
}

impl SubscriptionState {
    /// The contact is subscribed to the user's presence.
    pub fn is_from(self) -> bool {
        matches!(self, Self::From | Self::FromPendingOut | Self::Both)
    }

    /// The user is subscribed to the contact's presence.
    pub fn is_to(self) -> bool {
        matches!(self, Self::To | Self::ToPendingIn | Self::Both)
    }
}

/// Read access to roster subscription state.
///
/// Implemented by the server's roster store. Errors carry the reason the
/// store could not answer; callers decide whether that blocks anything.
pub trait SubscriptionOracle: Send + Sync {
    /// Classify a stanza relative to the session's user.
    ///
    /// Returns `Ok(None)` for stanzas that are not a recognised presence.
    fn presence_type(
        &self,
        session: &Session,
        stanza: &Stanza,
    ) -> Result<Option<PresenceType>, PresenceError>;

    /// Whether `jid` holds a "from" subscription on the session's user.
    fn is_subscribed_from(&self, session: &Session, jid: &Jid) -> Result<bool, PresenceError>;
}

/// Classify a presence stanza for an authenticated session.
///
/// A stanza addressed to the session's own bare JID is inbound; anything
/// else, including a stanza without `to`, is outbound.
pub fn classify_presence(
    session: &Session,
    stanza: &Stanza,
) -> Result<Option<PresenceType>, PresenceError> {
    session.bare_jid()?;

    if stanza.elem_name() != ELEM_PRESENCE {
        return Ok(None);
    }

    let inbound = stanza.to().is_some_and(|to| session.is_user_id(to));
    let kind = match (stanza.stanza_type(), inbound) {
        (StanzaType::Error, _) => PresenceType::Error,
        (StanzaType::Available | StanzaType::Unavailable, false) => PresenceType::OutInitial,
        (StanzaType::Available | StanzaType::Unavailable, true) => PresenceType::InInitial,
        (StanzaType::Subscribe, false) => PresenceType::OutSubscribe,
        (StanzaType::Subscribe, true) => PresenceType::InSubscribe,
        (StanzaType::Subscribed, false) => PresenceType::OutSubscribed,
        (StanzaType::Subscribed, true) => PresenceType::InSubscribed,
        (StanzaType::Unsubscribe, false) => PresenceType::OutUnsubscribe,
        (StanzaType::Unsubscribe, true) => PresenceType::InUnsubscribe,
        (StanzaType::Unsubscribed, false) => PresenceType::OutUnsubscribed,
        (StanzaType::Unsubscribed, true) => PresenceType::InUnsubscribed,
        (StanzaType::Probe, false) => PresenceType::OutProbe,
        (StanzaType::Probe, true) => PresenceType::InProbe,
        (StanzaType::Other(_), _) => return Ok(None),
    };
    Ok(Some(kind))
}

/// In-memory roster: owner bare JID → contact bare JID → state.
#[derive(Default)]
pub struct MemoryRoster {
    rosters: RwLock<HashMap<Jid, HashMap<Jid, SubscriptionState>>>,
}

impl MemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_subscription(&self, owner: &Jid, contact: &Jid, state: SubscriptionState) {
        self.rosters
            .write()
            .entry(owner.to_bare())
            .or_default()
            .insert(contact.to_bare(), state);
    }

    /// State of `contact` in `owner`'s roster; `None` state when absent.
    pub fn subscription(&self, owner: &Jid, contact: &Jid) -> SubscriptionState {
        self.rosters
            .read()
            .get(&owner.to_bare())
            .and_then(|items| items.get(&contact.to_bare()))
            .copied()
            .unwrap_or_default()
    }

    pub fn remove_contact(&self, owner: &Jid, contact: &Jid) -> bool {
        self.rosters
            .write()
            .get_mut(&owner.to_bare())
            .is_some_and(|items| items.remove(&contact.to_bare()).is_some())
    }
}

impl SubscriptionOracle for MemoryRoster {
    fn presence_type(
        &self,
        session: &Session,
        stanza: &Stanza,
    ) -> Result<Option<PresenceType>, PresenceError> {
        classify_presence(session, stanza)
    }

    fn is_subscribed_from(&self, session: &Session, jid: &Jid) -> Result<bool, PresenceError> {
        let owner = session.bare_jid()?;
        Ok(self.subscription(owner, jid).is_from())
    }
}
