use std::collections::BTreeSet;

use crate::element::Element;
use crate::error::ProtocolError;
use crate::jid::Jid;

pub const ELEM_PRESENCE: &str = "presence";
pub const ELEM_MESSAGE: &str = "message";
pub const ELEM_IQ: &str = "iq";

pub const ATTR_FROM: &str = "from";
pub const ATTR_TO: &str = "to";
pub const ATTR_TYPE: &str = "type";

/// The `type` attribute of a stanza.
///
/// Only the presence values matter to keybridge; anything else is kept as
/// `Other` so it can still be told apart from a plain availability update.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StanzaType {
    /// No `type` attribute: a plain presence/status broadcast.
    Available,
    Unavailable,
    Subscribe,
    Subscribed,
    Unsubscribe,
    Unsubscribed,
    Probe,
    Error,
    Other(String),
}

impl StanzaType {
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            None => Self::Available,
            Some("unavailable") => Self::Unavailable,
            Some("subscribe") => Self::Subscribe,
            Some("subscribed") => Self::Subscribed,
            Some("unsubscribe") => Self::Unsubscribe,
            Some("unsubscribed") => Self::Unsubscribed,
            Some("probe") => Self::Probe,
            Some("error") => Self::Error,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    /// Attribute value for this type; `None` for `Available`.
    pub fn as_attr(&self) -> Option<&str> {
        match self {
            Self::Available => None,
            Self::Unavailable => Some("unavailable"),
            Self::Subscribe => Some("subscribe"),
            Self::Subscribed => Some("subscribed"),
            Self::Unsubscribe => Some("unsubscribe"),
            Self::Unsubscribed => Some("unsubscribed"),
            Self::Probe => Some("probe"),
            Self::Error => Some("error"),
            Self::Other(other) => Some(other.as_str()),
        }
    }
}

/// A routed stanza: its element plus the addresses the router acts on.
///
/// `processed_by` records which server rules have consumed this stanza, so
/// later rules and the default handlers can skip it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    element: Element,
    from: Option<Jid>,
    to: Option<Jid>,
    processed_by: BTreeSet<String>,
}

impl Stanza {
    /// Wrap an element, reading routing addresses from its `from`/`to`
    /// attributes.
    pub fn from_element(element: Element) -> Result<Self, ProtocolError> {
        let from = element.get_attr(ATTR_FROM).map(Jid::parse).transpose()?;
        let to = element.get_attr(ATTR_TO).map(Jid::parse).transpose()?;
        Ok(Self::with_addresses(element, from, to))
    }

    /// Wrap an element with explicit routing addresses.
    ///
    /// The element's own attributes are left as they are.
    pub fn with_addresses(element: Element, from: Option<Jid>, to: Option<Jid>) -> Self {
        Self {
            element,
            from,
            to,
            processed_by: BTreeSet::new(),
        }
    }

    /// Build a `<presence/>` stanza of the given type between two addresses.
    pub fn presence(kind: &StanzaType, from: &Jid, to: &Jid) -> Self {
        let mut element = Element::new(ELEM_PRESENCE)
            .attr(ATTR_FROM, &from.to_string())
            .attr(ATTR_TO, &to.to_string());
        if let Some(value) = kind.as_attr() {
            element.set_attr(ATTR_TYPE, value);
        }
        Self::with_addresses(element, Some(from.clone()), Some(to.clone()))
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn into_element(self) -> Element {
        self.element
    }

    /// Name of the top-level element (`presence`, `message`, `iq`, ...).
    pub fn elem_name(&self) -> &str {
        self.element.name()
    }

    pub fn stanza_type(&self) -> StanzaType {
        StanzaType::from_attr(self.element.get_attr(ATTR_TYPE))
    }

    pub fn from(&self) -> Option<&Jid> {
        self.from.as_ref()
    }

    pub fn to(&self) -> Option<&Jid> {
        self.to.as_ref()
    }

    pub fn get_child(&self, name: &str, xmlns: &str) -> Option<&Element> {
        self.element.get_child(name, xmlns)
    }

    /// Record that the rule `id` has consumed this stanza.
    pub fn mark_processed(&mut self, id: &str) {
        self.processed_by.insert(id.to_string());
    }

    pub fn was_processed_by(&self, id: &str) -> bool {
        self.processed_by.contains(id)
    }

    pub fn is_processed(&self) -> bool {
        !self.processed_by.is_empty()
    }
}
