use base64::Engine as _;

use crate::element::Element;
use crate::error::ProtocolError;
use crate::stanza::Stanza;

/// Element name of the public key payload.
pub const ELEM_PUBKEY: &str = "pubkey";
/// Namespace of the public key payload.
pub const NS_PUBKEY: &str = "urn:xmpp:pubkey:2";
/// Child holding the base64-encoded key bytes.
pub const ELEM_KEY: &str = "key";
/// Child holding the key fingerprint.
pub const ELEM_PRINT: &str = "print";

/// Public key material attached to a presence stanza.
///
/// Wire form:
///
/// ```text
/// <pubkey xmlns="urn:xmpp:pubkey:2">
///   <key>BASE64</key>
///   <print>FINGERPRINT</print>
/// </pubkey>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPayload {
    key: Vec<u8>,
    fingerprint: String,
}

impl KeyPayload {
    pub fn new(key: Vec<u8>, fingerprint: &str) -> Self {
        Self {
            key,
            fingerprint: fingerprint.to_string(),
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// The key bytes as they appear in the `<key/>` child.
    pub fn encoded_key(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.key)
    }

    /// Build the `<pubkey/>` element.
    pub fn to_element(&self) -> Element {
        let mut pubkey = Element::with_xmlns(ELEM_PUBKEY, NS_PUBKEY);
        pubkey.add_child(Element::text_node(ELEM_KEY, &self.encoded_key()));
        pubkey.add_child(Element::text_node(ELEM_PRINT, &self.fingerprint));
        pubkey
    }

    /// Decode a `<pubkey/>` element.
    ///
    /// Whitespace inside the base64 text is ignored, since some clients wrap
    /// long keys across lines.
    pub fn from_element(element: &Element) -> Result<Self, ProtocolError> {
        if element.name() != ELEM_PUBKEY || element.xmlns() != Some(NS_PUBKEY) {
            return Err(ProtocolError::InvalidPayload(format!(
                "expected <{ELEM_PUBKEY} xmlns='{NS_PUBKEY}'>, got <{}>",
                element.name()
            )));
        }

        let encoded: String = element
            .find_child(ELEM_KEY)
            .and_then(Element::text)
            .ok_or_else(|| ProtocolError::MissingElement(ELEM_KEY.into()))?
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let fingerprint = element
            .find_child(ELEM_PRINT)
            .and_then(Element::text)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ProtocolError::MissingElement(ELEM_PRINT.into()))?;

        let key = base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| ProtocolError::InvalidPayload(format!("invalid base64 key: {e}")))?;
        if key.is_empty() {
            return Err(ProtocolError::InvalidPayload("empty key".into()));
        }

        Ok(Self::new(key, fingerprint))
    }

    /// Decode the payload carried by a stanza, if it has one.
    pub fn from_stanza(stanza: &Stanza) -> Option<Result<Self, ProtocolError>> {
        stanza
            .get_child(ELEM_PUBKEY, NS_PUBKEY)
            .map(Self::from_element)
    }
}

/// Whether the stanza already carries a `<pubkey/>` payload.
pub fn has_public_key(stanza: &Stanza) -> bool {
    stanza.get_child(ELEM_PUBKEY, NS_PUBKEY).is_some()
}
