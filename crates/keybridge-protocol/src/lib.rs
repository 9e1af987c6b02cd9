pub mod element;
pub mod error;
pub mod jid;
pub mod pubkey;
pub mod stanza;

pub use element::Element;
pub use error::ProtocolError;
pub use jid::Jid;
pub use pubkey::{has_public_key, KeyPayload, ELEM_PUBKEY, NS_PUBKEY};
pub use stanza::{Stanza, StanzaType, ELEM_PRESENCE};
