pub mod config;
pub mod error;
pub mod interceptor;
pub mod preprocessor;
pub mod roster;
pub mod session;
#[cfg(test)]
mod test_stores;

pub use config::PluginSettings;
pub use error::PresenceError;
pub use interceptor::{Outcome, PresenceSubscribePublicKey, PLUGIN_ID};
pub use preprocessor::StanzaPreprocessor;
pub use roster::{classify_presence, MemoryRoster, PresenceType, SubscriptionOracle, SubscriptionState};
pub use session::{MemorySessionData, Session, SessionContext, DATA_NODE_AUTH, KEY_FINGERPRINT};
