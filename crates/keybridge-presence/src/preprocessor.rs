use std::collections::VecDeque;

use keybridge_protocol::Stanza;

use crate::session::Session;

/// A server rule that sees every stanza before normal routing.
///
/// Returning `true` tells the host that the stanza was consumed: it must not
/// go through default processing, and whatever the rule pushed onto
/// `results` is routed instead.
pub trait StanzaPreprocessor: Send + Sync {
    /// Identifier recorded in a stanza's processed-by marks.
    fn id(&self) -> &str;

    fn preprocess(
        &self,
        stanza: &mut Stanza,
        session: Option<&Session>,
        results: &mut VecDeque<Stanza>,
    ) -> bool;
}
