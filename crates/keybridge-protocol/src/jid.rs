use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// An XMPP address: `[node@]domain[/resource]`.
///
/// Node and domain are stored lower-cased so that bare-JID comparisons
/// between roster entries and stanza addresses are stable. The resource is
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Jid {
    node: Option<String>,
    domain: String,
    resource: Option<String>,
}

impl Jid {
    /// Parse a JID from its string form.
    pub fn parse(input: &str) -> Result<Self, ProtocolError> {
        let input = input.trim();

        let (bare, resource) = match input.split_once('/') {
            Some((_, "")) => {
                return Err(ProtocolError::InvalidJid(format!("empty resource in {input:?}")));
            }
            Some((bare, resource)) => (bare, Some(resource.to_string())),
            None => (input, None),
        };

        let (node, domain) = match bare.rsplit_once('@') {
            Some(("", _)) => {
                return Err(ProtocolError::InvalidJid(format!("empty node in {input:?}")));
            }
            Some((node, domain)) => (Some(node.to_lowercase()), domain),
            None => (None, bare),
        };

        if domain.is_empty() {
            return Err(ProtocolError::InvalidJid(format!("empty domain in {input:?}")));
        }
        if domain.contains('@') || node.as_deref().is_some_and(|n| n.contains('@')) {
            return Err(ProtocolError::InvalidJid(format!("unexpected '@' in {input:?}")));
        }

        Ok(Self {
            node,
            domain: domain.to_lowercase(),
            resource,
        })
    }

    /// Build a bare JID from its parts.
    pub fn bare(node: &str, domain: &str) -> Result<Self, ProtocolError> {
        Self::parse(&format!("{node}@{domain}"))
    }

    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn is_bare(&self) -> bool {
        self.resource.is_none()
    }

    /// This JID without its resource part.
    pub fn to_bare(&self) -> Self {
        Self {
            node: self.node.clone(),
            domain: self.domain.clone(),
            resource: None,
        }
    }

    /// Attach (or replace) the resource part.
    pub fn with_resource(&self, resource: &str) -> Result<Self, ProtocolError> {
        if resource.is_empty() {
            return Err(ProtocolError::InvalidJid("empty resource".into()));
        }
        Ok(Self {
            node: self.node.clone(),
            domain: self.domain.clone(),
            resource: Some(resource.to_string()),
        })
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(node) = &self.node {
            write!(f, "{node}@")?;
        }
        f.write_str(&self.domain)?;
        if let Some(resource) = &self.resource {
            write!(f, "/{resource}")?;
        }
        Ok(())
    }
}

impl FromStr for Jid {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Jid {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Jid> for String {
    fn from(jid: Jid) -> Self {
        jid.to_string()
    }
}
