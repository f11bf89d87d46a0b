use serde::{Deserialize, Serialize};
use std::fmt;

/// Interview track the user is practising for.
///
/// Treated as an opaque string by the session core; the backend decides what
/// questions a role maps to.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Roles offered by the stock role selector.
    ///
    /// Purely presentation-facing data; the core accepts any role string.
    #[must_use]
    pub fn suggested() -> &'static [&'static str] {
        &[
            "DSA",
            "ML",
            "Web Developer",
            "DBMS",
            "CN",
            "OS",
            "System Design",
            "DevOps",
        ]
    }
}

impl Default for Role {
    fn default() -> Self {
        Self("DSA".to_string())
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Role({})", self.0)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
