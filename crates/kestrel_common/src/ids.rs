//! Opaque identity for compute contexts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a compute context.
///
/// Several contexts may target the same device, so program caching is keyed
/// by context rather than by device. The value is assigned by the backend and
/// only compared for equality.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct ContextId(u64);

impl ContextId {
    /// Creates a `ContextId` from a raw backend handle value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx#{:x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_as_raw_roundtrip() {
        let id = ContextId::from_raw(0xdead);
        assert_eq!(id.as_raw(), 0xdead);
    }

    #[test]
    fn display_hex() {
        assert_eq!(ContextId::from_raw(255).to_string(), "ctx#ff");
    }
}
