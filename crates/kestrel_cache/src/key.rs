//! Cache keys.

use kestrel_common::{ContentHash, ContextId, Precision};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a compiled binary: device identity, precision, and routine name.
///
/// Equality is exact on all three fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoutineKey {
    /// Device identity string (typically the device name).
    pub device: String,
    /// Numeric precision.
    pub precision: Precision,
    /// Routine name.
    pub routine: String,
}

impl RoutineKey {
    /// Creates a new key.
    pub fn new(
        device: impl Into<String>,
        precision: Precision,
        routine: impl Into<String>,
    ) -> Self {
        Self {
            device: device.into(),
            precision,
            routine: routine.into(),
        }
    }

    /// Stable hash of the key, used to name persisted binaries.
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::from_parts(&[
            self.device.as_str(),
            self.precision.name(),
            self.routine.as_str(),
        ])
    }
}

impl fmt::Display for RoutineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.routine, self.precision, self.device)
    }
}

/// Identifies a built program: context identity, precision, and routine name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContextRoutineKey {
    /// The owning compute context.
    pub context: ContextId,
    /// Numeric precision.
    pub precision: Precision,
    /// Routine name.
    pub routine: String,
}

impl ContextRoutineKey {
    /// Creates a new key.
    pub fn new(context: ContextId, precision: Precision, routine: impl Into<String>) -> Self {
        Self {
            context,
            precision,
            routine: routine.into(),
        }
    }
}

impl fmt::Display for ContextRoutineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.routine, self.precision, self.context)
    }
}
