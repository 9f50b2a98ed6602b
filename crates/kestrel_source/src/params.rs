//! Tuned kernel parameters rendered as the base preamble of a routine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::define::Define;

/// Named kernel parameters (work-group sizes, tile sizes, vector widths, ...).
///
/// Parameters are kept sorted by name so the rendered preamble is stable
/// regardless of insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelParameters {
    values: BTreeMap<String, u64>,
}

impl KernelParameters {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, returning the set for chaining.
    pub fn with(mut self, name: impl Into<String>, value: u64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Sets a parameter, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: u64) {
        self.values.insert(name.into(), value);
    }

    /// Returns the value of a parameter.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.values.get(name).copied()
    }

    /// Returns a copy of `self` with every parameter in `overrides` replacing
    /// or extending the defaults.
    pub fn overlay(&self, overrides: &KernelParameters) -> KernelParameters {
        let mut merged = self.clone();
        for (name, value) in &overrides.values {
            merged.values.insert(name.clone(), *value);
        }
        merged
    }

    /// Renders one `#define NAME VALUE` line per parameter.
    pub fn to_preamble(&self) -> String {
        self.values
            .iter()
            .map(|(name, value)| Define::new(name.as_str(), value.to_string()).to_string())
            .collect()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
