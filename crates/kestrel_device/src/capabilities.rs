//! Device capability token sets.

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Token reported by devices with double-precision floating-point support.
pub const KHR_FP64: &str = "cl_khr_fp64";

/// Token reported by devices with half-precision floating-point support.
pub const KHR_FP16: &str = "cl_khr_fp16";

/// The set of capability tokens a device reports (e.g., OpenCL extensions).
///
/// Tokens are matched exactly; `cl_khr_fp64` does not match `cl_khr_fp64_ext`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    tokens: BTreeSet<String>,
}

impl Capabilities {
    /// Creates an empty capability set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token, returning the set for chaining.
    pub fn with(mut self, token: impl Into<String>) -> Self {
        self.tokens.insert(token.into());
        self
    }

    /// Adds a token.
    pub fn insert(&mut self, token: impl Into<String>) {
        self.tokens.insert(token.into());
    }

    /// Returns `true` if the device reports `token`.
    pub fn supports(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Returns `true` if the device reports double-precision support.
    pub fn supports_double(&self) -> bool {
        self.supports(KHR_FP64)
    }

    /// Returns `true` if the device reports half-precision support.
    pub fn supports_half(&self) -> bool {
        self.supports(KHR_FP16)
    }

    /// Iterates over the tokens in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Number of tokens in the set.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Capabilities {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parses a whitespace-separated extension string as returned by device queries.
impl FromStr for Capabilities {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.split_whitespace().collect())
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(" "))
    }
}
