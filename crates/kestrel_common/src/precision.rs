//! Numeric precisions a routine can be compiled for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The numeric type family a routine is compiled for.
///
/// The set is closed. Every precision maps to exactly one integer tag, which is
/// the value bound to the `PRECISION` define in generated kernel source.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// 16-bit IEEE half precision.
    Half,
    /// 32-bit single precision.
    Single,
    /// 64-bit double precision.
    Double,
    /// Complex numbers built from two single-precision values.
    ComplexSingle,
    /// Complex numbers built from two double-precision values.
    ComplexDouble,
}

impl Precision {
    /// All precisions, in tag order.
    pub const ALL: [Precision; 5] = [
        Precision::Half,
        Precision::Single,
        Precision::Double,
        Precision::ComplexSingle,
        Precision::ComplexDouble,
    ];

    /// Returns the integer tag emitted as `#define PRECISION <tag>`.
    pub fn tag(self) -> u32 {
        match self {
            Precision::Half => 16,
            Precision::Single => 32,
            Precision::Double => 64,
            Precision::ComplexSingle => 3232,
            Precision::ComplexDouble => 6464,
        }
    }

    /// Returns the precision with the given integer tag, if any.
    pub fn from_tag(tag: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.tag() == tag)
    }

    /// Returns the canonical lowercase name (e.g., `"complex_double"`).
    pub fn name(self) -> &'static str {
        match self {
            Precision::Half => "half",
            Precision::Single => "single",
            Precision::Double => "double",
            Precision::ComplexSingle => "complex_single",
            Precision::ComplexDouble => "complex_double",
        }
    }

    /// Returns `true` if kernels at this precision need double-precision hardware.
    pub fn requires_double(self) -> bool {
        matches!(self, Precision::Double | Precision::ComplexDouble)
    }

    /// Returns `true` if kernels at this precision need half-precision hardware.
    pub fn requires_half(self) -> bool {
        self == Precision::Half
    }

    /// Returns `true` for the complex precisions.
    pub fn is_complex(self) -> bool {
        matches!(self, Precision::ComplexSingle | Precision::ComplexDouble)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for parsing precision strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid precision: '{input}'")]
pub struct ParsePrecisionError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Precision {
    type Err = ParsePrecisionError;

    /// Accepts canonical names, short BLAS-style prefixes (`h`, `s`, `d`, `c`, `z`),
    /// and integer tags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase().replace('-', "_");
        let parsed = match lower.as_str() {
            "half" | "h" => Some(Precision::Half),
            "single" | "s" => Some(Precision::Single),
            "double" | "d" => Some(Precision::Double),
            "complex_single" | "c" => Some(Precision::ComplexSingle),
            "complex_double" | "z" => Some(Precision::ComplexDouble),
            other => other.parse::<u32>().ok().and_then(Precision::from_tag),
        };
        parsed.ok_or_else(|| ParsePrecisionError {
            input: trimmed.to_string(),
        })
    }
}
