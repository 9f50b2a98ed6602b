//! Diagnostic codes with category prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Failures returned to the caller, prefixed with `E`.
    Error,
    /// Recovered problems, prefixed with `W`.
    Warning,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
        }
    }
}

/// A structured diagnostic code such as `E101` or `W201`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// The codes emitted by the routine compiler.
pub mod codes {
    use super::{Category, DiagnosticCode};

    /// The device lacks double-precision support.
    pub const MISSING_DOUBLE_PRECISION: DiagnosticCode = DiagnosticCode::new(Category::Error, 1);
    /// The device lacks half-precision support.
    pub const MISSING_HALF_PRECISION: DiagnosticCode = DiagnosticCode::new(Category::Error, 2);
    /// The backend compiler rejected the assembled source.
    pub const BUILD_FAILURE: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);
    /// A cached binary no longer builds; a full compile was performed instead.
    pub const STALE_BINARY_REJECTED: DiagnosticCode = DiagnosticCode::new(Category::Warning, 201);
    /// A cached binary was reused although the current build options differ.
    pub const BUILD_OPTIONS_CHANGED: DiagnosticCode = DiagnosticCode::new(Category::Warning, 202);
    /// A freshly compiled binary could not be written to the on-disk store.
    pub const BINARY_NOT_PERSISTED: DiagnosticCode = DiagnosticCode::new(Category::Warning, 203);
}
