//! Preprocessor define lines.

use kestrel_common::Precision;
use std::fmt;

/// A single `#define` line in generated kernel source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Define {
    /// The macro name.
    pub name: String,
    /// The macro value; `None` defines the name without a value.
    pub value: Option<String>,
}

impl Define {
    /// Creates a define with a value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Creates a define without a value.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// `#define PRECISION <tag>`
    pub fn precision(precision: Precision) -> Self {
        Self::new("PRECISION", precision.tag().to_string())
    }

    /// `#define ROUTINE_<name>`
    pub fn routine(routine: &str) -> Self {
        Self::flag(format!("ROUTINE_{routine}"))
    }
}

/// Renders the define as a complete line, including the trailing newline.
impl fmt::Display for Define {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => writeln!(f, "#define {} {}", self.name, value),
            None => writeln!(f, "#define {}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_define_uses_tag() {
        assert_eq!(
            Define::precision(Precision::ComplexDouble).to_string(),
            "#define PRECISION 6464\n"
        );
        assert_eq!(
            Define::precision(Precision::Half).to_string(),
            "#define PRECISION 16\n"
        );
    }

    #[test]
    fn routine_define_has_no_value() {
        assert_eq!(Define::routine("XGEMM").to_string(), "#define ROUTINE_XGEMM\n");
    }

    #[test]
    fn valued_define() {
        assert_eq!(Define::new("USE_CL_MAD", "1").to_string(), "#define USE_CL_MAD 1\n");
    }
}
