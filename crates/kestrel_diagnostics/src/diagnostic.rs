//! Structured diagnostic messages about routine compilation.

use crate::code::DiagnosticCode;
use kestrel_common::Precision;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity level of a diagnostic message, least severe first.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Informational context.
    Note,
    /// A problem the compiler recovered from.
    Warning,
    /// A problem that made the compile request fail.
    Error,
}

impl Severity {
    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// The routine build a diagnostic is about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Routine name (e.g., `"XGEMM"`).
    pub routine: String,
    /// Precision the routine was being built for.
    pub precision: Precision,
    /// Device identity the routine was being built for.
    pub device: String,
}

impl Subject {
    /// Creates a new subject.
    pub fn new(
        routine: impl Into<String>,
        precision: Precision,
        device: impl Into<String>,
    ) -> Self {
        Self {
            routine: routine.into(),
            precision,
            device: device.into(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "routine {} ({}) on device '{}'",
            self.routine, self.precision, self.device
        )
    }
}

/// A structured diagnostic message.
///
/// Each diagnostic carries a severity and code, a one-line message, the
/// routine build it concerns, and optionally the raw backend build log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The routine build this diagnostic concerns, if any.
    pub subject: Option<Subject>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
    /// Actionable suggestions.
    pub help: Vec<String>,
    /// Verbatim backend output (the build log), if any.
    pub build_log: Option<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, code, message)
    }

    fn with_severity(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            subject: None,
            notes: Vec::new(),
            help: Vec::new(),
            build_log: None,
        }
    }

    /// Sets the routine build this diagnostic concerns.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// Attaches the backend build log.
    pub fn with_build_log(mut self, log: impl Into<String>) -> Self {
        self.build_log = Some(log.into());
        self
    }
}
