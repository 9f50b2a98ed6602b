//! Compile diagnostics: codes, severities, a thread-safe sink, and rendering.
//!
//! The routine compiler reports capability failures, backend build logs, and
//! recoverable cache problems as structured [`Diagnostic`]s. A [`DiagnosticSink`]
//! accumulates them across concurrent compilations, and [`TerminalRenderer`]
//! formats them for a human reader.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod sink;

pub use code::{codes, Category, DiagnosticCode};
pub use diagnostic::{Diagnostic, Severity, Subject};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use sink::DiagnosticSink;
