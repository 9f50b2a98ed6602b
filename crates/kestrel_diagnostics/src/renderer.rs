//! Diagnostic rendering for human-readable output.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E101]: failed to build routine XGEMM
///   --> routine XGEMM (single) on device 'Tahiti'
///    |
///    | <build log line 1>
///    | <build log line 2>
///    |
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Maximum number of build-log lines to print; `None` prints all of them.
    pub max_log_lines: Option<usize>,
}

impl TerminalRenderer {
    /// Creates a renderer that prints complete build logs.
    pub fn new() -> Self {
        Self {
            max_log_lines: None,
        }
    }

    /// Creates a renderer that truncates build logs after `lines` lines.
    pub fn with_max_log_lines(lines: usize) -> Self {
        Self {
            max_log_lines: Some(lines),
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!("{}[{}]: {}\n", diag.severity, diag.code, diag.message);

        if let Some(subject) = &diag.subject {
            out.push_str(&format!("  --> {subject}\n"));
        }

        if let Some(log) = diag.build_log.as_deref().filter(|l| !l.trim().is_empty()) {
            let lines: Vec<&str> = log.lines().collect();
            let shown = self.max_log_lines.unwrap_or(lines.len()).min(lines.len());
            out.push_str("   |\n");
            for line in &lines[..shown] {
                out.push_str(&format!("   | {line}\n"));
            }
            if shown < lines.len() {
                out.push_str(&format!("   | ... {} more line(s)\n", lines.len() - shown));
            }
            out.push_str("   |\n");
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}
