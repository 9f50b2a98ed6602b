//! Process-environment build-option override.

use crate::types::BuildConfig;

/// Environment variable consulted when the configuration does not name one.
pub const DEFAULT_OVERRIDE_ENV: &str = "KESTREL_BUILD_OPTIONS";

/// Returns the override value of `var`, or `None` when unset or empty.
///
/// The value is returned verbatim; it is appended as a single build option even
/// when it contains spaces. A value that is not valid UTF-8 is converted lossily
/// and logged.
pub fn lookup_override(var: &str) -> Option<String> {
    let raw = std::env::var_os(var)?;
    let value = match raw.into_string() {
        Ok(value) => value,
        Err(raw) => {
            let lossy = raw.to_string_lossy().into_owned();
            tracing::warn!(var, value = %lossy, "build option override is not valid UTF-8");
            lossy
        }
    };
    (!value.is_empty()).then_some(value)
}

impl BuildConfig {
    /// Reads the configured override variable from the process environment.
    pub fn override_value(&self) -> Option<String> {
        lookup_override(&self.override_env)
    }
}
