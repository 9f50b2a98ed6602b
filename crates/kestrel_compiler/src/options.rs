//! Build option assembly.

use kestrel_common::ContentHash;
use kestrel_config::BuildConfig;
use std::fmt;

/// The ordered compiler flags passed to one build.
///
/// Recomputed for every build; never cached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    options: Vec<String>,
}

impl BuildOptions {
    /// Default options followed by `override_value` as one extra option.
    ///
    /// The override is appended verbatim, even when it contains spaces; an
    /// empty override is ignored.
    pub fn assemble<S: AsRef<str>>(defaults: &[S], override_value: Option<String>) -> Self {
        let mut options: Vec<String> = defaults.iter().map(|o| o.as_ref().to_string()).collect();
        if let Some(value) = override_value.filter(|v| !v.is_empty()) {
            options.push(value);
        }
        Self { options }
    }

    /// Assembles options from configuration, reading the override variable
    /// from the process environment.
    pub fn from_config(config: &BuildConfig) -> Self {
        Self::assemble(&config.options, config.override_value())
    }

    /// The options in order.
    pub fn as_slice(&self) -> &[String] {
        &self.options
    }

    /// Hash of the ordered options.
    pub fn fingerprint(&self) -> ContentHash {
        ContentHash::from_parts(&self.options)
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether there are no options.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl fmt::Display for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.options.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_is_appended_as_one_option() {
        let opts = BuildOptions::assemble(
            &["-cl-fast-relaxed-math"],
            Some("-DFOO=1 -cl-std=CL2.0".to_string()),
        );
        assert_eq!(
            opts.as_slice(),
            ["-cl-fast-relaxed-math", "-DFOO=1 -cl-std=CL2.0"]
        );
    }

    #[test]
    fn empty_override_is_ignored() {
        let opts = BuildOptions::assemble(&["-w"], Some(String::new()));
        assert_eq!(opts.as_slice(), ["-w"]);
    }

    #[test]
    fn no_options() {
        let none: [&str; 0] = [];
        assert!(BuildOptions::assemble(&none, None).is_empty());
    }

    #[test]
    fn fingerprint_depends_on_order() {
        let a = BuildOptions::assemble(&["-a", "-b"], None);
        let b = BuildOptions::assemble(&["-b", "-a"], None);
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), BuildOptions::assemble(&["-a", "-b"], None).fingerprint());
    }

    #[test]
    fn from_config_reads_configured_variable() {
        std::env::set_var("KESTREL_TEST_OPTIONS_FROM_CONFIG", "-DTUNED");
        let config = BuildConfig {
            options: vec!["-w".to_string()],
            override_env: "KESTREL_TEST_OPTIONS_FROM_CONFIG".to_string(),
        };
        assert_eq!(BuildOptions::from_config(&config).as_slice(), ["-w", "-DTUNED"]);
    }

    #[test]
    fn display_joins_with_spaces() {
        let opts = BuildOptions::assemble(&["-w", "-cl-mad-enable"], None);
        assert_eq!(opts.to_string(), "-w -cl-mad-enable");
    }
}
