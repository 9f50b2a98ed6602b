//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::KestrelConfig;
use std::path::Path;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE: &str = "kestrel.toml";

/// Loads and validates `kestrel.toml` from a directory.
pub fn load_config(dir: &Path) -> Result<KestrelConfig, ConfigError> {
    let content = std::fs::read_to_string(dir.join(CONFIG_FILE))?;
    load_config_from_str(&content)
}

/// Parses and validates a `kestrel.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<KestrelConfig, ConfigError> {
    let config: KestrelConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &KestrelConfig) -> Result<(), ConfigError> {
    if config.build.override_env.trim().is_empty() {
        return Err(ConfigError::MissingField("build.override_env".to_string()));
    }
    if config.build.options.iter().any(|o| o.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "build.options must not contain empty options".to_string(),
        ));
    }
    for rule in &config.tuning.rules {
        if !is_macro_name(&rule.define) {
            return Err(ConfigError::ValidationError(format!(
                "tuning define '{}' is not an upper-case macro name",
                rule.define
            )));
        }
        if rule.vendor.is_none() && rule.class.is_none() {
            return Err(ConfigError::ValidationError(format!(
                "tuning define '{}' needs a vendor or class predicate",
                rule.define
            )));
        }
        if rule.value.trim().is_empty() || rule.value.contains('\n') {
            return Err(ConfigError::ValidationError(format!(
                "tuning define '{}' has an invalid value",
                rule.define
            )));
        }
    }
    Ok(())
}

/// `[A-Z_][A-Z0-9_]*`
fn is_macro_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::DEFAULT_OVERRIDE_ENV;
    use std::path::PathBuf;

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert!(config.build.options.is_empty());
        assert_eq!(config.build.override_env, DEFAULT_OVERRIDE_ENV);
        assert!(config.cache.directory.is_none());
        assert!(config.tuning.include_defaults);
        assert!(config.tuning.rules.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[build]
options = ["-cl-fast-relaxed-math"]
override_env = "MY_BUILD_OPTIONS"

[cache]
directory = ".kestrel-cache"

[tuning]
include_defaults = true

[[tuning.rules]]
define = "USE_SUBGROUP_SHUFFLING"
vendor = "intel"
class = "gpu"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.build.options, vec!["-cl-fast-relaxed-math"]);
        assert_eq!(config.build.override_env, "MY_BUILD_OPTIONS");
        assert_eq!(
            config.cache.directory,
            Some(PathBuf::from(".kestrel-cache"))
        );
        assert_eq!(config.tuning.rules.len(), 1);
    }

    #[test]
    fn empty_override_env_errors() {
        let err = load_config_from_str("[build]\noverride_env = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn empty_option_errors() {
        let err = load_config_from_str("[build]\noptions = [\"-w\", \" \"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn lowercase_define_errors() {
        let toml = r#"
[[tuning.rules]]
define = "use_mad"
vendor = "amd"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rule_without_predicate_errors() {
        let toml = r#"
[[tuning.rules]]
define = "ALWAYS_ON"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(err.to_string().contains("needs a vendor or class predicate"));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn macro_names() {
        assert!(is_macro_name("USE_CL_MAD"));
        assert!(is_macro_name("_X2"));
        assert!(!is_macro_name("2X"));
        assert!(!is_macro_name(""));
        assert!(!is_macro_name("USE-MAD"));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[build]\noptions = \"-cl-mad-enable\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.build.options, vec!["-cl-mad-enable"]);
    }

    #[test]
    fn io_error_from_missing_dir() {
        let err = load_config(Path::new("/nonexistent/kestrel")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
