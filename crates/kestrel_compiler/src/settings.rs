//! Compiler settings derived from configuration.

use kestrel_cache::BinaryStore;
use kestrel_config::{BuildConfig, KestrelConfig};
use kestrel_source::{SourceAssembler, TuningTable};

/// Everything a compiler needs besides its backend and caches.
#[derive(Clone, Debug, Default)]
pub struct CompilerSettings {
    /// Default options and the override variable.
    pub build: BuildConfig,
    /// Device tuning rules.
    pub tuning: TuningTable,
    /// Source assembler (and its common header).
    pub assembler: SourceAssembler,
    /// On-disk store that fresh binaries are written through to.
    pub store: Option<BinaryStore>,
}

impl CompilerSettings {
    /// Builds settings from a loaded `kestrel.toml`.
    pub fn from_config(config: &KestrelConfig) -> Self {
        Self {
            build: config.build.clone(),
            tuning: TuningTable::from_config(&config.tuning),
            assembler: SourceAssembler::new(),
            store: config.cache.directory.clone().map(BinaryStore::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_config::load_config_from_str;

    #[test]
    fn from_config() {
        let config = load_config_from_str(
            r#"
[build]
options = ["-cl-fast-relaxed-math"]
override_env = "MY_OPTIONS"

[tuning]
include_defaults = false
[[tuning.rules]]
define = "USE_SUBGROUP_SHUFFLING"
vendor = "intel"
"#,
        )
        .unwrap();

        let settings = CompilerSettings::from_config(&config);
        assert_eq!(settings.build.options, ["-cl-fast-relaxed-math"]);
        assert_eq!(settings.build.override_env, "MY_OPTIONS");
        assert_eq!(settings.tuning.rules().len(), 1);
        assert!(settings.store.is_none());
    }

    #[test]
    fn cache_directory_becomes_store() {
        let config = load_config_from_str("[cache]\ndirectory = \".kestrel-cache\"\n").unwrap();
        let settings = CompilerSettings::from_config(&config);
        let store = settings.store.unwrap();
        assert_eq!(store.root(), std::path::Path::new(".kestrel-cache"));
    }

    #[test]
    fn default_keeps_builtin_tuning() {
        let settings = CompilerSettings::default();
        assert_eq!(settings.tuning.rules().len(), 3);
        assert!(settings.build.options.is_empty());
        assert!(settings.store.is_none());
    }
}
