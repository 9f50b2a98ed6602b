//! Configuration types deserialized from `kestrel.toml`.

use kestrel_common::{DeviceClass, Vendor};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

use crate::env::DEFAULT_OVERRIDE_ENV;

/// The top-level compiler configuration. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct KestrelConfig {
    /// Build option settings.
    #[serde(default)]
    pub build: BuildConfig,
    /// Binary store settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Device tuning rules.
    #[serde(default)]
    pub tuning: TuningConfig,
}

/// Build option settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// Options passed to every build, in order.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub options: Vec<String>,
    /// Name of the environment variable whose value is appended as one extra option.
    #[serde(default = "default_override_env")]
    pub override_env: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            override_env: default_override_env(),
        }
    }
}

fn default_override_env() -> String {
    DEFAULT_OVERRIDE_ENV.to_string()
}

/// Settings for the on-disk binary store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    /// Directory of the persistent binary store. No store is used when absent.
    pub directory: Option<PathBuf>,
}

/// Device tuning rule settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TuningConfig {
    /// Whether the built-in rules are kept. Defaults to `true`.
    #[serde(default = "default_true")]
    pub include_defaults: bool,
    /// Extra rules, evaluated after the built-in ones.
    #[serde(default)]
    pub rules: Vec<TuningRuleConfig>,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            rules: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A tuning rule: emit `#define <define> <value>` for matching devices.
///
/// A device matches when it satisfies every predicate that is present.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TuningRuleConfig {
    /// The macro name to define.
    pub define: String,
    /// The macro value. Defaults to `"1"`.
    #[serde(default = "default_define_value")]
    pub value: String,
    /// Required device vendor.
    pub vendor: Option<Vendor>,
    /// Required device class.
    pub class: Option<DeviceClass>,
}

fn default_define_value() -> String {
    "1".to_string()
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `options = "-cl-mad-enable"` as well as `options = ["-w", "-cl-mad-enable"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
