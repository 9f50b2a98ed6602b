//! Declarative device tuning rules.
//!
//! A [`TuningTable`] maps device predicates to defines. Every rule is evaluated
//! against the device; matching defines are emitted in table order and combine
//! freely.

use kestrel_common::{DeviceClass, Vendor};
use kestrel_config::TuningConfig;
use kestrel_device::Device;

use crate::define::Define;

/// A device predicate: every present constraint must hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DevicePredicate {
    /// Required vendor.
    pub vendor: Option<Vendor>,
    /// Required device class.
    pub class: Option<DeviceClass>,
}

impl DevicePredicate {
    /// Matches devices of `vendor` in `class`.
    pub fn vendor_class(vendor: Vendor, class: DeviceClass) -> Self {
        Self {
            vendor: Some(vendor),
            class: Some(class),
        }
    }

    /// Returns `true` if `device` satisfies the predicate.
    pub fn matches<D: Device + ?Sized>(&self, device: &D) -> bool {
        self.vendor.map_or(true, |v| device.is_vendor(v))
            && self.class.map_or(true, |c| device.is_device_class(c))
    }
}

/// A define emitted for devices matching a predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TuningRule {
    /// The define to emit.
    pub define: Define,
    /// The devices it applies to.
    pub predicate: DevicePredicate,
}

impl TuningRule {
    /// Creates a rule emitting `#define <name> 1` for matching devices.
    pub fn enable(name: impl Into<String>, predicate: DevicePredicate) -> Self {
        Self {
            define: Define::new(name, "1"),
            predicate,
        }
    }
}

/// An ordered table of tuning rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TuningTable {
    rules: Vec<TuningRule>,
}

impl TuningTable {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in rules:
    ///
    /// - AMD GPUs: `USE_CL_MAD` (non-IEEE fused multiply-add) and
    ///   `USE_STAGGERED_INDICES` (shuffled work-group indices).
    /// - ARM GPUs: `GLOBAL_MEM_FENCE` (global barrier for better cache behaviour).
    pub fn builtin() -> Self {
        let amd_gpu = DevicePredicate::vendor_class(Vendor::Amd, DeviceClass::Gpu);
        let arm_gpu = DevicePredicate::vendor_class(Vendor::Arm, DeviceClass::Gpu);
        Self {
            rules: vec![
                TuningRule::enable("USE_CL_MAD", amd_gpu),
                TuningRule::enable("USE_STAGGERED_INDICES", amd_gpu),
                TuningRule::enable("GLOBAL_MEM_FENCE", arm_gpu),
            ],
        }
    }

    /// Builds a table from configuration: the built-in rules (unless disabled)
    /// followed by the configured ones.
    pub fn from_config(config: &TuningConfig) -> Self {
        let mut table = if config.include_defaults {
            Self::builtin()
        } else {
            Self::empty()
        };
        for rule in &config.rules {
            table.push(TuningRule {
                define: Define::new(rule.define.as_str(), rule.value.as_str()),
                predicate: DevicePredicate {
                    vendor: rule.vendor,
                    class: rule.class,
                },
            });
        }
        table
    }

    /// Appends a rule.
    pub fn push(&mut self, rule: TuningRule) {
        self.rules.push(rule);
    }

    /// Returns the rules in evaluation order.
    pub fn rules(&self) -> &[TuningRule] {
        &self.rules
    }

    /// Evaluates every rule against `device`, returning the matching defines in
    /// table order.
    pub fn evaluate<D: Device + ?Sized>(&self, device: &D) -> Vec<Define> {
        self.rules
            .iter()
            .filter(|rule| rule.predicate.matches(device))
            .map(|rule| rule.define.clone())
            .collect()
    }
}

impl Default for TuningTable {
    fn default() -> Self {
        Self::builtin()
    }
}
