//! Device vendor and device class identifiers used by tuning predicates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The hardware vendor of a compute device.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// Advanced Micro Devices.
    Amd,
    /// ARM (Mali and similar GPUs).
    Arm,
    /// Apple silicon.
    Apple,
    /// Intel.
    Intel,
    /// NVIDIA.
    Nvidia,
    /// Qualcomm (Adreno GPUs).
    Qualcomm,
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Vendor::Amd => "amd",
            Vendor::Arm => "arm",
            Vendor::Apple => "apple",
            Vendor::Intel => "intel",
            Vendor::Nvidia => "nvidia",
            Vendor::Qualcomm => "qualcomm",
        };
        f.write_str(name)
    }
}

/// The broad class of a compute device.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// A graphics processor.
    Gpu,
    /// A host processor exposed as a compute device.
    Cpu,
    /// A dedicated accelerator (FPGA boards, DSPs, ...).
    Accelerator,
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceClass::Gpu => "gpu",
            DeviceClass::Cpu => "cpu",
            DeviceClass::Accelerator => "accelerator",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde_names() {
        for vendor in [Vendor::Amd, Vendor::Arm, Vendor::Intel, Vendor::Qualcomm] {
            let json = serde_json::to_string(&vendor).unwrap();
            assert_eq!(json, format!("\"{vendor}\""));
        }
        let json = serde_json::to_string(&DeviceClass::Accelerator).unwrap();
        assert_eq!(json, "\"accelerator\"");
    }

    #[test]
    fn deserialize_lowercase() {
        let v: Vendor = serde_json::from_str("\"nvidia\"").unwrap();
        assert_eq!(v, Vendor::Nvidia);
        let c: DeviceClass = serde_json::from_str("\"gpu\"").unwrap();
        assert_eq!(c, DeviceClass::Gpu);
    }
}
