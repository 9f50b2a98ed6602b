//! Precision capability gating, run before any source is assembled.

use kestrel_common::Precision;

use crate::backend::Device;
use crate::capabilities::Capabilities;
use crate::error::CapabilityError;

/// Checks whether `device` can run kernels at `precision`.
///
/// Capabilities are only queried for precisions that need special hardware
/// support; single and complex-single always pass.
pub fn check_capability<D: Device + ?Sized>(
    device: &D,
    precision: Precision,
) -> Result<(), CapabilityError> {
    if !precision.requires_double() && !precision.requires_half() {
        return Ok(());
    }
    match capability_error(device.name(), &device.capabilities(), precision) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Returns the error a device named `device` with `caps` would get for `precision`.
pub fn capability_error(
    device: &str,
    caps: &Capabilities,
    precision: Precision,
) -> Option<CapabilityError> {
    if precision.requires_double() && !caps.supports_double() {
        return Some(CapabilityError::MissingDoublePrecision {
            device: device.to_string(),
        });
    }
    if precision.requires_half() && !caps.supports_half() {
        return Some(CapabilityError::MissingHalfPrecision {
            device: device.to_string(),
        });
    }
    None
}
