//! The device, context, and backend traits consumed by the routine compiler.

use kestrel_common::{ContextId, DeviceClass, Vendor};

use crate::capabilities::Capabilities;
use crate::error::BackendError;

/// A compute device as seen by the compiler.
pub trait Device {
    /// Returns the device identity used to key compiled binaries.
    ///
    /// Devices with the same name are assumed to accept each other's binaries.
    fn name(&self) -> &str;

    /// Returns the capability tokens the device reports.
    fn capabilities(&self) -> Capabilities;

    /// Returns `true` if the device is made by `vendor`.
    fn is_vendor(&self, vendor: Vendor) -> bool;

    /// Returns `true` if the device belongs to `class`.
    fn is_device_class(&self, class: DeviceClass) -> bool;
}

/// A compute context: the scope programs are created in.
pub trait ComputeContext {
    /// Returns the identity of this context.
    fn id(&self) -> ContextId;
}

/// A compute backend that turns source text or binaries into built programs.
///
/// Program handles are expected to be cheap to clone (reference counted), since
/// the program cache hands out copies.
pub trait ComputeBackend {
    /// The backend's device type.
    type Device: Device;
    /// The backend's context type.
    type Context: ComputeContext;
    /// The backend's program handle.
    type Program: Clone;

    /// Creates an unbuilt program from source text.
    fn program_from_source(
        &self,
        context: &Self::Context,
        source: &str,
    ) -> Result<Self::Program, BackendError>;

    /// Creates an unbuilt program from a previously extracted device binary.
    fn program_from_binary(
        &self,
        context: &Self::Context,
        device: &Self::Device,
        binary: &[u8],
    ) -> Result<Self::Program, BackendError>;

    /// Builds a program for `device` with the given options, in order.
    fn build(
        &self,
        program: &Self::Program,
        device: &Self::Device,
        options: &[String],
    ) -> Result<(), BackendError>;

    /// Returns the compiler output of the last build of `program` on `device`.
    fn build_log(&self, program: &Self::Program, device: &Self::Device) -> String;

    /// Extracts the portable binary representation of a built program.
    fn portable_binary(&self, program: &Self::Program) -> Result<Vec<u8>, BackendError>;
}
