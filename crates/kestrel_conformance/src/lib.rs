//! Test doubles for driving the routine compiler end to end.
//!
//! [`MockBackend`] implements [`ComputeBackend`] in memory. It counts every
//! call, records the source and options it was given, and can be told to fail
//! source or binary builds, reject binaries, or fail with an arbitrary status
//! code.
//!
//! [`MockDevice`] and [`MockContext`] supply the device and context sides.

#![warn(missing_docs)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use kestrel_common::{ContextId, DeviceClass, Vendor};
use kestrel_device::{
    BackendError, Capabilities, ComputeBackend, ComputeContext, Device, KHR_FP16, KHR_FP64,
};
use kestrel_diagnostics::{Diagnostic, DiagnosticCode};
use parking_lot::Mutex;

/// A device with fixed identity, capabilities, vendors, and class.
#[derive(Clone, Debug)]
pub struct MockDevice {
    name: String,
    capabilities: Capabilities,
    vendors: Vec<Vendor>,
    class: DeviceClass,
}

impl MockDevice {
    /// A GPU with no vendor and no optional capabilities.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: Capabilities::new(),
            vendors: Vec::new(),
            class: DeviceClass::Gpu,
        }
    }

    /// An AMD GPU supporting double and half precision.
    pub fn amd_gpu(name: impl Into<String>) -> Self {
        Self::new(name)
            .with_vendor(Vendor::Amd)
            .with_capability(KHR_FP64)
            .with_capability(KHR_FP16)
    }

    /// An ARM GPU supporting half precision only.
    pub fn arm_gpu(name: impl Into<String>) -> Self {
        Self::new(name)
            .with_vendor(Vendor::Arm)
            .with_capability(KHR_FP16)
    }

    /// Adds a capability token.
    pub fn with_capability(mut self, token: &str) -> Self {
        self.capabilities.insert(token);
        self
    }

    /// Adds a vendor the device reports as.
    pub fn with_vendor(mut self, vendor: Vendor) -> Self {
        self.vendors.push(vendor);
        self
    }

    /// Sets the device class.
    pub fn with_class(mut self, class: DeviceClass) -> Self {
        self.class = class;
        self
    }
}

impl Device for MockDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities.clone()
    }

    fn is_vendor(&self, vendor: Vendor) -> bool {
        self.vendors.contains(&vendor)
    }

    fn is_device_class(&self, class: DeviceClass) -> bool {
        self.class == class
    }
}

/// A context identified by a raw id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockContext {
    id: ContextId,
}

impl MockContext {
    /// Creates a context with the given id.
    pub fn new(raw: u64) -> Self {
        Self {
            id: ContextId::from_raw(raw),
        }
    }
}

impl ComputeContext for MockContext {
    fn id(&self) -> ContextId {
        self.id
    }
}

/// Where a [`MockProgram`] was created from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgramInput {
    /// Created from source text.
    Source(String),
    /// Created from binary bytes.
    Binary(Vec<u8>),
}

/// A program handle produced by [`MockBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockProgram {
    /// Unique per created program.
    pub id: u64,
    /// Context the program was created in.
    pub context: ContextId,
    /// What the program was created from.
    pub input: ProgramInput,
}

impl MockProgram {
    /// The source text, for source-backed programs.
    pub fn source(&self) -> Option<&str> {
        match &self.input {
            ProgramInput::Source(source) => Some(source),
            ProgramInput::Binary(_) => None,
        }
    }
}

/// An in-memory backend that records every call.
#[derive(Debug, Default)]
pub struct MockBackend {
    next_id: AtomicU64,
    source_programs: AtomicUsize,
    binary_programs: AtomicUsize,
    builds: AtomicUsize,
    binaries_extracted: AtomicUsize,
    sources: Mutex<Vec<String>>,
    build_options: Mutex<Vec<Vec<String>>>,
    failing_build_log: Mutex<Option<String>>,
    reject_binaries: AtomicBool,
    fail_binary_builds: AtomicBool,
    status_error: Mutex<Option<BackendError>>,
    binary_status_error: Mutex<Option<BackendError>>,
    build_delay: Mutex<Option<Duration>>,
}

impl MockBackend {
    /// A backend where every call succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every build of a source program fail with `log`.
    pub fn fail_builds_with(&self, log: impl Into<String>) {
        *self.failing_build_log.lock() = Some(log.into());
    }

    /// Makes source builds succeed again.
    pub fn succeed_builds(&self) {
        *self.failing_build_log.lock() = None;
    }

    /// Makes every `program_from_binary` call fail with an invalid-binary error.
    pub fn reject_binaries(&self, reject: bool) {
        self.reject_binaries.store(reject, Ordering::SeqCst);
    }

    /// Makes every build of a binary-backed program fail as a build failure.
    pub fn fail_binary_builds(&self, fail: bool) {
        self.fail_binary_builds.store(fail, Ordering::SeqCst);
    }

    /// Makes `program_from_binary` fail with `error`.
    pub fn fail_binaries_with(&self, error: BackendError) {
        *self.binary_status_error.lock() = Some(error);
    }

    /// Makes `program_from_source` fail with `error`.
    pub fn fail_with(&self, error: BackendError) {
        *self.status_error.lock() = Some(error);
    }

    /// Makes every build sleep for `delay` first.
    pub fn delay_builds(&self, delay: Duration) {
        *self.build_delay.lock() = Some(delay);
    }

    /// Programs created from source.
    pub fn source_programs(&self) -> usize {
        self.source_programs.load(Ordering::SeqCst)
    }

    /// Programs created from a binary.
    pub fn binary_programs(&self) -> usize {
        self.binary_programs.load(Ordering::SeqCst)
    }

    /// Build calls, successful or not.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Portable binaries extracted.
    pub fn binaries_extracted(&self) -> usize {
        self.binaries_extracted.load(Ordering::SeqCst)
    }

    /// Every source text passed to `program_from_source`, in call order.
    pub fn sources(&self) -> Vec<String> {
        self.sources.lock().clone()
    }

    /// The options passed to each build, in call order.
    pub fn build_options(&self) -> Vec<Vec<String>> {
        self.build_options.lock().clone()
    }

    fn next_program(&self, context: ContextId, input: ProgramInput) -> MockProgram {
        MockProgram {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            context,
            input,
        }
    }
}

/// The binary bytes [`MockBackend`] produces for `program`.
pub fn binary_for(program: &MockProgram) -> Vec<u8> {
    format!("mock-binary#{}", program.id).into_bytes()
}

impl ComputeBackend for MockBackend {
    type Device = MockDevice;
    type Context = MockContext;
    type Program = MockProgram;

    fn program_from_source(
        &self,
        context: &MockContext,
        source: &str,
    ) -> Result<MockProgram, BackendError> {
        if let Some(err) = self.status_error.lock().clone() {
            return Err(err);
        }
        self.source_programs.fetch_add(1, Ordering::SeqCst);
        self.sources.lock().push(source.to_string());
        Ok(self.next_program(context.id(), ProgramInput::Source(source.to_string())))
    }

    fn program_from_binary(
        &self,
        context: &MockContext,
        _device: &MockDevice,
        binary: &[u8],
    ) -> Result<MockProgram, BackendError> {
        if let Some(err) = self.binary_status_error.lock().clone() {
            return Err(err);
        }
        if self.reject_binaries.load(Ordering::SeqCst) {
            return Err(BackendError::InvalidBinary {
                message: "binary was built by a different driver".to_string(),
            });
        }
        self.binary_programs.fetch_add(1, Ordering::SeqCst);
        Ok(self.next_program(context.id(), ProgramInput::Binary(binary.to_vec())))
    }

    fn build(
        &self,
        program: &MockProgram,
        _device: &MockDevice,
        options: &[String],
    ) -> Result<(), BackendError> {
        if let Some(delay) = *self.build_delay.lock() {
            std::thread::sleep(delay);
        }
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.build_options.lock().push(options.to_vec());
        let fails = match program.input {
            ProgramInput::Source(_) => self.failing_build_log.lock().is_some(),
            ProgramInput::Binary(_) => self.fail_binary_builds.load(Ordering::SeqCst),
        };
        if fails {
            return Err(BackendError::BuildProgramFailure {
                message: "compilation failed".to_string(),
            });
        }
        Ok(())
    }

    fn build_log(&self, program: &MockProgram, _device: &MockDevice) -> String {
        match (program.source(), self.failing_build_log.lock().as_ref()) {
            (Some(_), Some(log)) => log.clone(),
            _ => String::new(),
        }
    }

    fn portable_binary(&self, program: &MockProgram) -> Result<Vec<u8>, BackendError> {
        self.binaries_extracted.fetch_add(1, Ordering::SeqCst);
        Ok(binary_for(program))
    }
}

/// Returns the codes of `diagnostics`, in order, as strings such as `"W201"`.
pub fn codes_of(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(|d| d.code.to_string()).collect()
}

/// Returns `true` if any diagnostic carries `code`.
pub fn has_code(diagnostics: &[Diagnostic], code: DiagnosticCode) -> bool {
    diagnostics.iter().any(|d| d.code == code)
}
