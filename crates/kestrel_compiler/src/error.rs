//! Errors returned by the routine compiler.

use kestrel_common::Precision;
use kestrel_device::{BackendError, CapabilityError};

/// Why a routine could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The device cannot run the requested precision. No cache was touched.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// The backend compiler rejected the assembled source.
    #[error("failed to build routine {routine} ({precision}) on device '{device}':\n{log}")]
    BuildFailure {
        /// Routine name.
        routine: String,
        /// Requested precision.
        precision: Precision,
        /// Device identity.
        device: String,
        /// The backend's build log.
        log: String,
    },

    /// Any other backend failure, propagated unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl CompileError {
    /// The backend build log, for build failures.
    pub fn build_log(&self) -> Option<&str> {
        match self {
            CompileError::BuildFailure { log, .. } => Some(log),
            _ => None,
        }
    }
}
