//! Error types reported by devices and backends.

/// Raw status codes with a dedicated [`BackendError`] variant.
pub mod status {
    /// The backend's compiler rejected the program (`CL_BUILD_PROGRAM_FAILURE`).
    pub const BUILD_PROGRAM_FAILURE: i32 = -11;
    /// The supplied binary is not valid for the device (`CL_INVALID_BINARY`).
    pub const INVALID_BINARY: i32 = -42;
}

/// An error returned by a compute backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The backend's compiler rejected the program. The build log has details.
    #[error("program build failed: {message}")]
    BuildProgramFailure {
        /// Short description from the backend.
        message: String,
    },

    /// A binary was not accepted for the target device (e.g., after a driver update).
    #[error("invalid program binary: {message}")]
    InvalidBinary {
        /// Short description from the backend.
        message: String,
    },

    /// Any other backend failure, such as running out of resources.
    #[error("backend error {code}: {message}")]
    Status {
        /// The backend's raw status code.
        code: i32,
        /// Short description from the backend.
        message: String,
    },
}

impl BackendError {
    /// Maps a raw backend status code to an error.
    pub fn from_status(code: i32, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            status::BUILD_PROGRAM_FAILURE => BackendError::BuildProgramFailure { message },
            status::INVALID_BINARY => BackendError::InvalidBinary { message },
            code => BackendError::Status { code, message },
        }
    }

    /// Returns `true` if the backend's compiler rejected the program.
    pub fn is_build_failure(&self) -> bool {
        matches!(self, BackendError::BuildProgramFailure { .. })
    }

    /// Returns `true` if this error means a cached binary cannot be used on the device.
    ///
    /// Both an outright invalid binary and a failed build of a binary-backed
    /// program count as a rejection.
    pub fn is_binary_rejection(&self) -> bool {
        matches!(
            self,
            BackendError::InvalidBinary { .. } | BackendError::BuildProgramFailure { .. }
        )
    }
}

/// A device lacks the hardware support a precision needs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// Double or complex-double requested on a device without double-precision support.
    #[error("device '{device}' does not support double precision")]
    MissingDoublePrecision {
        /// Identity of the device.
        device: String,
    },

    /// Half precision requested on a device without half-precision support.
    #[error("device '{device}' does not support half precision")]
    MissingHalfPrecision {
        /// Identity of the device.
        device: String,
    },
}
