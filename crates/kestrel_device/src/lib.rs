//! Compute device and backend abstractions for the routine compiler.
//!
//! This crate defines the seams the compiler talks to: the [`Device`] trait
//! (identity, capability tokens, vendor and class queries), the [`ComputeContext`]
//! trait, and the [`ComputeBackend`] trait that creates, builds, and serializes
//! programs. Concrete backends (OpenCL, test doubles) implement these traits
//! outside this crate.
//!
//! The [`check_capability`] gate lives here as well, since it only needs the
//! device's capability set.
//!
//! ```
//! use kestrel_common::Precision;
//! use kestrel_device::{capability_error, Capabilities};
//!
//! let caps: Capabilities = "cl_khr_fp64 cl_khr_global_int32_base_atomics".parse().unwrap();
//! assert!(capability_error("Tahiti", &caps, Precision::Double).is_none());
//! assert!(capability_error("Tahiti", &caps, Precision::Half).is_some());
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod capabilities;
pub mod error;
pub mod gate;

pub use backend::{ComputeBackend, ComputeContext, Device};
pub use capabilities::{Capabilities, KHR_FP16, KHR_FP64};
pub use error::{status, BackendError, CapabilityError};
pub use gate::{capability_error, check_capability};
