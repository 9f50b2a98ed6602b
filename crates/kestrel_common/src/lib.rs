//! Shared foundational types used across the Kestrel routine compilation cache.
//!
//! This crate provides the numeric [`Precision`] set routines are compiled for,
//! device vendor and class identifiers, context identities, and content hashing
//! used for build-option fingerprints and on-disk checksums.

#![warn(missing_docs)]

pub mod device_kind;
pub mod hash;
pub mod ids;
pub mod precision;

pub use device_kind::{DeviceClass, Vendor};
pub use hash::ContentHash;
pub use ids::ContextId;
pub use precision::{ParsePrecisionError, Precision};
