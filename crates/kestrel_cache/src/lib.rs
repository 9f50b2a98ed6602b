//! Two-level caching for compiled routines.
//!
//! The [`BinaryCache`] maps a [`RoutineKey`] (device, precision, routine) to the
//! portable binary produced by a full compile, and is shared process-wide. The
//! [`ProgramCache`] maps a [`ContextRoutineKey`] (context, precision, routine) to
//! a built program and belongs to a single compute context. Both share the
//! [`EntryCache`] shape: exact-key lookup, last-write-wins insertion, and no
//! eviction.
//!
//! Binaries can additionally be persisted through a [`BinaryStore`], which
//! writes each one with a validated header and reads corrupted files back as
//! misses.

#![warn(missing_docs)]

pub mod binary;
pub mod entry;
pub mod error;
pub mod key;
pub mod program;
pub mod stats;
pub mod store;

pub use binary::{BinaryCache, CompiledBinary, KeyLock};
pub use entry::EntryCache;
pub use error::CacheError;
pub use key::{ContextRoutineKey, RoutineKey};
pub use program::ProgramCache;
pub use stats::{CacheStats, StatsSnapshot};
pub use store::{BinaryHeader, BinaryStore};
