//! Kernel source assembly for routine compilation.
//!
//! This crate builds the complete source text handed to the backend compiler on
//! a full cache miss: caller-supplied parameter defines, the precision and routine
//! defines, device tuning defines, the shared common header, and the routine's own
//! source fragments, concatenated in that fixed order by [`SourceAssembler`].
//!
//! Device tuning defines come from a declarative [`TuningTable`] of
//! predicate→define rules, so new device rules never touch the assembler.

#![warn(missing_docs)]

pub mod assembler;
pub mod define;
pub mod params;
pub mod tuning;

pub use assembler::{SourceAssembler, SourceText, COMMON_HEADER};
pub use define::Define;
pub use params::KernelParameters;
pub use tuning::{DevicePredicate, TuningRule, TuningTable};
