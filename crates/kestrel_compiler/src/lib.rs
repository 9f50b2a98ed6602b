//! The routine compiler: turns a routine request into a ready-to-run program.
//!
//! [`RoutineCompiler::compile`] checks the context's program cache, then the
//! shared binary cache, and only on a full miss gates the precision, assembles
//! source, and invokes the backend compiler. Successful full compiles populate
//! both caches; failed builds populate neither and surface the backend's build
//! log.

#![warn(missing_docs)]

pub mod compiler;
pub mod error;
pub mod options;
pub mod program;
pub mod request;
pub mod routine;
pub mod settings;

pub use compiler::RoutineCompiler;
pub use error::CompileError;
pub use options::BuildOptions;
pub use program::{CompiledProgram, ProgramOrigin};
pub use request::RoutineRequest;
pub use routine::Routine;
pub use settings::CompilerSettings;
