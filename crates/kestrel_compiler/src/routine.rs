//! A compiled routine ready to be launched.

use kestrel_common::Precision;
use kestrel_device::ComputeBackend;

use crate::compiler::RoutineCompiler;
use crate::error::CompileError;
use crate::program::{CompiledProgram, ProgramOrigin};
use crate::request::RoutineRequest;

/// A routine whose program has been built for one context and device.
///
/// Construction is fallible: an unsupported precision or a failed build is
/// returned from [`Routine::try_create`] instead of producing a half-made
/// routine.
#[derive(Clone, Debug)]
pub struct Routine<P> {
    name: String,
    precision: Precision,
    program: CompiledProgram<P>,
}

impl<P> Routine<P> {
    /// Compiles (or fetches from cache) the program for `request`.
    pub fn try_create<B>(
        compiler: &RoutineCompiler<'_, B>,
        context: &B::Context,
        device: &B::Device,
        request: &RoutineRequest,
    ) -> Result<Self, CompileError>
    where
        B: ComputeBackend<Program = P>,
    {
        let program = compiler.compile(context, device, request)?;
        Ok(Self {
            name: request.name().to_string(),
            precision: request.precision(),
            program,
        })
    }

    /// Routine name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Precision the routine was built for.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// The built program.
    pub fn program(&self) -> &P {
        self.program.program()
    }

    /// Which path produced the program.
    pub fn origin(&self) -> ProgramOrigin {
        self.program.origin()
    }
}
