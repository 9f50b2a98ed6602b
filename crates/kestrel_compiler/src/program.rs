//! The result of a compile request.

/// Which path produced a [`CompiledProgram`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgramOrigin {
    /// Returned straight from the context's program cache.
    ProgramCache,
    /// Built from a binary in the shared binary cache.
    BinaryCache,
    /// Assembled from source and compiled.
    FullCompile,
}

/// A built program bound to one context.
#[derive(Clone, Debug)]
pub struct CompiledProgram<P> {
    program: P,
    origin: ProgramOrigin,
}

impl<P> CompiledProgram<P> {
    pub(crate) fn new(program: P, origin: ProgramOrigin) -> Self {
        Self { program, origin }
    }

    /// The backend program handle.
    pub fn program(&self) -> &P {
        &self.program
    }

    /// Consumes the result, returning the program handle.
    pub fn into_program(self) -> P {
        self.program
    }

    /// Which path produced the program.
    pub fn origin(&self) -> ProgramOrigin {
        self.origin
    }
}
