//! Compile orchestration over the program and binary caches.

use std::time::Instant;

use kestrel_cache::{
    BinaryCache, BinaryStore, CompiledBinary, ContextRoutineKey, EntryCache, ProgramCache,
    RoutineKey,
};
use kestrel_device::{
    check_capability, BackendError, CapabilityError, ComputeBackend, ComputeContext, Device,
};
use kestrel_diagnostics::{codes, Diagnostic, DiagnosticSink, Subject};
use tracing::{debug, warn};

use crate::error::CompileError;
use crate::options::BuildOptions;
use crate::program::{CompiledProgram, ProgramOrigin};
use crate::request::RoutineRequest;
use crate::settings::CompilerSettings;

/// Compiles routines for a backend, reusing cached programs and binaries.
///
/// The binary cache is shared by every context (often
/// [`BinaryCache::global`]); the program cache belongs to one context. Both are
/// borrowed, so the compiler itself is cheap to create per call site.
pub struct RoutineCompiler<'a, B: ComputeBackend> {
    backend: &'a B,
    binaries: &'a BinaryCache,
    programs: &'a ProgramCache<B::Program>,
    settings: CompilerSettings,
    diagnostics: Option<&'a DiagnosticSink>,
    store: Option<&'a BinaryStore>,
}

impl<'a, B: ComputeBackend> RoutineCompiler<'a, B> {
    /// Creates a compiler with default settings.
    pub fn new(
        backend: &'a B,
        binaries: &'a BinaryCache,
        programs: &'a ProgramCache<B::Program>,
    ) -> Self {
        Self {
            backend,
            binaries,
            programs,
            settings: CompilerSettings::default(),
            diagnostics: None,
            store: None,
        }
    }

    /// Replaces the compiler settings.
    pub fn with_settings(mut self, settings: CompilerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Reports diagnostics to `sink` in addition to logging them.
    pub fn with_diagnostics(mut self, sink: &'a DiagnosticSink) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Writes every freshly compiled binary through to `store`, in place of
    /// the store named by the settings.
    pub fn with_store(mut self, store: &'a BinaryStore) -> Self {
        self.store = Some(store);
        self
    }

    /// The active settings.
    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    /// Returns a ready-to-run program for `request` on `device` in `context`.
    ///
    /// Paths, cheapest first:
    ///
    /// 1. the context's program cache;
    /// 2. a cached binary for the device, built against this context (a
    ///    rejected binary falls through to a full compile);
    /// 3. a full compile: capability gate, source assembly, backend build.
    ///
    /// A failed build leaves both caches untouched and is never retried.
    pub fn compile(
        &self,
        context: &B::Context,
        device: &B::Device,
        request: &RoutineRequest,
    ) -> Result<CompiledProgram<B::Program>, CompileError> {
        let routine = request.name();
        let precision = request.precision();
        let program_key = ContextRoutineKey::new(context.id(), precision, routine);

        if let Some(program) = self.programs.get(&program_key) {
            debug!(%program_key, "program cache hit");
            return Ok(CompiledProgram::new(program, ProgramOrigin::ProgramCache));
        }

        let binary_key = RoutineKey::new(device.name(), precision, routine);
        let lock = self.binaries.key_lock(&binary_key);
        let _guard = lock.lock();

        // Another thread may have finished this routine while we waited.
        if let Some(program) = self.programs.peek(&program_key) {
            debug!(%program_key, "program cache hit after waiting for build lock");
            return Ok(CompiledProgram::new(program, ProgramOrigin::ProgramCache));
        }

        let started = Instant::now();
        let options = BuildOptions::from_config(&self.settings.build);

        if let Some(binary) = self.binaries.get(&binary_key) {
            match self.build_from_binary(context, device, request, &binary, &options) {
                Ok(program) => {
                    self.programs.put(program_key, program.clone());
                    debug!(
                        %binary_key,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "built routine from cached binary"
                    );
                    return Ok(CompiledProgram::new(program, ProgramOrigin::BinaryCache));
                }
                Err(err) if err.is_binary_rejection() => {
                    warn!(%binary_key, %err, "cached binary rejected, recompiling from source");
                    self.report(
                        Diagnostic::warning(
                            codes::STALE_BINARY_REJECTED,
                            "cached binary was rejected by the backend; recompiling from source",
                        )
                        .with_subject(subject(request, device))
                        .with_note(err.to_string()),
                    );
                }
                Err(err) => return Err(err.into()),
            }
        } else {
            debug!(%binary_key, "binary cache miss");
        }

        let program = self.full_compile(context, device, request, &options)?;
        let binary = CompiledBinary::new(
            self.backend.portable_binary(&program)?,
            options.fingerprint(),
        );
        self.persist(&binary_key, &binary, request, device);
        self.binaries.put(binary_key, binary);
        self.programs.put(program_key, program.clone());

        debug!(
            routine,
            %precision,
            device = device.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "compiled routine"
        );
        Ok(CompiledProgram::new(program, ProgramOrigin::FullCompile))
    }

    fn build_from_binary(
        &self,
        context: &B::Context,
        device: &B::Device,
        request: &RoutineRequest,
        binary: &CompiledBinary,
        options: &BuildOptions,
    ) -> Result<B::Program, BackendError> {
        if binary.options_fingerprint() != options.fingerprint() {
            warn!(
                routine = request.name(),
                options = %options,
                "reusing cached binary compiled with different build options"
            );
            self.report(
                Diagnostic::warning(
                    codes::BUILD_OPTIONS_CHANGED,
                    "cached binary was compiled with different build options",
                )
                .with_subject(subject(request, device))
                .with_note(format!("current options: `{options}`"))
                .with_help("clear the binary cache to rebuild with the current options"),
            );
        }

        let program = self
            .backend
            .program_from_binary(context, device, binary.bytes())?;
        self.backend.build(&program, device, options.as_slice())?;
        Ok(program)
    }

    fn full_compile(
        &self,
        context: &B::Context,
        device: &B::Device,
        request: &RoutineRequest,
        options: &BuildOptions,
    ) -> Result<B::Program, CompileError> {
        let routine = request.name();
        let precision = request.precision();

        if let Err(err) = check_capability(device, precision) {
            let code = match err {
                CapabilityError::MissingDoublePrecision { .. } => codes::MISSING_DOUBLE_PRECISION,
                CapabilityError::MissingHalfPrecision { .. } => codes::MISSING_HALF_PRECISION,
            };
            self.report(
                Diagnostic::error(code, err.to_string()).with_subject(subject(request, device)),
            );
            return Err(err.into());
        }

        debug!(routine, %precision, device = device.name(), "compiling routine from source");

        let tuning = self.settings.tuning.evaluate(device);
        let source = self.settings.assembler.assemble(
            &request.preamble(),
            precision,
            routine,
            &tuning,
            request.fragments(),
        );

        let program = self.backend.program_from_source(context, source.as_str())?;
        match self.backend.build(&program, device, options.as_slice()) {
            Ok(()) => Ok(program),
            Err(err) if err.is_build_failure() => {
                let log = self.backend.build_log(&program, device);
                warn!(
                    routine,
                    %precision,
                    device = device.name(),
                    build_log = %log,
                    "build failed"
                );
                self.report(
                    Diagnostic::error(
                        codes::BUILD_FAILURE,
                        format!("failed to build routine {routine}"),
                    )
                    .with_subject(subject(request, device))
                    .with_note(format!("build options: `{options}`"))
                    .with_build_log(log.clone()),
                );
                Err(CompileError::BuildFailure {
                    routine: routine.to_string(),
                    precision,
                    device: device.name().to_string(),
                    log,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn persist(
        &self,
        key: &RoutineKey,
        binary: &CompiledBinary,
        request: &RoutineRequest,
        device: &B::Device,
    ) {
        let Some(store) = self.store.or(self.settings.store.as_ref()) else {
            return;
        };
        if let Err(err) = store.write(key, binary) {
            warn!(%key, %err, "failed to persist binary");
            self.report(
                Diagnostic::warning(
                    codes::BINARY_NOT_PERSISTED,
                    "failed to persist compiled binary",
                )
                .with_subject(subject(request, device))
                .with_note(err.to_string()),
            );
        }
    }

    fn report(&self, diagnostic: Diagnostic) {
        if let Some(sink) = self.diagnostics {
            sink.emit(diagnostic);
        }
    }
}

fn subject<D: Device + ?Sized>(request: &RoutineRequest, device: &D) -> Subject {
    Subject::new(request.name(), request.precision(), device.name())
}
