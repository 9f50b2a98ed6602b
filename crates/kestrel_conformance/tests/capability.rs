//! Precision gating happens before any source is assembled and never touches
//! the caches.

use kestrel_cache::{BinaryCache, EntryCache, ProgramCache};
use kestrel_common::Precision;
use kestrel_compiler::{CompileError, Routine, RoutineCompiler, RoutineRequest};
use kestrel_conformance::{codes_of, MockBackend, MockContext, MockDevice};
use kestrel_device::{CapabilityError, KHR_FP16, KHR_FP64};
use kestrel_diagnostics::DiagnosticSink;

fn request(precision: Precision) -> RoutineRequest {
    RoutineRequest::new("XGEMM", precision).with_fragment("__kernel void Xgemm() {}\n")
}

#[test]
fn double_without_fp64_fails_before_compiling() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let sink = DiagnosticSink::new();
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs).with_diagnostics(&sink);
    let device = MockDevice::new("Mali-T860").with_capability(KHR_FP16);

    let err = compiler
        .compile(&MockContext::new(1), &device, &request(Precision::Double))
        .unwrap_err();

    assert_eq!(
        err,
        CompileError::Capability(CapabilityError::MissingDoublePrecision {
            device: "Mali-T860".into()
        })
    );
    assert_eq!(backend.source_programs(), 0);
    assert_eq!(backend.builds(), 0);
    assert!(binaries.is_empty());
    assert!(programs.is_empty());
    assert_eq!(codes_of(&sink.diagnostics()), ["E001"]);
}

#[test]
fn complex_double_needs_fp64() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs);

    let err = compiler
        .compile(&MockContext::new(1), &MockDevice::new("iGPU"), &request(Precision::ComplexDouble))
        .unwrap_err();
    assert!(matches!(
        err,
        CompileError::Capability(CapabilityError::MissingDoublePrecision { .. })
    ));
}

#[test]
fn half_without_fp16_fails() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let sink = DiagnosticSink::new();
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs).with_diagnostics(&sink);
    let device = MockDevice::new("Tahiti").with_capability(KHR_FP64);

    let err = compiler
        .compile(&MockContext::new(1), &device, &request(Precision::Half))
        .unwrap_err();

    assert!(matches!(
        err,
        CompileError::Capability(CapabilityError::MissingHalfPrecision { .. })
    ));
    assert!(binaries.is_empty() && programs.is_empty());
    assert_eq!(codes_of(&sink.diagnostics()), ["E002"]);
    assert!(sink.has_errors());
}

#[test]
fn single_and_complex_single_always_pass() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs);
    let bare = MockDevice::new("bare");

    for precision in [Precision::Single, Precision::ComplexSingle] {
        compiler
            .compile(&MockContext::new(1), &bare, &request(precision))
            .unwrap();
    }
    assert_eq!(backend.builds(), 2);
}

#[test]
fn supported_double_compiles() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs);

    let routine = Routine::try_create(
        &compiler,
        &MockContext::new(1),
        &MockDevice::amd_gpu("Tahiti"),
        &request(Precision::Double),
    )
    .unwrap();
    assert_eq!(routine.precision(), Precision::Double);
}

#[test]
fn try_create_returns_capability_error() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs);

    let result = Routine::try_create(
        &compiler,
        &MockContext::new(1),
        &MockDevice::arm_gpu("Mali-G71"),
        &request(Precision::Double),
    );
    assert!(matches!(result, Err(CompileError::Capability(_))));
}
