//! Program-cache and binary-cache fast paths.

use kestrel_cache::{
    BinaryCache, CompiledBinary, ContextRoutineKey, EntryCache, ProgramCache, RoutineKey,
};
use kestrel_common::{ContextId, Precision};
use kestrel_compiler::{BuildOptions, ProgramOrigin, Routine, RoutineCompiler, RoutineRequest};
use kestrel_conformance::{binary_for, MockBackend, MockContext, MockDevice, ProgramInput};

fn axpy() -> RoutineRequest {
    RoutineRequest::new("XAXPY", Precision::Single)
        .with_fragment("__kernel void Xaxpy() {}\n")
}

#[test]
fn first_compile_populates_both_caches() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs);
    let (ctx, dev) = (MockContext::new(1), MockDevice::new("Tahiti"));

    let result = compiler.compile(&ctx, &dev, &axpy()).unwrap();

    assert_eq!(result.origin(), ProgramOrigin::FullCompile);
    assert_eq!(backend.source_programs(), 1);
    assert_eq!(backend.builds(), 1);

    let key = RoutineKey::new("Tahiti", Precision::Single, "XAXPY");
    assert_eq!(binaries.get(&key).unwrap().bytes(), binary_for(result.program()));
    assert!(programs.contains(&ContextRoutineKey::new(
        ContextId::from_raw(1),
        Precision::Single,
        "XAXPY"
    )));
}

#[test]
fn second_compile_does_not_build_again() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs);
    let (ctx, dev) = (MockContext::new(1), MockDevice::new("Tahiti"));

    let first = compiler.compile(&ctx, &dev, &axpy()).unwrap();
    let second = compiler.compile(&ctx, &dev, &axpy()).unwrap();

    assert_eq!(second.origin(), ProgramOrigin::ProgramCache);
    assert_eq!(first.program(), second.program());
    assert_eq!(backend.builds(), 1);
    assert_eq!(backend.source_programs(), 1);
    assert_eq!(backend.binary_programs(), 0);
}

#[test]
fn prepopulated_binary_skips_source_assembly() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let none: [&str; 0] = [];
    binaries.put(
        RoutineKey::new("Tahiti", Precision::Single, "XAXPY"),
        CompiledBinary::new(
            b"prebuilt".to_vec(),
            BuildOptions::assemble(&none, None).fingerprint(),
        ),
    );
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs);

    let result = compiler
        .compile(&MockContext::new(1), &MockDevice::new("Tahiti"), &axpy())
        .unwrap();

    assert_eq!(result.origin(), ProgramOrigin::BinaryCache);
    assert_eq!(result.program().input, ProgramInput::Binary(b"prebuilt".to_vec()));
    assert_eq!(backend.source_programs(), 0, "no source may be assembled");
    assert_eq!(backend.binary_programs(), 1);
    assert_eq!(backend.builds(), 1);
    assert_eq!(backend.binaries_extracted(), 0);
    assert_eq!(programs.len(), 1);
}

#[test]
fn second_context_reuses_binary() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs_a = ProgramCache::new();
    let programs_b = ProgramCache::new();
    let dev = MockDevice::new("Tahiti");

    let a = RoutineCompiler::new(&backend, &binaries, &programs_a)
        .compile(&MockContext::new(1), &dev, &axpy())
        .unwrap();
    let b = RoutineCompiler::new(&backend, &binaries, &programs_b)
        .compile(&MockContext::new(2), &dev, &axpy())
        .unwrap();

    assert_eq!(a.origin(), ProgramOrigin::FullCompile);
    assert_eq!(b.origin(), ProgramOrigin::BinaryCache);
    assert_eq!(b.program().context, ContextId::from_raw(2));
    assert_eq!(backend.source_programs(), 1);
}

#[test]
fn other_device_compiles_separately() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs);
    let ctx = MockContext::new(1);

    compiler.compile(&ctx, &MockDevice::new("Tahiti"), &axpy()).unwrap();
    let other = compiler
        .compile(&MockContext::new(2), &MockDevice::new("Hawaii"), &axpy())
        .unwrap();

    assert_eq!(other.origin(), ProgramOrigin::FullCompile);
    assert_eq!(binaries.len(), 2);
}

#[test]
fn precision_is_part_of_the_key() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs);
    let (ctx, dev) = (MockContext::new(1), MockDevice::new("Tahiti"));

    compiler.compile(&ctx, &dev, &axpy()).unwrap();
    let complex = RoutineRequest::new("XAXPY", Precision::ComplexSingle);
    let result = compiler.compile(&ctx, &dev, &complex).unwrap();

    assert_eq!(result.origin(), ProgramOrigin::FullCompile);
    assert_eq!(backend.source_programs(), 2);
}

#[test]
fn torn_down_context_rebuilds_from_binary() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs);
    let (ctx, dev) = (MockContext::new(7), MockDevice::new("Tahiti"));

    compiler.compile(&ctx, &dev, &axpy()).unwrap();
    assert_eq!(programs.remove_context(ContextId::from_raw(7)), 1);

    let again = compiler.compile(&ctx, &dev, &axpy()).unwrap();
    assert_eq!(again.origin(), ProgramOrigin::BinaryCache);
    assert_eq!(backend.source_programs(), 1);
}

#[test]
fn routine_try_create_reports_origin() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs);
    let (ctx, dev) = (MockContext::new(1), MockDevice::new("Tahiti"));

    let routine = Routine::try_create(&compiler, &ctx, &dev, &axpy()).unwrap();
    assert_eq!(routine.name(), "XAXPY");
    assert_eq!(routine.precision(), Precision::Single);
    assert_eq!(routine.origin(), ProgramOrigin::FullCompile);

    let cached = Routine::try_create(&compiler, &ctx, &dev, &axpy()).unwrap();
    assert_eq!(cached.origin(), ProgramOrigin::ProgramCache);
    assert_eq!(cached.program(), routine.program());
}

#[test]
fn cache_statistics() {
    let backend = MockBackend::new();
    let binaries = BinaryCache::new();
    let programs = ProgramCache::new();
    let compiler = RoutineCompiler::new(&backend, &binaries, &programs);
    let (ctx, dev) = (MockContext::new(1), MockDevice::new("Tahiti"));

    compiler.compile(&ctx, &dev, &axpy()).unwrap();
    compiler.compile(&ctx, &dev, &axpy()).unwrap();

    let program_stats = programs.stats();
    assert_eq!(program_stats.hits, 1);
    assert_eq!(program_stats.misses, 1, "a cold compile counts one miss");
    assert_eq!(program_stats.inserts, 1);
    assert_eq!(binaries.stats().misses, 1);
    assert_eq!(binaries.stats().inserts, 1);
}
