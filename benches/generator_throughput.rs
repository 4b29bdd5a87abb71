//! Parse-and-generate throughput benchmarks
//!
//! Measures the complete pipeline (header parse + wrapper emission) with
//! varying declaration counts and backends.
//!
//! Run benchmarks: `cargo bench --bench generator_throughput`

use bindweave::{Backend, Config};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::collections::{BTreeMap, BTreeSet};

/// Builds a header with `count` getter-style declarations plus the enum and
/// handle typedef boilerplate.
fn synthetic_header(count: usize) -> String {
    let mut header = String::from(
        "typedef int DocumentHandle;\n\n\
         enum ReturnCode\n{\n  SUCCESS,\n  FAILED,\n  INVALID_HANDLE\n};\n\n",
    );
    for i in 0..count {
        header.push_str(&format!(
            "DLL_EXPORT ReturnCode apiGetValue{i} (const DocumentHandle handle, const char *path{i}, double *value{i});\n\n"
        ));
    }
    header
}

fn config(backend: Backend) -> Config {
    Config {
        backend,
        export_macro: "DLL_EXPORT".to_string(),
        handle_type: "DocumentHandle".to_string(),
        error_code_type: "ReturnCode".to_string(),
        prefix: "api".to_string(),
        library_name: "api".to_string(),
        module_name: Some("api".to_string()),
        typedefs: BTreeMap::new(),
        blacklist: BTreeSet::new(),
        aliases: BTreeMap::new(),
        bool_methods: BTreeMap::new(),
        license: None,
        user_functions: None,
        post_constructor: None,
        close_function: None,
    }
}

fn bench_declaration_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("declaration_scaling");
    for count in [10, 100, 500] {
        let header = synthetic_header(count);
        let config = config(Backend::Python);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &header, |b, header| {
            b.iter(|| bindweave::generate(header, &config).unwrap());
        });
    }
    group.finish();
}

fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("backends");
    let header = synthetic_header(100);
    for (name, backend) in [
        ("python", Backend::Python),
        ("fortran", Backend::Fortran),
        ("matlab", Backend::Matlab),
    ] {
        let config = config(backend);
        group.bench_with_input(BenchmarkId::from_parameter(name), &header, |b, header| {
            b.iter(|| bindweave::generate(header, &config).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_declaration_scaling, bench_backends);
criterion_main!(benches);
