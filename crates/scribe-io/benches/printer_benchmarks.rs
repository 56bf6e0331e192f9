//! Printer and namespace guard throughput.
//!
//! Measures template substitution with indentation and the cost of opening
//! and closing namespace paths of increasing depth around a small body.
//!
//! Run with: `cargo bench --bench printer_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use scribe_io::prelude::*;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_print_substitution(c: &mut Criterion) {
    c.bench_function("print_1k_indented_lines", |b| {
        b.iter(|| {
            let mut printer = Printer::new(Vec::with_capacity(64 * 1024));
            printer.indent();
            for i in 0..1_000 {
                let value = i.to_string();
                printer
                    .print(
                        "const int $name$ = $value$;\n",
                        &[("name", "kField"), ("value", value.as_str())],
                    )
                    .unwrap();
            }
            black_box(printer.bytes_written());
        });
    });
}

fn bench_namespace_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("namespace_open_close");
    for depth in [1usize, 4, 16] {
        let path: Vec<String> = (0..depth).map(|i| format!("ns{i}")).collect();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &path, |b, path| {
            b.iter(|| {
                let mut printer = Printer::new(Vec::with_capacity(4 * 1024));
                {
                    let mut ns = NamespacePrinter::new(&mut printer, path.iter().cloned()).unwrap();
                    ns.print("class Message;\n", &[]).unwrap();
                }
                black_box(printer.bytes_written());
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Criterion groups and main
// ---------------------------------------------------------------------------

criterion_group!(benches, bench_print_substitution, bench_namespace_depth);
criterion_main!(benches);
