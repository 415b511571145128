use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use nxquery_path::{make_relative, normalize, parse_path};

fn sample_paths() -> Vec<&'static str> {
    vec![
        "entry:NXentry/instrument:NXinstrument/detector/data@units",
        "scan_0001.nxs:///entry:NXentry/sample:NXsample/transformations/phi@depends_on",
        "/:NXentry/:NXinstrument/:NXdetector",
        "../../data/./x",
        "/",
    ]
}

fn benchmark_parse(c: &mut Criterion) {
    let inputs = sample_paths();
    c.bench_function("parser/parse_path", |b| {
        b.iter(|| {
            for input in &inputs {
                let path = parse_path(black_box(input)).expect("parse failure");
                black_box(path);
            }
        })
    });
}

fn benchmark_display(c: &mut Criterion) {
    let paths: Vec<_> =
        sample_paths().into_iter().map(|p| parse_path(p).expect("parse failure")).collect();
    c.bench_function("model/to_string", |b| {
        b.iter(|| {
            for path in &paths {
                black_box(path.to_string());
            }
        })
    });
}

fn benchmark_algebra(c: &mut Criterion) {
    let parent = parse_path("/entry:NXentry/instrument:NXinstrument").expect("parse failure");
    let child = parse_path("/entry:NXentry/instrument:NXinstrument/detector:NXdetector/data@units")
        .expect("parse failure");
    let messy = parse_path("/a/b/./c/../d/../../e").expect("parse failure");
    c.bench_function("algebra/make_relative", |b| {
        b.iter(|| black_box(make_relative(black_box(&parent), black_box(&child))))
    });
    c.bench_function("algebra/normalize", |b| b.iter(|| black_box(normalize(black_box(&messy)))));
}

criterion_group!(benches, benchmark_parse, benchmark_display, benchmark_algebra);
criterion_main!(benches);
