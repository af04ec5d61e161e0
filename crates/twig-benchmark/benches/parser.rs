use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use twig_edit::Document;
use twig_sexp::Sexp;

fn nested(depth: usize) -> String {
    let mut text = String::from("leaf");
    for level in 0..depth {
        text = format!("(node{level} '{text} (sibling {level}))");
    }
    text
}

fn benchmark_parser(c: &mut Criterion) {
    let files = [
        ("simple", "(define (square x) (* x x))".to_owned()),
        ("program", format!("({})", ["(display (map square '(1 2 3 4 5)))"; 64].join("\n "))),
        ("deep", nested(128)),
    ];

    let mut group = c.benchmark_group("Parser Benchmark");

    for (name, text) in &files {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_document", name), text, |b, text| {
            b.iter(|| {
                let document = Document::parse(Sexp, text).unwrap();
                black_box(document);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parser);
criterion_main!(benches);
