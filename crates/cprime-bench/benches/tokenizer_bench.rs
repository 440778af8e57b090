//! Tokenizer throughput over in-memory input.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use cprime_core::stdio::Tokenizer;

fn corpus(lines: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..lines {
        out.extend_from_slice(format!("{i} {}.5 word{i} another token\n", i * 3).as_bytes());
    }
    out
}

fn bench_tokens(c: &mut Criterion) {
    let input = corpus(2048);
    let mut group = c.benchmark_group("tokenizer");
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("next_token", |b| {
        b.iter(|| {
            let mut t = Tokenizer::new(input.as_slice());
            let mut count = 0usize;
            while let Some(token) = t.next_token().unwrap() {
                count += token.len();
            }
            black_box(count);
        });
    });

    group.bench_function("next_line", |b| {
        b.iter(|| {
            let mut t = Tokenizer::new(input.as_slice());
            let mut count = 0usize;
            while let Some(line) = t.next_line().unwrap() {
                count += line.len();
            }
            black_box(count);
        });
    });

    group.bench_function("mixed_scalars", |b| {
        b.iter(|| {
            let mut t = Tokenizer::new(input.as_slice());
            let mut sum = 0f64;
            while t.has_next().unwrap() {
                sum += f64::from(t.next_int().unwrap().unwrap_or(0));
                sum += t.next_double().unwrap().unwrap_or(0.0);
                let _ = t.next_line().unwrap();
            }
            black_box(sum);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_tokens);
criterion_main!(benches);
