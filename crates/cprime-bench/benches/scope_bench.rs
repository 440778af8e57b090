//! Cost of entering a scope and dispatching to a handler.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use cprime_core::except::{Exception, ExceptionCode, raise, try_scope};

fn bench_scopes(c: &mut Criterion) {
    let mut group = c.benchmark_group("scope");

    group.bench_function("completed", |b| {
        b.iter(|| {
            let exit = try_scope(|| Ok(black_box(7)))
                .catch(ExceptionCode::Failure, |_| 0)
                .run();
            black_box(exit.value());
        });
    });

    group.bench_function("returned_err", |b| {
        b.iter(|| {
            let exit = try_scope(|| -> Result<i32, Exception> {
                Err(Exception::new(black_box(ExceptionCode::Timeout)))
            })
            .catch(ExceptionCode::Timeout, |_| 1)
            .run();
            black_box(exit.value());
        });
    });

    group.bench_function("raised", |b| {
        b.iter(|| {
            let exit = try_scope(|| -> Result<i32, Exception> {
                raise(black_box(ExceptionCode::Timeout))
            })
            .catch(ExceptionCode::Timeout, |_| 1)
            .run();
            black_box(exit.value());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_scopes);
criterion_main!(benches);
