//! pagemon-engine 성능 벤치마크
//!
//! 실행: cargo bench -p pagemon-engine
//!
//! 벤치마크 대상:
//! - 롱 태스크 누적 (관측 콜백 핫패스)
//! - 레이아웃 시프트 배치 정규화
//! - 디스패치 병합 + 스냅샷 복제

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pagemon_core::models::entry::{LayoutShiftEntry, LongTaskEntry, PerformanceEntry};
use pagemon_core::models::record::{MetricRecord, TimingRecord};
use pagemon_engine::dispatch::{labels, DiagnosticMirror, Dispatcher};
use pagemon_engine::long_task::LongTaskAccumulator;
use pagemon_engine::normalize;
use std::hint::black_box;

/// 테스트용 롱 태스크 생성 (절반은 외부 귀속)
fn create_long_task(i: usize) -> LongTaskEntry {
    LongTaskEntry {
        name: if i % 2 == 0 { "self" } else { "cross-origin-unreachable" }.to_string(),
        start_time: 100.0 + i as f64 * 10.0,
        duration: 40.0 + (i % 7) as f64 * 15.0,
    }
}

/// 테스트용 레이아웃 시프트 생성
fn create_layout_shift(i: usize) -> PerformanceEntry {
    PerformanceEntry::LayoutShift(LayoutShiftEntry {
        start_time: i as f64,
        value: 0.001 * (i % 5) as f64,
        had_recent_input: i % 3 == 0,
    })
}

/// 롱 태스크 누적 벤치마크
fn bench_long_task_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("long_task_accumulate");

    for batch_size in [10, 100, 1000] {
        group.throughput(Throughput::Elements(batch_size as u64));
        let tasks: Vec<LongTaskEntry> = (0..batch_size).map(create_long_task).collect();

        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &tasks, |b, tasks| {
            b.iter(|| {
                let accumulator = LongTaskAccumulator::new(50.0, 256);
                for task in tasks {
                    black_box(accumulator.on_long_task(task, 100.0));
                }
                black_box(accumulator.total())
            });
        });
    }

    group.finish();
}

/// CLS 배치 정규화 벤치마크
fn bench_layout_shift_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_shift_batch");

    for batch_size in [10, 100, 1000] {
        group.throughput(Throughput::Elements(batch_size as u64));
        let entries: Vec<PerformanceEntry> = (0..batch_size).map(create_layout_shift).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &entries,
            |b, entries| {
                b.iter(|| black_box(normalize::layout_shift(entries)));
            },
        );
    }

    group.finish();
}

/// 디스패치 (병합 + 스냅샷) 벤치마크
fn bench_dispatch_merge(c: &mut Criterion) {
    let dispatcher = Dispatcher::new(None, DiagnosticMirror::new(false));

    c.bench_function("dispatch_merge", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            let record = MetricRecord::Timing(TimingRecord {
                time: i as f64,
                score: None,
            });
            black_box(dispatcher.dispatch(labels::FP, record, false))
        });
    });
}

criterion_group!(
    benches,
    bench_long_task_accumulate,
    bench_layout_shift_batch,
    bench_dispatch_merge
);
criterion_main!(benches);
