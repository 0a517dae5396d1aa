/*!
 * Tick Throughput Benchmarks
 * Cost of one simulated tick at growing process counts
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use proc_sim::{ProcessSpec, SchedulingPolicy, SimConfig, SimulationEngine};

fn loaded_engine(processes: usize, policy: SchedulingPolicy) -> SimulationEngine {
    let config = SimConfig::default()
        .with_seed(42)
        .with_policy(policy)
        .with_auto_reap_after(1);
    let mut engine = SimulationEngine::with_config(config).expect("valid benchmark config");
    for _ in 0..processes {
        engine.create_process(ProcessSpec::new().burst(1_000_000));
    }
    engine.move_new_to_ready();
    engine
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_simulation");

    for &processes in &[10usize, 100, 1_000] {
        for policy in [SchedulingPolicy::Priority, SchedulingPolicy::RoundRobin] {
            group.throughput(Throughput::Elements(1));
            group.bench_with_input(
                BenchmarkId::new(policy.as_str(), processes),
                &processes,
                |b, &processes| {
                    let mut engine = loaded_engine(processes, policy);
                    b.iter(|| engine.tick_simulation());
                },
            );
        }
    }

    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_metrics");

    for &processes in &[100usize, 1_000] {
        let engine = loaded_engine(processes, SchedulingPolicy::Priority);
        group.bench_with_input(BenchmarkId::from_parameter(processes), &engine, |b, engine| {
            b.iter(|| black_box(engine.get_metrics()));
        });
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    c.bench_function("create_run_reap_100", |b| {
        b.iter(|| {
            let mut engine = loaded_engine(0, SchedulingPolicy::Priority);
            for _ in 0..100 {
                engine.create_process(ProcessSpec::new());
            }
            engine.run(black_box(500));
            engine.get_metrics()
        });
    });
}

criterion_group!(benches, bench_tick, bench_metrics, bench_churn);
criterion_main!(benches);
