//! Orchestrator Performance Benchmarks
//!
//! Measures planning, registry dispatch and full plan-and-execute runs with
//! all simulated latencies set to zero, so the numbers reflect tracing and
//! bookkeeping overhead only.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::sync::Arc;
use std::time::Duration;
use taskweave::{
    CalculatorTool, KeywordPlanner, Orchestrator, Parameters, ToolRegistry, WeatherTool,
};
use taskweave_testing::SpanRecorder;
use tokio::runtime::Runtime;

const OBJECTIVES: &[(&str, &str)] = &[
    ("summary_only", "tell me something nice"),
    ("weather", "what is the weather in Tokyo"),
    ("weather_and_calc", "请帮我查询北京的天气，然后计算10+25的结果"),
];

fn fast_registry() -> Arc<ToolRegistry> {
    Arc::new(
        ToolRegistry::new()
            .with_tool(WeatherTool::new().with_latency(Duration::ZERO))
            .with_tool(CalculatorTool::new().with_latency(Duration::ZERO)),
    )
}

fn bench_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("planning");
    group.throughput(Throughput::Elements(1));

    let planner = KeywordPlanner::new();
    for (name, objective) in OBJECTIVES {
        group.bench_with_input(BenchmarkId::new("plan_now", name), objective, |b, objective| {
            b.iter(|| std::hint::black_box(planner.plan_now(std::hint::black_box(objective))))
        });
    }

    group.finish();
}

fn bench_registry_invoke(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let registry = fast_registry();
    let mut group = c.benchmark_group("tool_registry");
    group.throughput(Throughput::Elements(1));

    let params = Parameters::new()
        .with("operation", "multiply")
        .with("a", 6.0)
        .with("b", 7.0);
    group.bench_function("invoke_calculator", |b| {
        b.to_async(&rt)
            .iter(|| registry.invoke("calculator", std::hint::black_box(params.clone())))
    });

    group.bench_function("lookup_missing", |b| {
        b.iter(|| std::hint::black_box(registry.lookup("translator")))
    });

    group.finish();
}

fn bench_plan_and_execute(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("orchestrator");
    group.sample_size(200);

    // Recorder keeps every span; cleared per iteration so memory stays flat
    let recorder = SpanRecorder::new();
    let orchestrator = Orchestrator::builder()
        .registry(fast_registry())
        .planner(KeywordPlanner::new().with_latency(Duration::ZERO))
        .summary_delay(Duration::ZERO)
        .dispatch(recorder.dispatch())
        .build();

    for (name, objective) in OBJECTIVES {
        group.bench_with_input(BenchmarkId::new("run", name), objective, |b, objective| {
            b.to_async(&rt).iter(|| async {
                recorder.clear();
                let mut run = orchestrator.plan(objective).await.unwrap();
                std::hint::black_box(orchestrator.execute(&mut run).await.unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_planning,
    bench_registry_invoke,
    bench_plan_and_execute
);
criterion_main!(benches);
