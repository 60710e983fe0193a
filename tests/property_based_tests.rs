//! Property-based tests for planning, calculation and execution.
//!
//! These hold for any objective text or operand values, not just the demo
//! objectives.

use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use taskweave::tools::Operation;
use taskweave::{
    CalculatorTool, FailureReason, KeywordPlanner, Orchestrator, Parameters, Run, Task, TaskId,
    TaskKind, TaskStatus, Tool, ToolRegistry,
};
use taskweave_testing::{MockTool, SpanRecorder};

// Lowercase ascii words that never contain a planner trigger
fn neutral_objective() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z ]{0,60}")
        .unwrap()
        .prop_filter("no triggers", |s| {
            !["weather", "forecast", "calculate", "compute"]
                .iter()
                .any(|t| s.contains(t))
        })
}

fn operand() -> impl Strategy<Value = f64> {
    (-1_000_000i64..1_000_000).prop_map(|n| n as f64 / 100.0)
}

fn planner() -> KeywordPlanner {
    KeywordPlanner::new().with_latency(Duration::ZERO)
}

proptest! {
    /// Property: without triggers the plan is a single summarize task
    #[test]
    fn prop_neutral_objective_plans_only_summary(objective in neutral_objective()) {
        let tasks = planner().plan_now(&objective);
        prop_assert_eq!(tasks.len(), 1);
        prop_assert_eq!(tasks[0].kind(), &TaskKind::Summarize);
    }

    /// Property: a weather trigger puts the weather task first and the
    /// summary last
    #[test]
    fn prop_weather_task_precedes_summary(
        prefix in neutral_objective(),
        suffix in neutral_objective(),
    ) {
        let objective = format!("{prefix} weather {suffix}");
        let tasks = planner().plan_now(&objective);

        prop_assert_eq!(tasks.first().and_then(Task::tool_name), Some("get_weather"));
        prop_assert_eq!(tasks.last().map(Task::kind), Some(&TaskKind::Summarize));
        prop_assert_eq!(
            tasks.iter().filter(|t| *t.kind() == TaskKind::Summarize).count(),
            1
        );
        prop_assert!(tasks.iter().all(|t| t.status() == TaskStatus::Pending));
    }

    /// Property: division by zero is a domain failure for every dividend
    #[test]
    fn prop_divide_by_zero_always_fails(a in operand()) {
        let outcome = tokio_test::block_on(
            CalculatorTool::new()
                .with_latency(Duration::ZERO)
                .execute(Parameters::new().with("operation", "divide").with("a", a).with("b", 0.0)),
        );
        prop_assert!(matches!(outcome, Err(FailureReason::Domain { .. })), "expected Domain failure, got {:?}", outcome);
    }

    /// Property: the calculator agrees with plain arithmetic
    #[test]
    fn prop_calculator_matches_operation(
        a in operand(),
        b in operand(),
        op in prop::sample::select(vec![Operation::Add, Operation::Subtract, Operation::Multiply]),
    ) {
        let value = tokio_test::block_on(
            CalculatorTool::new()
                .with_latency(Duration::ZERO)
                .execute(Parameters::new().with("operation", op.as_str()).with("a", a).with("b", b)),
        )
        .unwrap();
        prop_assert_eq!(value["result"].as_f64(), op.apply(a, b).ok());
    }

    /// Property: results keep one entry per completed tool task, in order,
    /// and the summary never lands in them
    #[test]
    fn prop_results_follow_task_order(count in 0usize..6) {
        let recorder = SpanRecorder::new();
        let registry = ToolRegistry::new();
        let mut tasks = Vec::new();
        for i in 0..count {
            let name = format!("tool_{i}");
            registry.register(MockTool::new(name.clone()).with_default_response(json!(i)));
            tasks.push(Task::tool_call(
                TaskId::parse(&format!("task-{i}")).unwrap(),
                "step",
                &name,
                Parameters::new(),
            ));
        }
        tasks.push(Task::summarize(TaskId::parse("final").unwrap(), "sum up"));

        let orchestrator = Orchestrator::builder()
            .registry(Arc::new(registry))
            .summary_delay(Duration::ZERO)
            .dispatch(recorder.dispatch())
            .build();

        let mut run = Run::new("generated", tasks);
        let report = tokio_test::block_on(orchestrator.execute(&mut run)).unwrap();

        let expected: Vec<_> = (0..count).map(|i| json!(i)).collect();
        prop_assert_eq!(&report.results, &expected);
        prop_assert_eq!(report.completed_tasks, count + 1);
        prop_assert_eq!(recorder.spans_named("agent.execute_task").len(), count + 1);
    }
}
