//! Planning and traced sequential execution.
//!
//! The [`Orchestrator`] owns the tool registry, the planner and the
//! `tracing` dispatch all of its spans go to. Every run produces one
//! `agent.execute_tasks` span with one `agent.execute_task` child per
//! attempted task; tool invocations nest below their task.
//!
//! # Example
//!
//! ```rust,no_run
//! use taskweave_agent::Orchestrator;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::builder().agent_name("assistant").build();
//!
//! let mut run = orchestrator.plan("weather in Paris, then calculate 2 * 21").await?;
//! let report = orchestrator.execute(&mut run).await?;
//! assert_eq!(report.results.len(), 2);
//! # Ok(())
//! # }
//! ```

use crate::config::AgentConfig;
use crate::error::{AgentResult, RunError};
use crate::planner::{KeywordPlanner, Planner};
use crate::run::{Run, RunReport};
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use taskweave_core::task::TOOL_PARAM;
use taskweave_core::{ExecutionError, ExecutionResult, Task, TaskKind};
use taskweave_observability::genai::{assistant_message, user_message};
use taskweave_observability::{GenAiOperation, PROVIDER_OPENAI, record_error, record_json};
use taskweave_tools::ToolRegistry;
use tracing::field::Empty;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, Instrument, Span};
use uuid::Uuid;

/// Token estimate for a planning prompt: one per character plus message
/// framing.
pub fn estimate_input_tokens(objective: &str) -> usize {
    objective.chars().count() + 10
}

/// Token estimate for a plan: twenty per task plus response framing.
pub fn estimate_output_tokens(task_count: usize) -> usize {
    task_count * 20 + 30
}

/// Builder for [`Orchestrator`].
pub struct OrchestratorBuilder {
    config: AgentConfig,
    registry: Option<Arc<ToolRegistry>>,
    planner: Option<Arc<dyn Planner>>,
    dispatch: Option<Dispatch>,
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            config: AgentConfig::default(),
            registry: None,
            planner: None,
            dispatch: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn agent_name(mut self, name: impl Into<String>) -> Self {
        self.config.agent_name = name.into();
        self
    }

    /// Simulated latency of summarize tasks.
    pub fn summary_delay(mut self, delay: Duration) -> Self {
        self.config.summary_delay = delay;
        self
    }

    /// Share an existing registry.
    ///
    /// The configured tool timeout only applies to the default registry; a
    /// supplied registry keeps its own.
    pub fn registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn planner<P: Planner + 'static>(mut self, planner: P) -> Self {
        self.planner = Some(Arc::new(planner));
        self
    }

    pub fn planner_arc(mut self, planner: Arc<dyn Planner>) -> Self {
        self.planner = Some(planner);
        self
    }

    /// Where spans go. Defaults to the dispatcher current at `build`.
    pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub fn build(self) -> Orchestrator {
        let registry = self.registry.unwrap_or_else(|| {
            let registry = ToolRegistry::with_standard_tools();
            Arc::new(match self.config.tool_timeout {
                Some(timeout) => registry.with_default_timeout(timeout),
                None => registry,
            })
        });

        Orchestrator {
            registry,
            planner: self
                .planner
                .unwrap_or_else(|| Arc::new(KeywordPlanner::new())),
            dispatch: self
                .dispatch
                .unwrap_or_else(|| tracing::dispatcher::get_default(Dispatch::clone)),
            config: self.config,
        }
    }
}

/// Plans objectives and executes the resulting tasks in order.
pub struct Orchestrator {
    config: AgentConfig,
    registry: Arc<ToolRegistry>,
    planner: Arc<dyn Planner>,
    dispatch: Dispatch,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub fn agent_name(&self) -> &str {
        &self.config.agent_name
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Plan `objective` inside an `agent.plan_tasks` span.
    pub async fn plan(&self, objective: &str) -> AgentResult<Run> {
        self.plan_traced(objective)
            .with_subscriber(self.dispatch.clone())
            .await
    }

    async fn plan_traced(&self, objective: &str) -> AgentResult<Run> {
        let span = tracing::info_span!(
            "agent.plan_tasks",
            gen_ai.provider.name = PROVIDER_OPENAI,
            gen_ai.operation.name = GenAiOperation::CreateAgent.as_str(),
            gen_ai.agent.id = %Uuid::new_v4(),
            gen_ai.agent.name = %self.config.agent_name,
            gen_ai.agent.description = objective,
            gen_ai.agent.planned_tasks_count = Empty,
            gen_ai.input.messages = %user_message(objective),
            gen_ai.output.messages = Empty,
            gen_ai.usage.input_tokens = estimate_input_tokens(objective),
            gen_ai.usage.output_tokens = Empty,
            otel.status_code = Empty,
            otel.status_message = Empty,
        );

        let tasks = match self.planner.plan(objective).instrument(span.clone()).await {
            Ok(tasks) => tasks,
            Err(e) => {
                record_error(&span, &e);
                return Err(e);
            }
        };

        let planned: Vec<Value> = tasks
            .iter()
            .map(|t| {
                json!({
                    "task_id": t.id(),
                    "description": t.description(),
                    "kind": t.kind(),
                })
            })
            .collect();
        span.record("gen_ai.agent.planned_tasks_count", tasks.len());
        span.record("gen_ai.usage.output_tokens", estimate_output_tokens(tasks.len()));
        record_json(
            &span,
            "gen_ai.output.messages",
            &json!([{
                "role": "assistant",
                "content": format!("Task planning completed for objective: {}", objective),
                "tasks": planned,
            }]),
        );

        span.in_scope(|| {
            tracing::info!(tasks = tasks.len(), "Planned tasks");
        });
        Ok(Run::new(objective, tasks))
    }

    /// Execute every pending task of `run`, in order, stopping at the first
    /// failure.
    ///
    /// Tasks completed before a failure keep their results; tasks after it
    /// stay pending.
    pub async fn execute(&self, run: &mut Run) -> Result<RunReport, RunError> {
        self.execute_traced(run)
            .with_subscriber(self.dispatch.clone())
            .await
    }

    async fn execute_traced(&self, run: &mut Run) -> Result<RunReport, RunError> {
        let run_span = tracing::info_span!(
            "agent.execute_tasks",
            gen_ai.provider.name = PROVIDER_OPENAI,
            gen_ai.operation.name = GenAiOperation::InvokeAgent.as_str(),
            gen_ai.agent.name = %self.config.agent_name,
            gen_ai.agent.total_tasks = run.tasks.len(),
            agent.completed_tasks = Empty,
            gen_ai.output.messages = Empty,
            otel.status_code = Empty,
            otel.status_message = Empty,
        );

        let outcome = self
            .execute_tasks(run)
            .instrument(run_span.clone())
            .await;

        match &outcome {
            Ok(report) => {
                run_span.record("agent.completed_tasks", report.completed_tasks);
                run_span.record(
                    "gen_ai.output.messages",
                    assistant_message(&format!(
                        "Task execution finished, {} tasks completed",
                        report.completed_tasks
                    ))
                    .as_str(),
                );
            }
            Err(e) => record_error(&run_span, e),
        }
        outcome
    }

    async fn execute_tasks(&self, run: &mut Run) -> Result<RunReport, RunError> {
        let mut summary = None;

        for index in 0..run.tasks.len() {
            if !run.tasks[index].is_pending() {
                continue;
            }

            let span = task_span(&run.tasks[index]);
            let outcome = self
                .dispatch_task(&run.tasks[index], &run.results)
                .instrument(span.clone())
                .await;

            let task = &mut run.tasks[index];
            match outcome {
                Ok(value) => {
                    record_json(&span, "gen_ai.task.result", &value);
                    task.complete(value.clone())?;
                    if *task.kind() == TaskKind::Summarize {
                        summary = Some(value);
                    } else {
                        run.results.push(value);
                    }
                    span.in_scope(|| tracing::debug!(task_id = %task.id(), "Task completed"));
                }
                Err(error) => {
                    task.fail()?;
                    record_error(&span, &error);
                    return Err(RunError::TaskFailed {
                        task_id: task.id().clone(),
                        source: error,
                    });
                }
            }
        }

        Ok(RunReport {
            completed_tasks: run.completed_count(),
            results: run.results.clone(),
            summary,
        })
    }

    async fn dispatch_task(&self, task: &Task, results: &[Value]) -> ExecutionResult<Value> {
        tracing::info!(task_id = %task.id(), kind = %task.kind(), "Executing task");

        match task.kind() {
            TaskKind::ToolCall => {
                let tool = task.tool_name().ok_or(ExecutionError::MissingToolName)?;
                self.registry
                    .invoke(tool, task.parameters().without(TOOL_PARAM))
                    .await
            }
            TaskKind::Summarize => Ok(self.summarize(results).await),
            TaskKind::Other(kind) => Err(ExecutionError::UnknownTaskKind { kind: kind.clone() }),
        }
    }

    async fn summarize(&self, results: &[Value]) -> Value {
        if !self.config.summary_delay.is_zero() {
            tokio::time::sleep(self.config.summary_delay).await;
        }

        json!({
            "summary": "All tasks completed",
            "total_tasks": results.len(),
            "results": results,
            "completed_at": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }
}

fn task_span(task: &Task) -> Span {
    tracing::info_span!(
        "agent.execute_task",
        otel.name = %format!("agent.execute_task.{}", task.id()),
        gen_ai.agent.task_id = %task.id(),
        gen_ai.agent.task_kind = %task.kind(),
        gen_ai.agent.description = task.description(),
        gen_ai.tool.name = %format!("task_{}", task.id()),
        gen_ai.tool.description = task.description(),
        gen_ai.task.result = Empty,
        otel.status_code = Empty,
        otel.status_message = Empty,
    )
}
