//! The three demo modes.

use crate::CliError;
use serde::Serialize;
use std::sync::Arc;
use taskweave_agent::{AgentConfig, ChatRequest, ChatService, Orchestrator, ToolChainService};
use taskweave_tools::ToolRegistry;
use tracing::Dispatch;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run_chat_mode(
    message: String,
    user_id: String,
    dispatch: Dispatch,
) -> Result<(), CliError> {
    println!("=== Chat mode ===");

    let request = ChatRequest::new(message, user_id);
    let response = ChatService::new()
        .dispatch(dispatch)
        .process(request.clone())
        .await;

    println!("User: {}", request.message);
    println!("Assistant: {}", response.reply);
    println!("Timestamp: {}", response.timestamp.to_rfc3339());
    Ok(())
}

pub async fn run_tool_mode(message: String, dispatch: Dispatch) -> Result<(), CliError> {
    println!("=== Tool mode ===");

    let config = AgentConfig::from_env()?;
    let registry = ToolRegistry::with_standard_tools();
    let registry = match config.tool_timeout {
        Some(timeout) => registry.with_default_timeout(timeout),
        None => registry,
    };
    let chain = ToolChainService::new(Arc::new(registry)).dispatch(dispatch);

    println!("User message: {}", message);
    let results = chain.run(&message).await;

    println!("\nCombined results:");
    print_json(&results)
}

pub async fn run_agent_mode(objective: String, dispatch: Dispatch) -> Result<(), CliError> {
    println!("=== Agent mode ===");

    let orchestrator = Orchestrator::builder()
        .config(AgentConfig::from_env()?)
        .dispatch(dispatch)
        .build();
    println!("Objective: {}\n", objective);

    println!("1. Planning:");
    let mut run = orchestrator.plan(&objective).await?;
    for task in run.tasks() {
        println!("  - {}: {}", task.id(), task.description());
    }

    println!("\n2. Executing:");
    let outcome = orchestrator.execute(&mut run).await;
    if let Err(e) = &outcome {
        println!("Task execution failed: {}", e);
    }

    println!("\n3. Results:");
    for task in run.tasks() {
        println!("\nTask {} ({}):", task.id(), task.status());
        if let Some(result) = task.result() {
            println!("  Result: {}", serde_json::to_string(result)?);
        }
    }

    let report = outcome?;
    println!("\nCompleted {} tasks", report.completed_tasks);
    Ok(())
}
