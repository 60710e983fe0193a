use clap::{Parser, Subcommand};
use taskweave_agent::{AgentError, RunError};
use taskweave_observability::config::DEFAULT_OTLP_ENDPOINT;
use taskweave_observability::{ActiveExporter, ObservabilityError, Telemetry, TelemetryConfig};

mod modes;

use modes::{run_agent_mode, run_chat_mode, run_tool_mode};

#[derive(Parser, Debug)]
#[command(name = "taskweave", version)]
#[command(about = "Taskweave CLI - traced chat, tool and agent demos")]
struct Cli {
    /// Export spans over OTLP/HTTP instead of reading OTEL_* variables
    #[arg(long, global = true)]
    http: bool,

    /// OTLP endpoint used with --http
    #[arg(long, global = true, default_value = DEFAULT_OTLP_ENDPOINT)]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Keyword chat reply traced as a GenAI chat span
    Chat {
        #[arg(long, default_value = "Hello, can you tell me about the Go language?")]
        message: String,
        #[arg(long, default_value = "user123")]
        user_id: String,
    },
    /// Simulated model tool selection followed by traced tool calls
    Tool {
        #[arg(long, default_value = "Check the weather in Beijing, then calculate 10+25")]
        message: String,
    },
    /// Plan an objective and execute the tasks
    Agent {
        #[arg(
            long,
            default_value = "Please check the weather in Beijing, then calculate 10+25"
        )]
        objective: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Telemetry(#[from] ObservabilityError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error("Failed to render output: {0}")]
    Json(#[from] serde_json::Error),
}

fn telemetry_config(cli: &Cli) -> Result<TelemetryConfig, ObservabilityError> {
    let config = if cli.http {
        TelemetryConfig::http(&cli.endpoint)?
    } else {
        TelemetryConfig::from_env()?
    };
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let telemetry = Telemetry::init(&telemetry_config(&cli)?)?;
    telemetry.install_global()?;

    match telemetry.active_exporter() {
        ActiveExporter::Http => println!("Using HTTP exporter, endpoint: {}", telemetry.endpoint()),
        ActiveExporter::Console => println!("Using console exporter"),
    }

    let dispatch = telemetry.dispatch().clone();
    let outcome = match cli.command {
        Commands::Chat { message, user_id } => run_chat_mode(message, user_id, dispatch).await,
        Commands::Tool { message } => run_tool_mode(message, dispatch).await,
        Commands::Agent { objective } => run_agent_mode(objective, dispatch).await,
    };

    // Flush spans whether or not the mode succeeded.
    telemetry.shutdown()?;
    outcome
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_defaults() {
        let cli = Cli::try_parse_from(["taskweave", "agent"]).unwrap();
        assert!(!cli.http);
        assert_eq!(cli.endpoint, DEFAULT_OTLP_ENDPOINT);
        assert!(matches!(cli.command, Commands::Agent { ref objective } if objective.contains("weather")));
    }

    #[test]
    fn test_global_http_flag_after_subcommand() {
        let cli = Cli::try_parse_from([
            "taskweave",
            "chat",
            "--message",
            "hi",
            "--http",
            "--endpoint",
            "http://collector:4318",
        ])
        .unwrap();
        assert!(cli.http);

        let config = telemetry_config(&cli).unwrap();
        assert_eq!(config.endpoint, "http://collector:4318");
    }

    #[test]
    fn test_bad_endpoint_is_a_telemetry_config_error() {
        let cli =
            Cli::try_parse_from(["taskweave", "--http", "--endpoint", "ftp://collector", "tool"])
                .unwrap();
        let err = telemetry_config(&cli).unwrap_err();
        assert!(matches!(err, ObservabilityError::Config(_)));
        assert!(matches!(CliError::from(err), CliError::Telemetry(_)));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["taskweave", "dance"]).is_err());
    }
}
