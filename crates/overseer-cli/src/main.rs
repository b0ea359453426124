use clap::{Parser, Subcommand};
use overseer_agents::{Agent, EvaluationAgent, GenerationAgent, PlanningAgent};
use overseer_core::AgentRole;
use overseer_gateway::AppState;
use overseer_orchestrator::{Orchestrator, RunTrigger};
use overseer_tools::{
    CommandRunner, FileStore, GeneratorConfig, TextGenerator, ToolRegistry, WebSearch,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "overseer", about = "Overseer — dependency-gated multi-agent task runner")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "overseer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway (and the cron trigger when enabled)
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Execute one orchestration run in the foreground
    Run {
        /// Requirement text handed to the planning agent
        requirement: String,
    },
}

#[derive(Deserialize)]
struct OverseerConfig {
    #[serde(default = "default_workspace_root")]
    workspace_root: PathBuf,
    generator: GeneratorConfig,
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    trigger: TriggerConfig,
    #[serde(default)]
    evaluation: EvaluationConfig,
}

#[derive(Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Deserialize)]
struct TriggerConfig {
    #[serde(default)]
    enabled: bool,
    #[serde(default = "default_cron")]
    cron: String,
    #[serde(default = "default_requirement")]
    requirement: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cron: default_cron(),
            requirement: default_requirement(),
        }
    }
}

#[derive(Deserialize)]
struct EvaluationConfig {
    #[serde(default = "default_eval_command")]
    default_command: String,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            default_command: default_eval_command(),
        }
    }
}

fn default_workspace_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_cron() -> String {
    // Daily at 02:00 UTC.
    "0 0 2 * * * *".to_string()
}
fn default_requirement() -> String {
    "daily refresh".to_string()
}
fn default_eval_command() -> String {
    "npm run test".to_string()
}

fn build_orchestrator(config: &OverseerConfig) -> Orchestrator {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(FileStore::new(&config.workspace_root)));
    registry.register(Arc::new(
        CommandRunner::new().with_cwd(&config.workspace_root),
    ));
    registry.register(Arc::new(TextGenerator::new(config.generator.clone())));
    registry.register(Arc::new(WebSearch::new("brave")));
    let tools = Arc::new(registry);

    let planner: Arc<dyn Agent> = Arc::new(PlanningAgent::new("planner"));
    Orchestrator::new(planner.clone())
        .with_route(AgentRole::Planning, planner)
        .with_route(
            AgentRole::Generation,
            Arc::new(GenerationAgent::new("builder", tools.clone())),
        )
        .with_route(
            AgentRole::Evaluation,
            Arc::new(EvaluationAgent::new(
                "evaluator",
                tools,
                config.evaluation.default_command.clone(),
            )),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();

    let config_str = tokio::fs::read_to_string(&cli.config).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            cli.config.display(),
            e
        )
    })?;
    let config: OverseerConfig = toml::from_str(&config_str)?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let orchestrator = Arc::new(Mutex::new(build_orchestrator(&config)));
            if config.trigger.enabled {
                info!(cron = %config.trigger.cron, "Starting run trigger");
                let _trigger = RunTrigger::new(
                    &config.trigger.cron,
                    &config.trigger.requirement,
                    orchestrator.clone(),
                )
                .start();
            }

            let state = Arc::new(AppState {
                orchestrator,
                default_requirement: config.trigger.requirement.clone(),
            });
            let app = overseer_gateway::build(state);

            let addr = format!("{host}:{port}");
            info!("Starting Overseer gateway on {addr}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await?;
        }
        Commands::Run { requirement } => {
            let mut engine = build_orchestrator(&config);
            engine.bootstrap(&requirement).await?;
            engine.run().await?;
            println!("{}", serde_json::to_string_pretty(&engine.summary())?);
        }
    }

    Ok(())
}
