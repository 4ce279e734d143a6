use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use nakadi_client::config::{load_config, ClientConfig};
use nakadi_client::observability::logging::init_logging;
use nakadi_client::{Client, EventApi, EventType, RetryOptions, StaticToken};

#[derive(Parser)]
#[command(name = "nakadi-cli")]
#[command(about = "Manage event types on a Nakadi broker", long_about = None)]
struct Cli {
    /// Broker base URL; overrides the config file.
    #[arg(short, long)]
    url: Option<String>,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bearer token; overrides `auth.token_env`.
    #[arg(short, long, env = "NAKADI_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Retry transient failures with exponential backoff.
    #[arg(short, long)]
    retry: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all event types
    List,
    /// Show one event type
    Get { name: String },
    /// Create an event type from a JSON file
    Create { file: PathBuf },
    /// Update an event type from a JSON file
    Update { file: PathBuf },
    /// Delete an event type
    Delete { name: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ClientConfig::default(),
    };
    init_logging(&config.observability.log_level);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = config.client_options();
    if let Some(token) = cli.token {
        options.token_provider = Some(Arc::new(StaticToken::new(token)));
    }
    let base_url = cli.url.as_deref().unwrap_or(&config.base_url);
    let client = Client::with_options(base_url, options)?;

    let mut retry = RetryOptions::from(&config.retries);
    retry.retry |= cli.retry;
    let api = EventApi::new(client, retry);

    match cli.command {
        Commands::List => print_json(&api.list().await?)?,
        Commands::Get { name } => print_json(&api.get(&name).await?)?,
        Commands::Create { file } => {
            let event_type = read_event_type(&file)?;
            api.create(&event_type).await?;
            eprintln!("Created event type {}", event_type.name);
        }
        Commands::Update { file } => {
            let event_type = read_event_type(&file)?;
            api.update(&event_type).await?;
            eprintln!("Updated event type {}", event_type.name);
        }
        Commands::Delete { name } => {
            api.delete(&name).await?;
            eprintln!("Deleted event type {}", name);
        }
    }

    Ok(())
}

fn read_event_type(path: &Path) -> Result<EventType, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
