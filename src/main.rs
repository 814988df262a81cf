use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use dao_pulse::adapters::ai::MockAIProvider;
use dao_pulse::adapters::http::{app_router, UpdatesAppState};
use dao_pulse::application::GetDaoUpdatesHandler;
use dao_pulse::config::{AppConfig, ConfigError, LogFormat, ServerConfig, ValidationError};
use dao_pulse::ports::AIProvider;

/// AI-curated governance update feed for DAOs
#[derive(Parser, Debug)]
#[command(name = "dao-pulse")]
#[command(about = "Analyze DAO governance proposals and serve a ranked update feed")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the feed for one or more DAOs and print it as JSON
    Feed {
        /// DAO slugs on Tally (e.g., uniswap arbitrum)
        #[arg(required = true, num_args = 1..)]
        slugs: Vec<String>,

        /// Use canned analyses instead of calling the language model
        #[arg(long)]
        mock_ai: bool,

        /// Print compact JSON instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },

    /// Run the HTTP server
    Serve {
        /// Host to bind (overrides DAO_PULSE__SERVER__HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides DAO_PULSE__SERVER__PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode feed: {0}")]
    Encode(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let mut config = AppConfig::load()?;

    if let Command::Serve { host, port } = &args.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }

    config.validate()?;
    init_tracing(&config.server);

    match args.command {
        Command::Feed {
            slugs,
            mock_ai,
            compact,
        } => feed(&config, slugs, mock_ai, compact).await,
        Command::Serve { .. } => serve(&config).await,
    }
}

/// Logs go to stderr so `feed` output stays machine-readable.
fn init_tracing(server: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&server.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match server.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn feed(
    config: &AppConfig,
    slugs: Vec<String>,
    mock_ai: bool,
    compact: bool,
) -> Result<(), CliError> {
    let ai_provider: Option<Arc<dyn AIProvider>> = if mock_ai {
        Some(Arc::new(MockAIProvider::new()))
    } else {
        None
    };
    let handler = GetDaoUpdatesHandler::from_config(config, ai_provider)?;

    let updates = handler.handle_many(&slugs, None).await;

    let output = if compact {
        serde_json::to_string(&updates)?
    } else {
        serde_json::to_string_pretty(&updates)?
    };
    println!("{output}");
    Ok(())
}

async fn serve(config: &AppConfig) -> Result<(), CliError> {
    let handler = GetDaoUpdatesHandler::from_config(config, None)?;
    let app = app_router(UpdatesAppState::new(handler), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "dao-pulse v{} listening", env!("CARGO_PKG_VERSION"));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
