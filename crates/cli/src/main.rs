use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    msgrelay_config::{RelayConfig, Severity},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "msgrelay", about = "msgrelay: route inbound messages to webhooks")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Config file to load instead of searching the standard locations.
    #[arg(long, global = true, env = "MSGRELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server (default when no subcommand is provided).
    Gateway,
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate the config and print diagnostics.
    Check,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<RelayConfig> {
    match cli.config {
        Some(ref path) => Ok(msgrelay_config::load_config(path)?),
        None => Ok(msgrelay_config::discover_and_load()),
    }
}

fn check_config(config: &RelayConfig) -> anyhow::Result<()> {
    let diagnostics = msgrelay_config::validate(config);
    if diagnostics.is_empty() {
        println!("config ok ({} services)", config.services.len());
        return Ok(());
    }
    for diag in &diagnostics {
        println!("{diag}");
    }
    if diagnostics.iter().any(|d| d.severity == Severity::Error) {
        anyhow::bail!("config has errors");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "msgrelay starting");

    let config = load_config(&cli)?;

    match cli.command {
        None | Some(Commands::Gateway) => {
            let diagnostics = msgrelay_config::validate(&config);
            for diag in &diagnostics {
                match diag.severity {
                    Severity::Error => tracing::error!(%diag, "config diagnostic"),
                    Severity::Warning => tracing::warn!(%diag, "config diagnostic"),
                }
            }
            if diagnostics.iter().any(|d| d.severity == Severity::Error) {
                anyhow::bail!("config has errors, run `msgrelay config check` for details");
            }
            // CLI args override config values
            let bind = cli.bind.unwrap_or_else(|| config.server.bind.clone());
            let port = cli.port.unwrap_or(config.server.port);
            msgrelay_gateway::server::start_gateway(&config, &bind, port).await
        },
        Some(Commands::Config {
            action: ConfigAction::Check,
        }) => check_config(&config),
    }
}
