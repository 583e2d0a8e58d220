use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use upgrade_notify::check::coordinator::CheckCoordinator;
use upgrade_notify::check::scheduler::{self, Schedule};
use upgrade_notify::check::state::Notifications;
use upgrade_notify::check;
use upgrade_notify::config::{self, UpdateConfig};

#[derive(Parser)]
#[command(name = "upgrade-notify")]
#[command(version, about = "Checks a release source for newer versions of a host application")]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single check and print the outcome as JSON
    Check,
    /// Run the configured schedule until interrupted
    Watch,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command, config))
}

fn load_config(path: &Path) -> anyhow::Result<UpdateConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

async fn run(command: Command, config: UpdateConfig) -> anyhow::Result<()> {
    match command {
        Command::Check => {
            init_stderr_logging();
            config.validate()?;

            let coordinator = build_coordinator(&config)?;
            let outcome = coordinator.run_check().await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Watch => {
            let _guard = init_file_logging()?;
            config.validate()?;

            let coordinator = Arc::new(build_coordinator(&config)?);
            let schedule = Schedule::from_config(&config);

            match scheduler::start(schedule, coordinator).await {
                Some(task) => {
                    tokio::signal::ctrl_c().await?;
                    task.abort();
                }
                None => info!("no recurring schedule configured; nothing left to do"),
            }
        }
    }

    Ok(())
}

fn build_coordinator(config: &UpdateConfig) -> anyhow::Result<CheckCoordinator> {
    let source = check::build_source(config)?;
    let notifications = Notifications::new(&config.running_version);
    Ok(CheckCoordinator::new(
        source,
        notifications,
        &config.running_version,
        config.force_banner,
    ))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn init_file_logging() -> anyhow::Result<WorkerGuard> {
    let dir = config::data_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, config::LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    info!("logging to {}", config::log_path().display());
    Ok(guard)
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
