use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use fileops_core::{FileOpsEngine, SettingsManager};

mod commands;

use crate::commands::Command;

#[derive(Parser, Debug)]
#[command(name = "fileops")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search, replace, bulk-edit and compare files inside a project")]
struct Args {
    /// Load settings from this file instead of ~/.fileops/settings.toml
    #[arg(long, value_name = "PATH")]
    settings_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    setup_tracing()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = Args::parse();
    info!("CLI startup: command={:?}", args.command);

    let settings_manager = match args.settings_path {
        Some(path) => SettingsManager::from_path(path)?,
        None => SettingsManager::new()?,
    };
    info!("Using settings from {:?}", settings_manager.path());

    let engine = FileOpsEngine::from_settings(settings_manager.into_settings());
    let output = commands::run(&engine, args.command).await?;
    println!("{output}");
    Ok(())
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    let trace_dir = home.join(".fileops").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("fileops.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(EnvFilter::new("info"))
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}
