use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use kt_core::{Clock, SystemClock, View};
use kt_db::Store;
use tracing_subscriber::EnvFilter;

use kt_cli::commands::{capture, devices, events, report, serve, status};
use kt_cli::{Cli, Commands, Config};

/// Load config and open the store, ensuring the parent directory exists.
fn open_store(cli: &Cli) -> Result<(Store, Config)> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let store = Store::open(config.database_path.clone(), config.store_options())
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    Ok((store, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // Logs go to stderr so report and event output stays machine-readable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Serve { bind, no_capture }) => {
            let (store, mut config) = open_store(&cli)?;
            if let Some(bind) = bind {
                config.bind.clone_from(bind);
            }
            serve::run(&config, store, !no_capture)?;
        }
        Some(Commands::Capture) => {
            let (store, config) = open_store(&cli)?;
            capture::run(&store, &config.capture_config())?;
        }
        Some(Commands::Report {
            yesterday,
            all,
            kind,
            action,
            json,
        }) => {
            let (store, config) = open_store(&cli)?;
            let view = if *all {
                View::AllTime
            } else if *yesterday {
                View::Yesterday
            } else {
                View::Today
            };
            let filter = config.report.with_overrides(*kind, *action);
            let db = store.connect()?;
            report::run(
                &mut stdout,
                &db,
                view,
                filter,
                &SystemClock.boundaries(),
                *json,
            )?;
        }
        Some(Commands::Events { after, before }) => {
            let (store, _config) = open_store(&cli)?;
            let db = store.connect()?;
            events::run(&mut stdout, &db, events::window(*after, *before))?;
        }
        Some(Commands::Status) => {
            let (store, config) = open_store(&cli)?;
            let db = store.connect()?;
            status::run(
                &mut stdout,
                &db,
                &config.database_path,
                &status::local_time_zone(),
            )?;
        }
        Some(Commands::Devices) => {
            let found = kt_capture::list_devices().context("failed to list input devices")?;
            devices::run(&mut stdout, &found)?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(stdout)?;
        }
    }

    stdout.flush()?;
    Ok(())
}
