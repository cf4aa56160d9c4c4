use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use strive::cli::Cli;
use strive::{Config, Profile, Repository, Store, utils};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    // Logging goes to a file; the terminal belongs to the TUI
    if let Err(e) = init_logging(profile) {
        eprintln!("WARNING: Failed to initialize logging: {}", e);
    }

    // Load configuration, honoring an explicit --config path
    let config = match &cli.config {
        Some(path) => Config::load_from(&utils::expand_path(path))?,
        None => Config::load_with_profile(profile)?,
    };
    config.key_bindings.validate()?;

    // Open the store and hydrate the goal list
    let store_path = config.get_store_path(profile);
    let store = Store::open(
        store_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Store path contains invalid UTF-8"))?,
    )?;
    let repository = Repository::open(store);

    let app = strive::tui::App::new(config, repository);
    strive::tui::run_event_loop(app)?;

    Ok(())
}

fn init_logging(profile: Profile) -> std::io::Result<()> {
    let Some(data_dir) = utils::get_data_dir(profile) else {
        return Ok(());
    };
    std::fs::create_dir_all(&data_dir)?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("strive.log"))?;

    let default_filter = match profile {
        Profile::Dev => "strive=debug",
        Profile::Prod => "strive=info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();

    tracing::info!(?profile, version = env!("CARGO_PKG_VERSION"), "starting strive");
    Ok(())
}
