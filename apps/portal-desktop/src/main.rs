use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use portal_game::{GameBuilder, GameConfig};
use tracing_subscriber::EnvFilter;

mod window;

use window::WinitWindow;

#[derive(Parser)]
#[command(name = "portal-desktop", about = "Play a portal scene in a desktop window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scene to load instead of the configured one
    #[arg(long)]
    map: Option<PathBuf>,

    /// Data directory holding the default scene
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Leave the cursor visible and unlocked
    #[arg(long)]
    cursor_visible: bool,
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(map) = &cli.map {
        config.map_path = Some(map.clone());
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if cli.cursor_visible {
        config.cursor_visible = true;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("portal-desktop starting");
    let config = load_config(&cli)?;
    let window = WinitWindow::new()?;
    let mut game = GameBuilder::new(config, window)
        .build()
        .context("starting game")?;
    game.run().context("running game")?;
    tracing::info!(frames = game.frames(), "portal-desktop exiting");
    Ok(())
}
