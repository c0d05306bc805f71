//! dockfade - a dock panel at the bottom of the first monitor
//!
//! Alt+Tab fades the panel in or out, Alt+Shift+Tab fades it out and exits.

use clap::Parser;
use dockfade::config::Config;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dockfade")]
#[command(about = "Hotkey-driven fading dock panel for X11")]
#[command(version)]
struct Cli {
    /// Config file path (defaults to XDG config)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("dockfade=debug")
    } else {
        EnvFilter::new("dockfade=info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting dockfade");

    // Setup and runtime failures end the program quietly; the exit code is always 0
    let result = Config::load(cli.config.as_deref()).and_then(|config| {
        info!(?config, "Loaded configuration");
        dockfade::app::run(config)
    });

    if let Err(e) = result {
        error!("{:#}", e);
    }
}
