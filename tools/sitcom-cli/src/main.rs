//! Sitcom Simulator CLI: turn a script file into a finished video.
//!
//! Usage:
//!   sitcom render [OPTIONS]    Voice, illustrate and render a script
//!   sitcom validate <PATH>     Report problems in a script file
//!   sitcom init <PATH>         Write an example script
//!   sitcom check               Check that the encoder tools are installed

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sitcom_common::logging::init_logging;
use sitcom_common::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "sitcom",
    about = "Generate sitcom-style videos from scripts",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a script to video
    Render(commands::render::RenderArgs),

    /// Validate a script file
    Validate {
        /// Path to the script file
        path: PathBuf,
    },

    /// Write an example script file
    Init {
        /// Where to write the script
        #[arg(default_value = "script.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check system capabilities
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    init_logging(&logging);

    match cli.command {
        Commands::Render(args) => commands::render::run(args, &config).await,
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Init { path, force } => commands::init::run(path, force),
        Commands::Check => commands::check::run(&config),
    }
}
