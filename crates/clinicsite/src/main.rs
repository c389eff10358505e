//! clinicsite CLI - static location sites for multi-location healthcare brands.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "clinicsite")]
#[command(about = "Static location-site generator for multi-location healthcare brands")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to site.toml config file
    #[arg(short, long, default_value = "site.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the brand's static site (default)
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail on tokens no location or config value fills
        #[arg(long)]
        strict: bool,
    },

    /// Scaffold a brand folder with config, sample data and templates
    Init {
        /// Brand directory to create (defaults to the current directory)
        #[arg(long)]
        brand: Option<String>,

        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Preview the built site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command.unwrap_or(Commands::Build {
        output: None,
        strict: false,
    }) {
        Commands::Build { output, strict } => {
            commands::build::run(&cli.config, output, strict).await?;
        }
        Commands::Init { brand, yes } => {
            commands::init::run(brand, yes).await?;
        }
        Commands::Serve { port, dir } => {
            commands::serve::run(port, dir).await?;
        }
    }

    Ok(())
}
