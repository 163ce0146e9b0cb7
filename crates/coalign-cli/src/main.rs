mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coalign", about = "Co-alignment of solar raster time series")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the offset of one image against a template image
    Offset(commands::offset::OffsetArgs),
    /// Build and save the alignment trajectory of a frame sequence
    Align(commands::align::AlignArgs),
    /// Print or save the default alignment config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Offset(args) => commands::offset::run(args),
        Commands::Align(args) => commands::align::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
