//! CLI application for extracting structured fields from document OCR text.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract, keywords, preprocess};

/// Field extraction - turn ID card, passport and form OCR text into fields
#[derive(Parser)]
#[command(name = "fieldex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fields from one OCR text file
    Extract(extract::ExtractArgs),

    /// Extract fields from many OCR text files
    Batch(batch::BatchArgs),

    /// Inspect or train the keyword dictionary
    Keywords(keywords::KeywordsArgs),

    /// Prepare a scanned image for an OCR engine
    Preprocess(preprocess::PreprocessArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr so extraction output can be piped.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path),
        Commands::Batch(args) => batch::run(args, config_path),
        Commands::Keywords(args) => keywords::run(args, config_path),
        Commands::Preprocess(args) => preprocess::run(args, config_path),
        Commands::Config(args) => config::run(args, config_path),
    }
}
