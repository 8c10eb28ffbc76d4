//! relink CLI - content URL transformation.
//!
//! Provides commands for:
//! - `url`: Transform a single URL
//! - `transform`: Transform every URL in a document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{SiteArgs, TransformArgs, UrlArgs};
use output::Output;

/// relink - content URL transformation.
#[derive(Parser)]
#[command(name = "relink", version, about)]
struct Cli {
    #[command(flatten)]
    site: SiteArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a single URL.
    Url(UrlArgs),
    /// Transform every URL in a document.
    Transform(TransformArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.site.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = cli.site.build_utils(&output).and_then(|utils| match cli.command {
        Commands::Url(args) => args.execute(&utils, &output),
        Commands::Transform(args) => args.execute(&utils, &output),
    });

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
