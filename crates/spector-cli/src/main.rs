use anyhow::Result;
use clap::{Parser, Subcommand};
use spector::Spector;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "spector")]
#[command(about = "Identify file types by their magic bytes")]
struct Args {
    /// JSON signature definition file (can be repeated)
    #[arg(short, long = "signatures", global = true)]
    signatures: Vec<PathBuf>,

    /// Use the built-in signatures (default when no other source is given)
    #[arg(long, global = true)]
    builtin: bool,

    /// Disable the extension hint cache
    #[arg(long, global = true)]
    no_hints: bool,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "SPECTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect the type of one or more files
    Inspect {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the loaded signatures
    List,
    /// Check signature definition files for errors
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let directive = if args.verbose { "spector=debug" } else { "spector=info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    let options = config::CliOptions {
        config_path: args.config,
        signature_files: args.signatures,
        builtin: args.builtin,
        no_hints: args.no_hints,
    };

    match args.command {
        Command::Inspect { paths, json } => {
            let spector = build_spector(&options)?;
            commands::inspect::run(&spector, &paths, json)
        }
        Command::List => {
            let spector = build_spector(&options)?;
            commands::list::run(&spector)
        }
        Command::Validate { files } => commands::validate::run(&files),
    }
}

fn build_spector(options: &config::CliOptions) -> Result<Spector> {
    let config = config::resolve(options)?;
    debug!("Using configuration: {:?}", config);
    Ok(Spector::with_config(config))
}
