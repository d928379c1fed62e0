//! Remap CLI - flatten and query transitive source maps.

use clap::{Parser, Subcommand};
use remap_loader::{parse_scheme_entry, LoaderConfig};
use std::path::PathBuf;

mod commands;

/// Remap - follow source maps back to the original sources
#[derive(Parser)]
#[command(name = "remap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Replace a URL scheme in map sources with a path (repeatable)
    #[arg(long = "scheme", value_name = "NAME=PATH", global = true, value_parser = parse_scheme)]
    schemes: Vec<(String, String)>,

    /// Do not look for `<file>.map` next to files without a map comment
    #[arg(long, global = true)]
    no_implied_maps: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the flattened source map of a generated file
    Flatten {
        /// Generated file
        file: PathBuf,
        /// Output file (default: <file>.map)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the file with an inline source map instead
        #[arg(long)]
        inline: bool,
    },

    /// Show the original location of a generated position (0-based)
    Lookup {
        /// Generated file
        file: PathBuf,
        line: usize,
        column: usize,
    },

    /// Show information about remap
    Info,
}

fn parse_scheme(entry: &str) -> Result<(String, String), String> {
    parse_scheme_entry(entry).ok_or_else(|| format!("expected NAME=PATH, got `{entry}`"))
}

impl Cli {
    fn loader_config(&self) -> LoaderConfig {
        let mut config = LoaderConfig::from_env();
        config.scheme_map.extend(self.schemes.iter().cloned());
        if self.no_implied_maps {
            config.infer_map_files = false;
        }
        config
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "warn" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let config = cli.loader_config();
    match cli.command {
        Commands::Flatten {
            file,
            output,
            inline,
        } => commands::flatten::run(&file, output.as_deref(), inline, config),
        Commands::Lookup { file, line, column } => {
            commands::lookup::run(&file, line, column, config)
        }
        Commands::Info => commands::info::run(),
    }
}
