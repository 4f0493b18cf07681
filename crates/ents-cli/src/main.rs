//! Ents CLI
//!
//! Command-line interface for building and inspecting Ents hierarchies

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use ents_core::logging_facility::{self, Profile};

mod commands;
mod stdio_oracle;

#[derive(Debug, Parser)]
#[command(name = "ents")]
#[command(about = "Ents - consistent category hierarchies", long_about = None)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs to stderr in this format (no logs when omitted)
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive session over a Tree
    Shell(commands::shell::ShellArgs),
    /// Report invariant violations and unclassified pairs in a snapshot
    Check(commands::check::CheckArgs),
    /// Print a snapshot as an indented hierarchy
    Show(commands::show::ShowArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.log_format {
        Some(LogFormat::Pretty) => logging_facility::init(Profile::Development),
        Some(LogFormat::Json) => logging_facility::init(Profile::Production),
        None => {}
    }

    let result = commands::load_config(cli.config.as_deref()).and_then(|config| {
        match cli.command {
            Commands::Shell(args) => commands::shell::execute(args, config),
            Commands::Check(args) => commands::check::execute(args, config),
            Commands::Show(args) => commands::show::execute(args, config),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
