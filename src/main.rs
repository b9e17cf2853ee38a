mod canon;
mod commands;
mod config;
mod diagnostics;
mod error;
mod normalize;
mod resolver;
mod scanner;
mod store;
mod types;
mod versespec;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "verseref", about = "Bible reference detection for plain-text notes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the canon: order, testament, names and abbreviations
    Books {
        /// Emit one JSON object per book
        #[arg(long)]
        json: bool,
    },
    /// Scan notes and resolve every reference against the verse store
    Check {
        /// Scan root (defaults to the current directory)
        path: Option<PathBuf>,
    },
    /// Resolve references in a text argument and print the verses
    Resolve {
        /// Free text containing one or more references, e.g. "Jao 3:16"
        text: String,
    },
    /// Scan notes and list detected references without resolving
    Scan {
        /// Scan root (defaults to the current directory)
        path: Option<PathBuf>,
        /// Emit one JSON object per reference
        #[arg(long)]
        json: bool,
    },
    /// Run check, then re-run whenever notes change
    Watch {
        /// Scan root (defaults to the current directory)
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let canon = canon::CanonTable::malagasy();

    return match cli.command {
        Commands::Books { json } => exit_unit(commands::books(json), &canon),
        Commands::Check { path } => exit_code(commands::check(&root_of(path)), &canon),
        Commands::Resolve { text } => {
            exit_unit(commands::resolve(&root_of(None), &text), &canon)
        },
        Commands::Scan { path, json } => {
            exit_unit(commands::scan(&root_of(path), json), &canon)
        },
        Commands::Watch { path } => exit_code(watch::run(&root_of(path)), &canon),
    };
}

/// The scan root: an explicit path or the current directory.
fn root_of(path: Option<PathBuf>) -> PathBuf {
    return path.unwrap_or_else(|| return PathBuf::from("."));
}

/// Map a unit-result command onto an exit code, rendering any error.
fn exit_unit(result: Result<(), error::Error>, canon: &canon::CanonTable) -> ExitCode {
    return match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::print_error(&e, canon);
            ExitCode::FAILURE
        },
    };
}

/// Map an exit-code command onto its code, rendering any error.
fn exit_code(result: Result<ExitCode, error::Error>, canon: &canon::CanonTable) -> ExitCode {
    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e, canon);
            ExitCode::FAILURE
        },
    };
}
