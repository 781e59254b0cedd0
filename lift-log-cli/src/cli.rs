// src/cli.rs
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Log training data against a static workout program", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Program JSON to use instead of the configured/built-in one
    #[arg(long, global = true, value_name = "FILE")]
    pub program: Option<PathBuf>,

    /// Print entry listings as CSV instead of a table
    #[arg(long, global = true)]
    pub export_csv: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the whole program with every exercise's logged entries
    Show {
        /// Only show this day (1-based, in program order)
        #[arg(short, long)]
        day: Option<usize>,
    },
    /// List exercise identifiers with their names
    Ids,
    /// List the entries logged for one exercise
    List {
        /// Exercise identifier, e.g. d0_s1_e0 (see `ids`)
        exercise: String,
    },
    /// Log a new entry for an exercise
    Add {
        /// Exercise identifier, e.g. d0_s1_e0 (see `ids`)
        exercise: String,
        /// Program week
        #[arg(long, default_value = "")]
        week: String,
        /// Weight used
        #[arg(short, long, default_value = "")]
        weight: String,
        /// Repetitions per set
        #[arg(short, long, default_value = "")]
        reps: String,
        /// Number of sets performed
        #[arg(short, long, default_value = "")]
        sets: String,
        /// Optional notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// Delete one logged entry by its row number
    Delete {
        /// Exercise identifier
        exercise: String,
        /// Row number as shown by `list` (1-based)
        row: usize,
    },
    /// Write every logged entry as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace every logged entry with the contents of an export
    Import {
        /// JSON file produced by `export`
        file: PathBuf,
    },
    /// Delete every logged entry
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show the path to the storage file
    StoragePath,
    /// Show the path to the config file
    ConfigPath,
    /// Generate shell completion scripts
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
