//! flowcode command-line interface
//!
//! ## Commands
//!
//! - `compile` - Flow document to Python, printed or written to a file
//! - `describe` - Prompt pack for an external code generator
//! - `check` - Structural findings (entry point, reachability, dangling edges, cycles)
//!
//! Logs go to stderr; stdout carries only command output.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod command;

#[derive(Parser, Debug)]
#[command(name = "flowcode", author, version, about = "Compile flowchart documents into Python")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a flow document to Python
    Compile {
        /// Flow document (`{"nodes": [...], "edges": [...]}`)
        flow: PathBuf,
        /// Write the program here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Compile options (defaults to ./flowcode.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the prompt pack describing a flow document
    Describe {
        flow: PathBuf,
        /// Target language named in the pack
        #[arg(long, default_value = "python")]
        language: String,
    },
    /// Report structural problems in a flow document
    Check {
        flow: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Compile {
            flow,
            output,
            config,
        } => command::compile(&flow, output.as_deref(), config.as_deref()),
        Command::Describe { flow, language } => command::describe(&flow, &language),
        Command::Check { flow, json } => command::check(&flow, json),
    }
}
