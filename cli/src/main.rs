//! voxspec command-line interface.
//!
//! Usage:
//!   voxspec compile --spec agent.json [--memory memory.json] [--unguarded]
//!   voxspec harness Dispatch agent that captures vehicle IDs [--json]
//!   voxspec greeting --prompt compiled.txt
//!   voxspec build [--user-id alice]

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use voxspec_contracts::error::VoxspecResult;

use crate::config::CliConfig;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Deterministic system prompts for voice agents.
#[derive(Parser)]
#[command(
    name = "voxspec",
    version,
    about = "Compile voice-agent system prompts from specs and use cases",
    long_about = "Compiles structured agent specs into system prompts, derives defensive\n\
                  prompt blocks from a use-case description, and runs the agent-builder\n\
                  interview against an OpenAI-compatible endpoint."
)]
struct Cli {
    /// Config file (default: ./voxspec.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile an agent spec (JSON) into a system prompt.
    Compile {
        #[arg(long)]
        spec: PathBuf,
        /// Memory context JSON, e.g. {"summary": "..."}.
        #[arg(long)]
        memory: Option<PathBuf>,
        /// Skip the no-role-acknowledgment guard.
        #[arg(long)]
        unguarded: bool,
    },
    /// Build a prompt from a free-text use case.
    Harness {
        #[arg(required = true, num_args = 1..)]
        use_case: Vec<String>,
        /// Print the prompt and its decision trace as JSON.
        #[arg(long)]
        json: bool,
        /// Keyword override TOML.
        #[arg(long)]
        keywords: Option<PathBuf>,
    },
    /// Print the opening line an agent would speak for a compiled prompt.
    Greeting {
        #[arg(long)]
        prompt: PathBuf,
    },
    /// Run the agent-builder interview on stdin and print the agent JSON.
    Build {
        #[arg(long)]
        user_id: Option<String>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("voxspec: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> VoxspecResult<String> {
    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Compile {
            spec,
            memory,
            unguarded,
        } => commands::compile(&spec, memory.as_deref(), unguarded),
        Command::Harness {
            use_case,
            json,
            keywords,
        } => {
            let harness = commands::load_harness(keywords.as_deref(), &config)?;
            commands::harness(&harness, &use_case.join(" "), json)
        }
        Command::Greeting { prompt } => commands::greeting(&prompt),
        Command::Build { user_id } => commands::build(&config, user_id),
    }
}
