//! Stratum CLI — dependency resolution and incremental build scheduling for
//! module-descriptor projects.
//!
//! Provides `stratum graph` to resolve and print the module dependency
//! graph, `stratum plan` to compute the incremental build plan and
//! precompiled header assignment, and `stratum build` to execute the plan
//! with the configured build command.

#![warn(missing_docs)]

mod build;
mod graph;
mod pipeline;
mod plan;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Stratum — a module dependency resolver and incremental build scheduler.
#[derive(Parser, Debug)]
#[command(name = "stratum", version, about = "Stratum build scheduler")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a custom `stratum.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve and print the module dependency graph.
    Graph,
    /// Compute the build plan and precompiled header assignment.
    Plan(PlanArgs),
    /// Execute the build plan with the configured command.
    Build(BuildArgs),
}

/// Arguments for the `stratum plan` subcommand.
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Plan a full rebuild instead of an incremental one.
    #[arg(long)]
    pub all: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Directory holding fingerprint state (default: `.stratum` under the
    /// project root).
    #[arg(long)]
    pub state_dir: Option<String>,
}

/// Arguments for the `stratum build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Rebuild every module, ignoring fingerprint state.
    #[arg(long)]
    pub all: bool,

    /// Worker count for wave execution (overrides `build.workers`).
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Build command template (overrides `build.command`). Must contain a
    /// `{module}` placeholder.
    #[arg(long)]
    pub command: Option<String>,

    /// Directory holding fingerprint state (default: `.stratum` under the
    /// project root).
    #[arg(long)]
    pub state_dir: Option<String>,
}

/// Plan output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Graph => graph::run(&global),
        Command::Plan(ref args) => plan::run(args, &global),
        Command::Build(ref args) => build::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
