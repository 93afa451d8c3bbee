//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use depswriter::{MergeStrategy, ResolutionMode};

/// depswriter - Generate goog.addDependency deps files for Closure-style JavaScript
#[derive(Parser)]
#[command(name = "depswriter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan sources and write a deps file
    Generate(GenerateArgs),

    /// Validate sources and deps files without writing anything
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Inputs shared by `generate` and `check`.
#[derive(Args)]
pub struct InputArgs {
    /// Source files, directories or glob patterns to scan
    #[arg(value_name = "SRCS")]
    pub srcs: Vec<String>,

    /// Existing deps file to merge (repeatable)
    #[arg(long = "deps", value_name = "FILE")]
    pub deps: Vec<String>,

    /// Root prefix used to shorten module names (repeatable)
    #[arg(long = "root", value_name = "PREFIX")]
    pub roots: Vec<String>,

    /// Directory containing goog/base.js; written paths are relative to it
    #[arg(long, value_name = "DIR")]
    pub library_root: Option<String>,

    /// How deps file records are merged: always, when-in-srcs, do-not-duplicate
    #[arg(long, value_name = "STRATEGY")]
    pub merge_strategy: Option<MergeStrategy>,

    /// Import resolution mode: legacy, module-aware
    #[arg(long, value_name = "MODE")]
    pub mode: Option<ResolutionMode>,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Write the deps file here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Diagnostic output format
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    /// Human-readable text on stderr
    Human,
    /// One JSON object per line on stdout
    Json,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
