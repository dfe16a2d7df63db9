//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// texmill LaTeX build orchestrator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: texmill.toml)
    #[arg(short = 'C', long, default_value = "texmill.toml")]
    pub config: PathBuf,

    /// Print tool command lines and freshness decisions
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments of the `build` command, each overriding texmill.toml
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Documents root directory (relative to project root)
    #[arg(short, long)]
    pub docs: Option<PathBuf>,

    /// Output directory for the final PDFs (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Build workspace root (relative to project root)
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Directory containing the LaTeX executables
    #[arg(short, long)]
    pub binaries: Option<PathBuf>,

    /// Bibliography tool to run instead of bibtex (e.g. biber)
    #[arg(long)]
    pub bibliography: Option<String>,

    /// Rebuild every document even if its PDF is up to date
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub force: Option<bool>,

    /// Skip the build entirely
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub skip: Option<bool>,

    /// Write placeholder PDFs instead of running LaTeX
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub dummy: Option<bool>,

    /// Remove the build workspace before staging
    #[arg(long)]
    pub clean: bool,

    /// Extra compiler passes to settle references and tables of contents
    #[arg(short, long = "extra-runs")]
    pub extra_runs: Option<u32>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default texmill.toml and create the documents root
    Init,

    /// Stage every document and build the ones that changed
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init)
    }
}
