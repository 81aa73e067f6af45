//! # CLI Argument Definitions
//!
//! Global flags override the matching configuration values; everything else comes from the
//! configuration file and `HARDEN__*` environment variables.

use clap::{ArgAction, Parser, Subcommand};
use hardentools::domain::policy::Backend;
use hardentools::engine::{Mode, Selection};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "hardentools")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Reversible hardening toggles for Windows")]
pub struct Cli {
    /// Configuration file (TOML, JSON, or YAML by extension)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Store backend: registry, fs, or memory
    #[arg(long, global = true, value_name = "BACKEND")]
    pub backend: Option<Backend>,

    /// Root directory of the fs backend
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show whether each entry is hardened
    Status,
    /// Harden entries (all of them when no names are given)
    Apply {
        /// Entry names, matched case-insensitively
        names: Vec<String>,

        /// Only entries that are hardened by default
        #[arg(long, conflicts_with = "names")]
        defaults: bool,
    },
    /// Undo hardening (all entries when no names are given)
    Restore {
        /// Entry names, matched case-insensitively
        names: Vec<String>,
    },
}

impl Command {
    /// Direction of the run; `None` for read-only commands.
    #[must_use]
    pub const fn mode(&self) -> Option<Mode> {
        match self {
            Self::Status => None,
            Self::Apply { .. } => Some(Mode::Apply),
            Self::Restore { .. } => Some(Mode::Restore),
        }
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        match self {
            Self::Apply { defaults: true, .. } => Selection::Defaults,
            Self::Apply { names, .. } | Self::Restore { names } if !names.is_empty() => {
                Selection::Named(names.clone())
            },
            _ => Selection::All,
        }
    }
}
