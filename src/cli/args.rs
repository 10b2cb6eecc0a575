//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{EntityKind, NormalizationPolicy};

/// Access-management core: hierarchy forests, assignment reconciliation and ordering
#[derive(Parser, Debug)]
#[command(name = "access-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory with a local .access-core.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show an entity file as a forest
    Tree {
        /// TOML file with [[entities]]
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Keep only matches (name or code) and their ancestors
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Compute codes to add and remove
    Diff {
        /// Desired codes, comma separated
        #[arg(long, value_delimiter = ',')]
        desired: Vec<String>,
        /// Current codes, comma separated
        #[arg(long, value_delimiter = ',')]
        current: Vec<String>,
        /// Kind of the codes; selects the configured policy
        #[arg(short, long, conflicts_with = "policy")]
        kind: Option<EntityKind>,
        /// Explicit normalization policy
        #[arg(short, long)]
        policy: Option<NormalizationPolicy>,
    },

    /// Renumber positions 0..n, optionally after a move
    Reindex {
        /// TOML file with [[entities]]
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Index to move from (list sorted by position)
        #[arg(long, requires = "to")]
        from: Option<usize>,
        /// Index to move to
        #[arg(long, requires = "from")]
        to: Option<usize>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}
