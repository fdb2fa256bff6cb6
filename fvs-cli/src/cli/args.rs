use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// A lightweight, local, Git-independent file-versioning tool.
#[derive(Parser, Debug)]
#[command(name = "fvs", version, about, arg_required_else_help = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Create a new FVS repository
    Init {
        /// Patterns to ignore
        #[arg(short = 'i', long = "ignore")]
        ignore: Vec<String>,

        /// Path to the repository
        #[arg(short = 'p', long = "path", default_value = ".")]
        path: PathBuf,

        /// Store blobs as gzip'd tar archives instead of plain files
        #[arg(short = 'c', long = "use-compression")]
        use_compression: bool,
    },

    /// Commit changes to the repository
    Commit {
        /// Patterns to ignore
        #[arg(short = 'i', long = "ignore")]
        ignore: Vec<String>,

        /// Commit message
        #[arg(short = 'm', long = "message", required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// List all states in the repository
    States,

    /// Restore a state from the repository
    Restore {
        /// Patterns to ignore
        #[arg(short = 'i', long = "ignore")]
        ignore: Vec<String>,

        /// State id to restore
        #[arg(short = 's', long = "state-id", required = true)]
        state_id: u64,
    },

    /// Print the active state id
    Active,

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
