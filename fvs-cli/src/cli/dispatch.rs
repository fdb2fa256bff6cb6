use clap::Parser;

use crate::actions::{run_active, run_commit, run_init, run_restore, run_states};
use crate::cli::args::{Cli, Commands};
use crate::completions::write_completions;

pub(crate) fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            ignore,
            path,
            use_compression,
        } => run_init(&path, &ignore, use_compression),
        Commands::Commit { ignore, message } => {
            let cwd = std::env::current_dir()?;
            run_commit(&cwd, &message.join(" "), &ignore)
        }
        Commands::States => {
            let cwd = std::env::current_dir()?;
            run_states(&cwd)
        }
        Commands::Restore { ignore, state_id } => {
            let cwd = std::env::current_dir()?;
            run_restore(&cwd, state_id, &ignore)
        }
        Commands::Active => {
            let cwd = std::env::current_dir()?;
            run_active(&cwd)
        }
        Commands::Completions { shell } => {
            write_completions(shell);
            Ok(())
        }
    }
}
