use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::args::Cli;

pub(crate) fn write_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}
