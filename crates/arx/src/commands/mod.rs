//! Command implementations.
//!
//! Each submodule handles a specific CLI command or group of commands.

mod inspect;
mod run;

use arx::RegisterFile;

use crate::cli::{Cli, Commands};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Disasm { words } => inspect::cmd_disasm(words),
        Commands::Lift { words, host } => inspect::cmd_lift(words, (*host).into()),
        Commands::Run { word, host, regs } => {
            run::cmd_run(*word, (*host).into(), &initial_regs(regs))
        }
        Commands::Check { word, regs } => run::cmd_check(*word, &initial_regs(regs)),
    }
}

/// Register file with the `--reg` assignments applied in order.
fn initial_regs(assignments: &[(u8, u64)]) -> RegisterFile {
    assignments
        .iter()
        .fold(RegisterFile::new(), |regs, &(reg, value)| {
            regs.with(reg, value)
        })
}
