//! Execution commands.

use arx::{GuestRegisters, HostFeatures, RegisterFile, Translator, crosscheck};
use tracing::{debug, error};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::terminal;

/// Handle the `run` command.
pub fn cmd_run(word: u32, features: HostFeatures, regs: &RegisterFile) -> i32 {
    let translator = Translator::new(features);
    let instr = match translator.decode(word, 0) {
        Ok(instr) => instr,
        Err(e) => {
            error!(error = %e, "decode failed");
            return EXIT_FAILURE;
        }
    };

    let mut regs = regs.clone();
    if let Err(e) = translator.execute(word, &mut regs) {
        error!(error = %e, "run failed");
        return EXIT_FAILURE;
    }

    debug!(rd = instr.rd, "destination");
    println!("{:#010x}", regs.read(instr.rd));
    EXIT_SUCCESS
}

/// Handle the `check` command.
pub fn cmd_check(word: u32, regs: &RegisterFile) -> i32 {
    let report = match crosscheck(word, regs) {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "check failed");
            return EXIT_FAILURE;
        }
    };

    let (hardware, fallback, software) = report.results();
    match report.verify() {
        Ok(()) => {
            terminal::success(&format!("{}: {software:#010x}", report.disasm));
            EXIT_SUCCESS
        }
        Err(e) => {
            terminal::failure(&report.disasm);
            terminal::dim(&format!("pclmulqdq {hardware:#010x}"));
            terminal::dim(&format!("fallback  {fallback:#010x}"));
            terminal::dim(&format!("software  {software:#010x}"));
            error!(error = %e, "check failed");
            EXIT_FAILURE
        }
    }
}
