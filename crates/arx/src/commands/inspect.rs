//! Disassembly and graph listing commands.

use arx::{HostFeatures, Translator};
use tracing::{error, info};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};

/// Handle the `disasm` command.
pub fn cmd_disasm(words: &[u32]) -> i32 {
    let translator = Translator::new(HostFeatures::none());
    let mut exit_code = EXIT_SUCCESS;
    for &word in words {
        match translator.disasm(word) {
            Ok(text) => println!("{word:08x}  {text}"),
            Err(e) => {
                error!(error = %e, "disassembly failed");
                exit_code = EXIT_FAILURE;
            }
        }
    }
    exit_code
}

/// Handle the `lift` command.
pub fn cmd_lift(words: &[u32], features: HostFeatures) -> i32 {
    let translator = Translator::new(features);
    info!(pclmulqdq = features.pclmulqdq, "lifting");

    let mut exit_code = EXIT_SUCCESS;
    let mut pc = 0u64;
    for &word in words {
        let lifted = translator
            .disasm(word)
            .and_then(|text| translator.translate(word, pc).map(|ctx| (text, ctx)));
        match lifted {
            Ok((text, ctx)) => {
                println!("{pc:#06x}: {text}");
                print!("{}", ctx.graph());
                println!();
            }
            Err(e) => {
                error!(error = %e, "lift failed");
                exit_code = EXIT_FAILURE;
            }
        }
        pc += 4;
    }
    exit_code
}
