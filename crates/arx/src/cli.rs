//! CLI definitions and argument types.

use arx::HostFeatures;
use clap::{Parser, Subcommand, ValueEnum};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "arx")]
#[command(about = "A64 CRC32 translator - decodes, lifts, and runs CRC32/CRC32C instructions")]
#[command(version)]
pub struct Cli {
    /// Show metrics summary after execution
    #[arg(long, global = true)]
    pub metrics: bool,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode instruction words and print their disassembly
    Disasm {
        /// Instruction words in hex
        #[arg(value_name = "WORD", required = true, value_parser = arx::parse_word)]
        words: Vec<u32>,
    },
    /// Lift instruction words and print the operation graphs
    Lift {
        /// Instruction words in hex
        #[arg(value_name = "WORD", required = true, value_parser = arx::parse_word)]
        words: Vec<u32>,

        /// Host capabilities to generate code for
        #[arg(long, value_enum, default_value = "auto")]
        host: HostArg,
    },
    /// Lift one instruction word and run it against a register file
    Run {
        /// Instruction word in hex
        #[arg(value_name = "WORD", value_parser = arx::parse_word)]
        word: u32,

        /// Host capabilities to generate code for
        #[arg(long, value_enum, default_value = "auto")]
        host: HostArg,

        /// Initial register value, e.g. `--reg 1=0xffffffff` (repeatable)
        #[arg(long = "reg", value_name = "N=VALUE", value_parser = arx::parse_reg)]
        regs: Vec<(u8, u64)>,
    },
    /// Run one instruction word through both code paths and the software
    /// routine, failing on any difference
    Check {
        /// Instruction word in hex
        #[arg(value_name = "WORD", value_parser = arx::parse_word)]
        word: u32,

        /// Initial register value, e.g. `--reg 1=0xffffffff` (repeatable)
        #[arg(long = "reg", value_name = "N=VALUE", value_parser = arx::parse_reg)]
        regs: Vec<(u8, u64)>,
    },
}

/// Host capability selection.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum HostArg {
    /// Detect the running CPU
    #[default]
    Auto,
    /// Assume carry-less multiply support
    Pclmulqdq,
    /// No optional features; always call the software routines
    None,
}

impl From<HostArg> for HostFeatures {
    fn from(arg: HostArg) -> Self {
        match arg {
            HostArg::Auto => Self::host(),
            HostArg::Pclmulqdq => Self::all(),
            HostArg::None => Self::none(),
        }
    }
}
