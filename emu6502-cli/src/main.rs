use std::path::PathBuf;
use std::process;

use clap::Parser;
use colored::Colorize;
use log::LevelFilter;

use emu6502::debugger::Debugger;
use emu6502::emulator::Emulator;
use emu6502::inspect;
use emu6502::memory::ImageError;
use emu6502::ticker::{Ticker, DEFAULT_CLOCK_HZ};
use emu6502::util::parse_hex;

const VERSION: &str = concat!("6502 Emulator v", env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(
    name = "emu6502",
    about = "MOS 6502 emulator, assembler and debugger",
    disable_version_flag = true
)]
struct Cli {
    /// Load an object file
    #[arg(short = 'l', value_name = "FILE")]
    load: Option<PathBuf>,

    /// Assemble a source file
    #[arg(short = 'c', value_name = "FILE")]
    source: Option<PathBuf>,

    /// Save the object file after assembly
    #[arg(short = 's', value_name = "FILE")]
    save: Option<PathBuf>,

    /// Run code from the hex address (e.g. A000; defaults to 4000)
    #[arg(short = 'r', value_name = "ADDR", num_args = 0..=1, default_missing_value = "4000")]
    run: Option<String>,

    /// Enter the debugger at the hex address
    #[arg(short = 'd', value_name = "ADDR")]
    debug: Option<String>,

    /// After execution, assert that memory at ADDR holds VAL (hex)
    #[arg(short = 'a', value_name = "ADDR:VAL")]
    assert: Option<String>,

    /// Turn on trace output
    #[arg(short = 't')]
    trace: bool,

    /// Dump registers, flags, stack and/or memory on exit
    #[arg(short = 'p', value_name = "RFSM", num_args = 0..=1, default_missing_value = "rfm")]
    print: Option<String>,

    /// List the assembler instructions
    #[arg(short = 'i')]
    instructions: bool,

    /// Print version information
    #[arg(short = 'v')]
    version: bool,

    /// CPU clock rate in Hz
    #[arg(long, value_name = "HZ", default_value_t = DEFAULT_CLOCK_HZ)]
    rate: u32,
}

fn main() {
    let cli = Cli::parse();

    // The logger always passes trace through; the global max level is the
    // actual switch, so the debugger's `trace` command can toggle it later.
    env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .init();
    log::set_max_level(if cli.trace {
        LevelFilter::Trace
    } else {
        LevelFilter::Warn
    });

    if cli.version {
        eprintln!("{VERSION}");
    }

    if cli.instructions {
        inspect::print_instructions();
    }

    let mut emulator = Emulator::new(Ticker::new(cli.rate));

    if cli.source.is_some() && cli.load.is_some() {
        eprintln!(
            "{}",
            "Warning: both -c and -l specified, will ignore load flag".yellow()
        );
    }

    if let Some(path) = &cli.source {
        if let Err(err) = emulator.assemble(path) {
            report(&err.to_string());
            process::exit(err.exit_code());
        }
        if let Some(path) = &cli.save {
            if let Err(err) = emulator.save(path) {
                exit_with_image_error(err);
            }
        }
    } else if let Some(path) = &cli.load {
        if let Err(err) = emulator.load(path) {
            exit_with_image_error(err);
        }
    }

    if cli.run.is_some() && cli.debug.is_some() {
        eprintln!(
            "{}",
            "Warning: both -r and -d specified, will ignore debug flag".yellow()
        );
    }

    let mut status = 0;

    if let Some(address) = &cli.run {
        emulator.run(require_hex(address, "-r"));
    } else if let Some(address) = &cli.debug {
        let entry = require_hex(address, "-d");
        let mut debugger = Debugger::new(&mut emulator, entry, cli.trace);
        if let Err(err) = debugger.run() {
            report(&err.to_string());
            status = err.raw_os_error().unwrap_or(1);
        }
    }

    if let Some(assertion) = &cli.assert {
        let (address, value) = parse_assertion(assertion);
        let holds = inspect::assert_mem(&emulator.memory, address, value);
        eprintln!("{}", if holds { "true" } else { "false" });
        if !holds && status == 0 {
            status = 1;
        }
    }

    if let Some(selection) = &cli.print {
        let selection = selection.to_uppercase();
        inspect::dump(
            &emulator.cpu,
            &emulator.memory,
            selection.contains('R'),
            selection.contains('F'),
            selection.contains('S'),
            selection.contains('M'),
        );
    }

    process::exit(status);
}

fn report(message: &str) {
    eprintln!("{}", format!("Error: {message}").bright_red());
}

fn exit_with_image_error(err: ImageError) -> ! {
    report(&err.to_string());
    process::exit(err.exit_code());
}

fn require_hex(text: &str, flag: &str) -> u16 {
    match parse_hex(text) {
        Some(value) => value,
        None => {
            report(&format!("{flag} expects a hex address, found {text}"));
            process::exit(2);
        }
    }
}

/// Split an `-a ADDR:VAL` argument. The value is truncated to a byte, the
/// way the debugger's assert command reads it.
fn parse_assertion(text: &str) -> (u16, u8) {
    let parsed = text
        .split_once(':')
        .and_then(|(address, value)| Some((parse_hex(address)?, parse_hex(value)? as u8)));
    match parsed {
        Some(pair) => pair,
        None => {
            report(&format!("-a expects <hex-addr>:<hex-val>, found {text}"));
            process::exit(2);
        }
    }
}
