//! Nibble Emulator - CLI Entry Point
//!
//! Usage: `nibble-emu <ROM> [--config layout.json] [--max-cycles N] [--dump-state] [-v]`
//!
//! Diagnostics, including every debug port write, go to stderr.

use std::process::ExitCode;
use std::sync::atomic::AtomicBool;

use clap::error::ErrorKind;
use clap::Parser;
use nibble::{Cpu, CpuState, MachineConfig, Nibble, Registers, RunOutcome, load_rom};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nibble-emu")]
#[command(version = "0.1.0")]
#[command(about = "Run a ROM image on the 4-bit NAND machine")]
struct Cli {
    /// Path to the raw ROM image
    rom: String,
    /// JSON file describing the address-space layout
    #[arg(short, long)]
    config: Option<String>,
    /// Stop after this many instructions (default: run until a fault)
    #[arg(short, long)]
    max_cycles: Option<u64>,
    /// Print the final machine state as JSON on stdout
    #[arg(long)]
    dump_state: bool,
    /// Increase log verbosity (-v debug, -vv per-instruction trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct StateDump<'a> {
    state: CpuState,
    cycles: u64,
    registers: &'a Registers,
    debug_output: Option<Nibble>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => MachineConfig::load(path).map_err(|e| e.to_string())?,
        None => MachineConfig::default(),
    };

    let rom = load_rom(&cli.rom).map_err(|e| e.to_string())?;
    tracing::debug!("{}: {} nibbles", cli.rom, rom.nibble_len());

    let space = config.build_address_space(rom).map_err(|e| e.to_string())?;
    let mut cpu = Cpu::new(space);

    let result = match cli.max_cycles {
        Some(limit) => cpu.run_limited(limit).map(|cycles| {
            tracing::info!("reached cycle limit after {} instructions", cycles);
        }),
        None => {
            // Nothing raises this yet; a host embedding the CPU would.
            let stop = AtomicBool::new(false);
            cpu.run(&stop).map(|RunOutcome::Stopped { cycles }| {
                tracing::info!("stopped after {} instructions", cycles);
            })
        }
    };

    if cli.dump_state {
        dump_state(&cpu)?;
    }

    // The fault itself was already logged by the CPU.
    result.map_err(|e| format!("emulation aborted: {}", e))
}

fn dump_state(cpu: &Cpu) -> Result<(), String> {
    let dump = StateDump {
        state: cpu.state,
        cycles: cpu.cycles,
        registers: &cpu.regs,
        debug_output: cpu.space.debug_output(),
    };
    let json = serde_json::to_string_pretty(&dump).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}
