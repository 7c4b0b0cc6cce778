//! MIST32 instruction-set simulator CLI.
//!
//! This binary is a thin host around the core library. It performs:
//! 1. **Setup:** Reads an optional JSON configuration, applies command-line overrides,
//!    and places a flat program image in RAM.
//! 2. **Run:** Drives the cycle loop until halt, null return, cycle limit, or Ctrl-C.
//! 3. **Stepping:** Breakpoints drop into an interactive stdin stepper.
//! 4. **Report:** Prints statistics and the final register dump.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::OnceLock;

use clap::{ArgAction, Parser};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mist32_core::Config;
use mist32_core::common::SimError;
use mist32_core::core::Cpu;
use mist32_core::sim::{CancelToken, ExitReason, Simulator, StepAction, Stepper, loader};

/// Exit status after a Ctrl-C.
const EXIT_INTERRUPTED: u8 = 130;

/// Token the SIGINT handler sets; installed once before the run starts.
static CANCEL: OnceLock<CancelToken> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "mist32sim",
    author,
    version,
    about = "MIST32 instruction-set simulator",
    long_about = "Load a flat binary image into emulated RAM and execute it.\n\nExamples:\n  mist32sim kernel.bin\n  mist32sim --load-addr 0x1000 --entry 0x1000 prog.bin\n  mist32sim --config board.json --break 0x1040 -vv prog.bin"
)]
struct Cli {
    /// Flat program image to load.
    image: PathBuf,

    /// Physical address the image is loaded at.
    #[arg(long, value_parser = parse_u32, default_value = "0")]
    load_addr: u32,

    /// Entry PC (defaults to the configured entry, else the load address).
    #[arg(long, value_parser = parse_u32)]
    entry: Option<u32>,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Breakpoint address; may be repeated.
    #[arg(short = 'b', long = "break", value_parser = parse_u32)]
    breakpoints: Vec<u32>,

    /// Stop after this many cycles.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Stop when PC and R31 both reach zero.
    #[arg(long)]
    exit_on_null_return: bool,

    /// Raise the log level (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Errors the host can hit before or around the run.
#[derive(Debug, Error)]
enum CliError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Sim(#[from] SimError),
}

/// Parses a decimal or `0x`-prefixed hexadecimal address.
fn parse_u32(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

/// Interactive stepper reading commands from stdin.
#[derive(Debug, Default)]
struct StdinStepper;

impl Stepper for StdinStepper {
    fn on_step(&mut self, cpu: &Cpu) -> StepAction {
        println!("{}", cpu.dump_state());
        print!("[{:#010x}] (s)tep, (c)ontinue, (q)uit > ", cpu.sys.pc);
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => StepAction::Abort,
            Ok(_) => match line.trim() {
                "c" | "continue" => StepAction::Continue,
                "q" | "quit" => StepAction::Abort,
                _ => StepAction::Step,
            },
        }
    }
}

extern "C" fn on_sigint(_sig: libc::c_int) {
    if let Some(token) = CANCEL.get() {
        token.cancel();
    }
}

/// Routes SIGINT to the simulator's cancellation token.
fn install_sigint(token: CancelToken) {
    let _ = CANCEL.set(token);
    let handler: extern "C" fn(libc::c_int) = on_sigint;
    // SAFETY: the handler only performs an atomic store through an already
    // initialised `OnceLock`, which is async-signal-safe.
    let _ = unsafe { libc::signal(libc::SIGINT, handler as libc::sighandler_t) };
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            Config::from_json(&text)?
        }
        None => Config::default(),
    };

    config.debug.breakpoints.extend(&cli.breakpoints);
    if cli.max_cycles.is_some() {
        config.general.max_cycles = cli.max_cycles;
    }
    if cli.exit_on_null_return {
        config.general.exit_on_null_return = true;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<ExitReason, CliError> {
    let config = load_config(cli)?;
    let image = loader::load_binary(&cli.image).map_err(|source| CliError::Io {
        path: cli.image.clone(),
        source,
    })?;

    let mut sim = Simulator::new(&config)?;
    loader::load_image(&mut sim.cpu, &image, cli.load_addr)?;
    let entry = cli.entry.unwrap_or(if config.general.entry_pc != 0 {
        config.general.entry_pc
    } else {
        cli.load_addr
    });
    loader::set_entry(&mut sim.cpu, entry);
    sim.set_stepper(Box::new(StdinStepper));
    install_sigint(sim.cancel_token());

    let result = sim.run();

    sim.cpu.stats().print();
    println!("{}", sim.cpu.dump_state());
    Ok(result?)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(reason) => {
            info!(%reason, "exit");
            match reason {
                ExitReason::Halted | ExitReason::NullReturn | ExitReason::CycleLimit => {
                    ExitCode::SUCCESS
                }
                ExitReason::Cancelled => ExitCode::from(EXIT_INTERRUPTED),
                ExitReason::Aborted => ExitCode::FAILURE,
            }
        }
        Err(e) => {
            eprintln!("\n[!] FATAL: {e}");
            ExitCode::FAILURE
        }
    }
}
