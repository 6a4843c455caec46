use std::io;
use std::process::ExitCode;

use clap::Parser;
use log::debug;

use rum::machine::{self, Machine};

/// A minimal 32-bit register virtual machine.
#[derive(Parser, Debug)]
#[command(name = "rum")]
struct Args {
    /// Path to the flat binary program file (32-bit big-endian code words).
    program: std::path::PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rum: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), rum::VmError> {
    let bytes = std::fs::read(&args.program)?;
    debug!("read {} bytes from {}", bytes.len(), args.program.display());

    let words = machine::load_program(&bytes)?;
    let mut vm = Machine::boot(words);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();
    vm.run(&mut input, &mut output)
}
