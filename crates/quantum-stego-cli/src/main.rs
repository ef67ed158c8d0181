use clap::Parser;
use log::debug;
use quantum_stego_core::{QuantumStegoError, StegoOptions};

mod cli;
mod commands;

use cli::{CliArgs, Commands};

pub type CliResult<T> = Result<T, QuantumStegoError>;

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let mut options = match &args.config {
        Some(config) => StegoOptions::from_file(config)?,
        None => StegoOptions::default(),
    };
    if let Some(mode) = args.mode {
        options.mode = Some(mode);
    }
    debug!("running with {options:?}");

    match args.command {
        Commands::Hide(hide) => hide.run(options),
        Commands::Unveil(unveil) => unveil.run(options),
        Commands::UnveilRaw(unveil_raw) => unveil_raw.run(options),
        Commands::Checksum(checksum) => checksum.run(options),
        Commands::Header(header) => header.run(),
    }
}
