use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quantum_stego_core::SteganoMode;

use crate::commands::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// TOML file with options, missing keys keep their defaults
    #[arg(short, long, value_name = "config file", global = true)]
    pub config: Option<PathBuf>,

    /// Placement mode, overrides the one derived from the chaos intensity [psi, phi, tau]
    #[arg(long, value_name = "mode", global = true)]
    pub mode: Option<SteganoMode>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Hide(hide::HideArgs),
    Unveil(unveil::UnveilArgs),
    UnveilRaw(unveil_raw::UnveilRawArgs),
    Checksum(checksum::ChecksumArgs),
    Header(header::HeaderArgs),
}
