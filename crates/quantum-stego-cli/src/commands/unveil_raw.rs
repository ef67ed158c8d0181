use std::path::PathBuf;

use clap::Args;
use quantum_stego_core::StegoOptions;

use crate::CliResult;

/// Unveils the raw tag bytes of a PNG image
#[derive(Args, Debug)]
pub struct UnveilRawArgs {
    /// Source image that contains the tag
    #[arg(
        short = 'i',
        long = "in",
        value_name = "image source file",
        required = true
    )]
    pub media: PathBuf,

    /// Raw data will be stored as binary file
    #[arg(short = 'o', long = "out", value_name = "output file", required = true)]
    pub output_file: PathBuf,

    /// Read along these pixel positions instead of raster order, e.g. 3,4
    #[arg(short = 'p', long = "position", value_name = "x,y", value_parser = parse_position)]
    pub positions: Vec<(u32, u32)>,
}

impl UnveilRawArgs {
    pub fn run(self, options: StegoOptions) -> CliResult<()> {
        let positions = (!self.positions.is_empty()).then_some(self.positions);
        let raw = quantum_stego_core::commands::unveil_raw(
            &self.media,
            &self.output_file,
            options,
            positions,
        )?;
        println!("{} bytes written to {}", raw.len(), self.output_file.display());

        Ok(())
    }
}

fn parse_position(s: &str) -> Result<(u32, u32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s}"))?;
    let x = x.trim().parse().map_err(|e| format!("invalid x: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("invalid y: {e}"))?;

    Ok((x, y))
}
