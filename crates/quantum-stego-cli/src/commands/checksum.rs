use std::path::PathBuf;

use clap::{Args, Subcommand};
use quantum_stego_core::media::Region;
use quantum_stego_core::StegoOptions;

use crate::CliResult;

/// Computes, embeds or extracts the φ-folded header checksum
#[derive(Args, Debug)]
pub struct ChecksumArgs {
    #[command(subcommand)]
    pub command: ChecksumCommands,
}

#[derive(Subcommand, Debug)]
pub enum ChecksumCommands {
    /// Prints the checksum of a region
    Compute(RegionArgs),
    /// Stores the checksum of a region in the header of a copy of the image
    Embed(EmbedArgs),
    /// Prints the checksum stored in the header
    Extract(ImageArgs),
    /// Compares the stored checksum with a fresh one
    Verify(RegionArgs),
}

#[derive(Args, Debug)]
pub struct ImageArgs {
    #[arg(short = 'i', long = "in", value_name = "image file", required = true)]
    pub media: PathBuf,
}

#[derive(Args, Debug)]
pub struct RegionArgs {
    #[arg(short = 'i', long = "in", value_name = "image file", required = true)]
    pub media: PathBuf,

    /// Region as x1,y1,x2,y2, defaults to the configured checksum region
    #[arg(short, long, value_name = "x1,y1,x2,y2", value_parser = parse_region)]
    pub region: Option<Region>,
}

#[derive(Args, Debug)]
pub struct EmbedArgs {
    #[command(flatten)]
    pub region: RegionArgs,

    /// The image with the embedded checksum, always PNG
    #[arg(short = 'o', long = "out", value_name = "output image file", required = true)]
    pub write_to_file: PathBuf,
}

impl ChecksumArgs {
    pub fn run(self, options: StegoOptions) -> CliResult<()> {
        let default_region = options.checksum_region;
        match self.command {
            ChecksumCommands::Compute(args) => {
                let checksum = quantum_stego_core::commands::checksum_compute(
                    &args.media,
                    args.region.unwrap_or(default_region),
                )?;
                println!("{checksum}");
            }
            ChecksumCommands::Embed(args) => {
                let checksum = quantum_stego_core::commands::checksum_embed(
                    &args.region.media,
                    &args.write_to_file,
                    args.region.region.unwrap_or(default_region),
                )?;
                println!("{checksum}");
            }
            ChecksumCommands::Extract(args) => {
                println!("{}", quantum_stego_core::commands::checksum_extract(&args.media)?);
            }
            ChecksumCommands::Verify(args) => {
                let valid = quantum_stego_core::commands::checksum_verify(
                    &args.media,
                    args.region.unwrap_or(default_region),
                )?;
                println!("{}", if valid { "valid" } else { "mismatch" });
            }
        }

        Ok(())
    }
}

fn parse_region(s: &str) -> Result<Region, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<i64>().map_err(|e| format!("invalid coordinate {p}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match parts[..] {
        [x1, y1, x2, y2] => Ok(Region::new(x1, y1, x2, y2)),
        _ => Err(format!("expected x1,y1,x2,y2 but got {s}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_regions() {
        assert_eq!(parse_region("0,0,64,64"), Ok(Region::new(0, 0, 64, 64)));
        assert_eq!(parse_region("-5, 1, 2, 3"), Ok(Region::new(-5, 1, 2, 3)));
        assert!(parse_region("1,2,3").is_err());
        assert!(parse_region("a,b,c,d").is_err());
    }
}
