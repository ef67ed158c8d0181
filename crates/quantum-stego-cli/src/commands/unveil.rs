use std::path::PathBuf;

use clap::Args;
use quantum_stego_core::{StegoOptions, UNKNOWN_FILE_TYPE};

use crate::CliResult;

/// Unveils the file type a PNG image was tagged with
#[derive(Args, Debug)]
pub struct UnveilArgs {
    /// Source image that contains the tag
    #[arg(
        short = 'i',
        long = "in",
        value_name = "image source file",
        required = true
    )]
    pub media: PathBuf,

    /// Do not consult the temporal pattern analyzer
    #[arg(long)]
    pub skip_temporal_validation: bool,
}

impl UnveilArgs {
    pub fn run(self, options: StegoOptions) -> CliResult<()> {
        let file_type = quantum_stego_core::commands::unveil(
            &self.media,
            options,
            self.skip_temporal_validation,
        )?;
        println!("{}", file_type.as_deref().unwrap_or(UNKNOWN_FILE_TYPE));

        Ok(())
    }
}
