use std::path::PathBuf;

use clap::Args;
use quantum_stego_core::StegoOptions;

use crate::CliResult;

/// Hides the tag of a file type in a PNG image
#[derive(Args, Debug)]
pub struct HideArgs {
    /// Carrier image, used readonly.
    #[arg(short = 'i', long = "in", value_name = "image file", required = true)]
    pub media: PathBuf,

    /// Final image will be stored as PNG file
    #[arg(
        short = 'o',
        long = "out",
        value_name = "output image file",
        required = true
    )]
    pub write_to_file: PathBuf,

    /// File type whose tag is hidden, e.g. image/png
    #[arg(short = 't', long = "type", value_name = "file type", required = true)]
    pub file_type: String,

    /// Do not consult the content validator
    #[arg(long)]
    pub skip_ethical_check: bool,
}

impl HideArgs {
    pub fn run(self, options: StegoOptions) -> CliResult<()> {
        quantum_stego_core::commands::hide(
            &self.media,
            &self.write_to_file,
            &self.file_type,
            options,
            self.skip_ethical_check,
        )?;
        println!("{} tagged as {}", self.write_to_file.display(), self.file_type);

        Ok(())
    }
}
