use std::path::{Path, PathBuf};

use crate::{QuantumSteganography, QuantumStegoError, SteganoMode, StegoOptions};

pub fn prepare() -> HideApi {
    HideApi::default()
}

#[derive(Default, Debug)]
pub struct HideApi {
    image: Option<PathBuf>,
    output: Option<PathBuf>,
    file_type: Option<String>,
    options: StegoOptions,
    skip_ethical_check: bool,
}

impl HideApi {
    pub fn with_options(mut self, options: StegoOptions) -> Self {
        self.options = options;
        self
    }

    /// overrides the mode derived from the options
    pub fn with_mode(mut self, mode: SteganoMode) -> Self {
        self.options.mode = Some(mode);
        self
    }

    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    /// the file type whose tag is hidden, it has to be in the catalog to be found again
    pub fn with_file_type(mut self, file_type: &str) -> Self {
        self.file_type = Some(file_type.to_string());
        self
    }

    pub fn skip_ethical_check(mut self) -> Self {
        self.skip_ethical_check = true;
        self
    }

    pub fn execute(self) -> Result<(), QuantumStegoError> {
        let Some(file_type) = self.file_type else {
            return Err(QuantumStegoError::MissingFileType);
        };
        let Some(image) = self.image else {
            return Err(QuantumStegoError::CarrierNotSet);
        };
        let Some(output) = self.output else {
            return Err(QuantumStegoError::TargetNotSet);
        };

        let ethical_check = self.options.ethical_check && !self.skip_ethical_check;
        QuantumSteganography::with_options(self.options).try_encode(
            image,
            output,
            &file_type,
            ethical_check,
        )
    }
}
