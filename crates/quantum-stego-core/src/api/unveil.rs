use std::path::{Path, PathBuf};

use crate::{QuantumSteganography, QuantumStegoError, SteganoMode, StegoOptions};

pub fn prepare() -> UnveilApi {
    UnveilApi::default()
}

#[derive(Default, Debug)]
pub struct UnveilApi {
    secret_image: Option<PathBuf>,
    options: StegoOptions,
    skip_temporal_validation: bool,
}

impl UnveilApi {
    /// Use the given options, the mode has to match the one used for hiding
    pub fn with_options(mut self, options: StegoOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_mode(mut self, mode: SteganoMode) -> Self {
        self.options.mode = Some(mode);
        self
    }

    /// This is the secret image that contains the tag to be unveiled
    pub fn with_secret_image(mut self, secret_image: impl AsRef<Path>) -> Self {
        self.secret_image = Some(secret_image.as_ref().to_path_buf());
        self
    }

    pub fn skip_temporal_validation(mut self) -> Self {
        self.skip_temporal_validation = true;
        self
    }

    /// Execute the unveil process, `None` if the tag matches no known file type
    pub fn execute(self) -> Result<Option<String>, QuantumStegoError> {
        let Some(secret_image) = self.secret_image else {
            return Err(QuantumStegoError::CarrierNotSet);
        };

        let validate_temporal = self.options.validate_temporal && !self.skip_temporal_validation;
        QuantumSteganography::with_options(self.options).try_decode(secret_image, validate_temporal)
    }
}
