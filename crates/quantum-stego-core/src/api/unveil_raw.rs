use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use image::DynamicImage;

use crate::{
    bit_packer::tag_to_bytes, media::mode::select_mode, QuantumStegoError, SteganoMode,
    StegoOptions,
};

pub fn prepare() -> UnveilRawApi {
    UnveilRawApi::default()
}

/// Dumps the raw bytes read from a mode's placement slots, no catalog lookup happens.
#[derive(Default, Debug)]
pub struct UnveilRawApi {
    secret_image: Option<PathBuf>,
    destination_file: Option<PathBuf>,
    positions: Option<Vec<(u32, u32)>>,
    options: StegoOptions,
}

impl UnveilRawApi {
    pub fn with_options(mut self, options: StegoOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_mode(mut self, mode: SteganoMode) -> Self {
        self.options.mode = Some(mode);
        self
    }

    /// read along these positions instead of raster order
    pub fn with_positions(mut self, positions: Vec<(u32, u32)>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// This is the secret image that contains the data to be unveiled
    pub fn from_secret_file(mut self, secret_image: impl AsRef<Path>) -> Self {
        self.secret_image = Some(secret_image.as_ref().to_path_buf());
        self
    }

    /// This is the raw file where all data will be saved to
    pub fn into_raw_file(mut self, destination_file: impl AsRef<Path>) -> Self {
        self.destination_file = Some(destination_file.as_ref().to_path_buf());
        self
    }

    /// Execute the unveil process and blocks until it is finished, returns the bytes written
    pub fn execute(self) -> Result<Vec<u8>, QuantumStegoError> {
        let Some(secret_image) = self.secret_image else {
            return Err(QuantumStegoError::CarrierNotSet);
        };
        let Some(destination_file) = self.destination_file else {
            return Err(QuantumStegoError::TargetNotSet);
        };

        let mode = self
            .options
            .mode
            .unwrap_or_else(|| select_mode(self.options.chaos_intensity));
        let image: DynamicImage = image::open(secret_image)?;
        let raw = mode.try_decode(&image, self.positions.as_deref())?;
        let bytes = tag_to_bytes(&raw)?;

        let mut destination_file = File::create(destination_file)
            .map_err(|source| QuantumStegoError::WriteError { source })?;
        destination_file
            .write_all(&bytes)
            .map_err(|source| QuantumStegoError::WriteError { source })?;

        Ok(bytes)
    }
}
