//! Free functions behind the `qstego` subcommands, one per subcommand.

use std::path::Path;

use image::{DynamicImage, ImageFormat};
use log::info;

use crate::media::checksum::{self, Region};
use crate::media::fractal::{FractalHeaderGenerator, Window};
use crate::{QuantumStegoError, Result, StegoOptions};

pub fn hide(
    media: &Path,
    write_to_file: &Path,
    file_type: &str,
    options: StegoOptions,
    skip_ethical_check: bool,
) -> Result<()> {
    let api = crate::api::hide::prepare()
        .with_options(options)
        .with_image(media)
        .with_output(write_to_file)
        .with_file_type(file_type);

    if skip_ethical_check {
        api.skip_ethical_check().execute()
    } else {
        api.execute()
    }
}

pub fn unveil(
    secret_media: &Path,
    options: StegoOptions,
    skip_temporal_validation: bool,
) -> Result<Option<String>> {
    let api = crate::api::unveil::prepare()
        .with_options(options)
        .with_secret_image(secret_media);

    if skip_temporal_validation {
        api.skip_temporal_validation().execute()
    } else {
        api.execute()
    }
}

/// unveil the raw tag bytes, no catalog lookup is happening.
pub fn unveil_raw(
    secret_media: &Path,
    destination_file: &Path,
    options: StegoOptions,
    positions: Option<Vec<(u32, u32)>>,
) -> Result<Vec<u8>> {
    let api = crate::api::unveil_raw::prepare()
        .with_options(options)
        .from_secret_file(secret_media)
        .into_raw_file(destination_file);

    match positions {
        Some(positions) => api.with_positions(positions).execute(),
        None => api.execute(),
    }
}

pub fn checksum_compute(media: &Path, region: Region) -> Result<u8> {
    let image = image::open(media)?;
    checksum::compute(&image, region)
}

/// computes the checksum over `region` and stores it in the header of a PNG copy
pub fn checksum_embed(media: &Path, write_to_file: &Path, region: Region) -> Result<u8> {
    let mut image = image::open(media)?;
    if !matches!(
        image,
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)
    ) {
        image = DynamicImage::ImageRgb8(image.to_rgb8());
    }

    let value = checksum::compute(&image, region)?;
    checksum::embed(&mut image, value);
    save_png(&image, write_to_file)?;
    info!("checksum {value:#04x} embedded into {}", write_to_file.display());

    Ok(value)
}

pub fn checksum_extract(media: &Path) -> Result<u8> {
    let image = image::open(media)?;
    checksum::extract(&image)
}

/// true if the embedded checksum matches a fresh computation over `region`
pub fn checksum_verify(media: &Path, region: Region) -> Result<bool> {
    let image = image::open(media)?;
    checksum::verify(&image, region)
}

pub fn fractal_header(
    width: u32,
    height: u32,
    window: Window,
    write_to_file: &Path,
) -> Result<()> {
    let header = FractalHeaderGenerator::with_window(window).generate(width, height);
    save_png(&DynamicImage::ImageRgb8(header), write_to_file)
}

fn save_png(image: &DynamicImage, target: &Path) -> Result<()> {
    image
        .save_with_format(target, ImageFormat::Png)
        .map_err(|e| match e {
            image::ImageError::IoError(source) => QuantumStegoError::WriteError { source },
            _ => QuantumStegoError::ImageEncodingError,
        })
}
