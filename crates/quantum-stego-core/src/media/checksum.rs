//! φ-folded 8 bit checksum over an image region, stored in the header region.
//!
//! Nothing in encode or decode verifies the checksum automatically,
//! [`verify`] is there for callers that want to.

use image::{DynamicImage, ImageBuffer, Pixel};
use log::warn;
use serde::Deserialize;

use crate::error::QuantumStegoError;
use crate::result::Result;
use crate::PHI;

/// header region the checksum lives in, bits are placed at `(i % 50, i / 50)`
pub const HEADER_SIZE: (u32, u32) = (50, 50);
/// reserved location of a mode marker inside the header
pub const MODE_MARKER_LOCATION: (u32, u32) = (10, 10);
pub const CHECKSUM_REGION: Region = Region::new(100, 100, 200, 200);
pub const CHECKSUM_BITS: u32 = 8;

/// rectangle `[x1, x2) x [y1, y2)`, may straddle or exceed the image, it is clamped on use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Region {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl Region {
    pub const fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// clamps into the image, the start stays on a pixel, the end never precedes the start
    pub fn clamp(&self, width: u32, height: u32) -> Result<Region> {
        if width == 0 || height == 0 {
            return Err(QuantumStegoError::ChecksumError(format!(
                "cannot clamp a region into a {width}x{height} image"
            )));
        }
        let (w, h) = (width as i64, height as i64);
        let x1 = self.x1.clamp(0, w - 1);
        let y1 = self.y1.clamp(0, h - 1);
        let x2 = self.x2.min(w).max(x1);
        let y2 = self.y2.min(h).max(y1);

        Ok(Region { x1, y1, x2, y2 })
    }
}

impl Default for Region {
    fn default() -> Self {
        CHECKSUM_REGION
    }
}

/// Folds `(checksum + r + g + b) * φ mod 256` over the clamped region, row by row.
pub fn compute(image: &DynamicImage, region: Region) -> Result<u8> {
    match image {
        DynamicImage::ImageRgb8(buf) => compute_buffer(buf, region),
        DynamicImage::ImageRgba8(buf) => compute_buffer(buf, region),
        other => compute_buffer(&other.to_rgb8(), region),
    }
}

fn compute_buffer<P>(image: &ImageBuffer<P, Vec<u8>>, region: Region) -> Result<u8>
where
    P: Pixel<Subpixel = u8>,
{
    if P::CHANNEL_COUNT < 3 {
        return Err(QuantumStegoError::ChecksumError(
            "at least 3 color channels are needed".to_string(),
        ));
    }
    let (width, height) = image.dimensions();
    let region = region.clamp(width, height)?;

    let mut checksum: u8 = 0;
    for y in region.y1..region.y2 {
        for x in region.x1..region.x2 {
            let channels = image.get_pixel(x as u32, y as u32).channels();
            let sum = checksum as u32 + channels[..3].iter().map(|c| *c as u32).sum::<u32>();
            checksum = ((sum as f64 * PHI).floor() as u64 % 256) as u8;
        }
    }

    Ok(checksum)
}

/// writes the checksum MSB first into the red LSB of the first 8 header pixels.
/// Carriers too small for the header are left alone.
pub fn embed(image: &mut DynamicImage, checksum: u8) {
    let result = match image {
        DynamicImage::ImageRgb8(buf) => embed_buffer(buf, checksum),
        DynamicImage::ImageRgba8(buf) => embed_buffer(buf, checksum),
        _ => Err(QuantumStegoError::UnsupportedPixelFormat(
            "checksum header".to_string(),
        )),
    };
    if let Err(e) = result {
        warn!("checksum was not embedded: {e}");
    }
}

fn embed_buffer<P>(image: &mut ImageBuffer<P, Vec<u8>>, checksum: u8) -> Result<()>
where
    P: Pixel<Subpixel = u8>,
{
    check_header_capacity(image.width(), image.height())?;
    for (x, y, bit) in header_positions().map(|(i, x, y)| (x, y, (checksum >> (7 - i)) & 1)) {
        let red = &mut image.get_pixel_mut(x, y).channels_mut()[0];
        *red = (*red & !1) | bit;
    }

    Ok(())
}

pub fn extract(image: &DynamicImage) -> Result<u8> {
    match image {
        DynamicImage::ImageRgb8(buf) => extract_buffer(buf),
        DynamicImage::ImageRgba8(buf) => extract_buffer(buf),
        other => extract_buffer(&other.to_rgb8()),
    }
}

fn extract_buffer<P>(image: &ImageBuffer<P, Vec<u8>>) -> Result<u8>
where
    P: Pixel<Subpixel = u8>,
{
    check_header_capacity(image.width(), image.height())?;

    Ok(header_positions().fold(0u8, |checksum, (_, x, y)| {
        (checksum << 1) | (image.get_pixel(x, y).channels()[0] & 1)
    }))
}

/// compares the embedded checksum with a fresh computation over `region`
pub fn verify(image: &DynamicImage, region: Region) -> Result<bool> {
    Ok(extract(image)? == compute(image, region)?)
}

/// [`compute`] with a `-1` sentinel instead of an error
pub fn calculate_checksum(image: &DynamicImage, region: Region) -> i16 {
    compute(image, region).map(i16::from).unwrap_or_else(|e| {
        warn!("checksum computation failed: {e}");
        -1
    })
}

/// [`extract`] with a `-1` sentinel instead of an error
pub fn extract_checksum(image: &DynamicImage) -> i16 {
    extract(image).map(i16::from).unwrap_or_else(|e| {
        warn!("checksum extraction failed: {e}");
        -1
    })
}

fn header_positions() -> impl Iterator<Item = (u32, u32, u32)> {
    (0..CHECKSUM_BITS).map(|i| (i, i % HEADER_SIZE.0, i / HEADER_SIZE.0))
}

fn check_header_capacity(width: u32, height: u32) -> Result<()> {
    if width < CHECKSUM_BITS.min(HEADER_SIZE.0) || height < 1 {
        return Err(QuantumStegoError::ChecksumError(format!(
            "a {width}x{height} image cannot hold the checksum header"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::prepare_rgb_image;
    use image::{Rgb, RgbImage};

    #[test]
    fn should_clamp_regions_into_the_image() {
        assert_eq!(
            Region::new(-5, -5, 500, 500).clamp(10, 20).unwrap(),
            Region::new(0, 0, 10, 20)
        );
        assert_eq!(
            Region::new(100, 100, 200, 200).clamp(10, 10).unwrap(),
            Region::new(9, 9, 10, 10)
        );
        assert_eq!(
            Region::new(5, 5, 2, 2).clamp(10, 10).unwrap(),
            Region::new(5, 5, 5, 5)
        );
    }

    #[test]
    fn should_fail_to_clamp_into_an_empty_image() {
        assert!(Region::new(0, 0, 1, 1).clamp(0, 5).is_err());
    }

    #[test]
    fn should_fold_through_phi() {
        // one white pixel: floor(765 * φ) = 1237, 1237 mod 256 = 213
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([255, 255, 255])));
        assert_eq!(compute(&img, Region::new(0, 0, 1, 1)).unwrap(), 213);
    }

    #[test]
    fn should_fold_in_row_major_order() {
        // two pixels with different sums, the order changes the result
        let mut buf = RgbImage::new(2, 2);
        buf.put_pixel(1, 0, Rgb([10, 0, 0]));
        buf.put_pixel(0, 1, Rgb([0, 0, 1]));
        let img = DynamicImage::ImageRgb8(buf);

        // (0,0): 0 -> 0 ; (1,0): floor(10φ)=16 ; (0,1): floor(17φ)=27 ; (1,1): floor(27φ)=43
        assert_eq!(compute(&img, Region::new(0, 0, 2, 2)).unwrap(), 43);
    }

    #[test]
    fn should_return_zero_for_an_empty_region() {
        let img = DynamicImage::ImageRgb8(prepare_rgb_image(10, 10));
        assert_eq!(compute(&img, Region::new(4, 4, 4, 8)).unwrap(), 0);
    }

    #[test]
    fn should_return_the_sentinel_for_empty_images() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert_eq!(calculate_checksum(&img, CHECKSUM_REGION), -1);
        assert_eq!(extract_checksum(&img), -1);
    }

    #[test]
    fn should_embed_and_extract() {
        let mut img = DynamicImage::ImageRgb8(prepare_rgb_image(60, 60));
        for checksum in [0u8, 1, 0b1010_0101, 255] {
            embed(&mut img, checksum);
            assert_eq!(extract(&img).unwrap(), checksum);
        }
    }

    #[test]
    fn should_embed_msb_first_into_the_first_row() {
        let mut img = DynamicImage::ImageRgb8(RgbImage::new(50, 2));
        embed(&mut img, 0b1000_0001);
        let buf = img.as_rgb8().unwrap();

        assert_eq!(buf.get_pixel(0, 0).0[0], 1);
        assert_eq!(buf.get_pixel(7, 0).0[0], 1);
        assert!((1..7).all(|x| buf.get_pixel(x, 0).0[0] == 0));
        assert_eq!(buf.get_pixel(0, 1).0[0], 0);
    }

    #[test]
    fn should_leave_too_small_images_untouched() {
        let original = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([7, 7, 7])));
        let mut img = original.clone();
        embed(&mut img, 0);
        assert_eq!(img, original);
    }

    #[test]
    fn should_verify_after_embedding_outside_the_region() {
        let mut img = DynamicImage::ImageRgb8(prepare_rgb_image(250, 250));
        let checksum = compute(&img, CHECKSUM_REGION).unwrap();
        embed(&mut img, checksum);

        assert!(verify(&img, CHECKSUM_REGION).unwrap());
    }
}
