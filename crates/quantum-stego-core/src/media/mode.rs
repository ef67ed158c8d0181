use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use image::{DynamicImage, GenericImageView};
use log::warn;
use serde::Deserialize;

use crate::bit_packer::{bytes_to_tag, tag_to_bytes, MAX_PAYLOAD_BITS};
use crate::error::QuantumStegoError;
use crate::media::lsb;
use crate::media::placement::{
    Channel, MultiChannelSplit, Placement, PlacementStrategy, PositionList, SequentialRaster,
};
use crate::result::Result;
use crate::PHI;

/// The default chaos intensity the mode is derived from
pub const CHAOS_INTENSITY: f64 = 0.6;

/// Bit placement modes, each one owns a placement strategy and a pixel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum SteganoMode {
    /// ψ, superposition: alpha channel LSB in raster order, needs RGBA
    Psi,
    /// φ, golden ratio: red channel LSB along an explicit position list or raster order
    Phi,
    /// τ, technical: red bit 1 mirrored into green bit 0, raster order
    Tau,
}

/// folds the chaos intensity through φ and picks a mode by range, same input same mode
pub fn select_mode(chaos_intensity: f64) -> SteganoMode {
    let chaos_factor = (chaos_intensity * PHI).rem_euclid(1.0);

    if chaos_factor > 0.8 {
        SteganoMode::Psi
    } else if chaos_factor > 0.5 {
        SteganoMode::Phi
    } else {
        SteganoMode::Tau
    }
}

impl SteganoMode {
    pub const ALL: [SteganoMode; 3] = [SteganoMode::Psi, SteganoMode::Phi, SteganoMode::Tau];

    pub fn symbol(&self) -> char {
        match self {
            SteganoMode::Psi => 'ψ',
            SteganoMode::Phi => 'φ',
            SteganoMode::Tau => 'τ',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SteganoMode::Psi => "psi",
            SteganoMode::Phi => "phi",
            SteganoMode::Tau => "tau",
        }
    }

    /// the placement strategy of this mode, `positions` only matter for φ
    pub fn strategy(&self, positions: Option<&[(u32, u32)]>) -> PlacementStrategy {
        match self {
            SteganoMode::Psi => SequentialRaster {
                channel: Channel::Alpha,
                bit: 0,
            }
            .into(),
            SteganoMode::Phi => PositionList {
                positions: positions.map(<[_]>::to_vec).unwrap_or_default(),
                channel: Channel::Red,
            }
            .into(),
            SteganoMode::Tau => MultiChannelSplit::default().into(),
        }
    }

    /// Hides `tag` in `image`, converting the image to the layout this mode needs.
    /// Never fails loudly: any problem is logged and reported as `false`.
    pub fn encode(
        &self,
        image: &mut DynamicImage,
        tag: &str,
        positions: Option<&[(u32, u32)]>,
    ) -> bool {
        match self.try_encode(image, tag, positions) {
            Ok(_) => true,
            Err(e) => {
                warn!("{self} encoding failed: {e}");
                false
            }
        }
    }

    /// like [`SteganoMode::encode`] but keeps the cause, returns the number of bits written
    pub fn try_encode(
        &self,
        image: &mut DynamicImage,
        tag: &str,
        positions: Option<&[(u32, u32)]>,
    ) -> Result<usize> {
        let payload = tag_to_bytes(tag)?;
        let (width, height) = image.dimensions();
        let map = self
            .strategy(positions)
            .placement_map(width, height, payload.len() * 8);
        // bounds first, so that a bad position list leaves the image alone
        map.validate(width, height, u8::MAX)?;

        self.prepare(image);
        match image {
            DynamicImage::ImageRgba8(carrier) => lsb::hide(carrier, &map, &payload),
            DynamicImage::ImageRgb8(carrier) => lsb::hide(carrier, &map, &payload),
            _ => Err(QuantumStegoError::UnsupportedPixelFormat(self.to_string())),
        }
    }

    /// Reads the fixed 512 bit window of this mode in raster order.
    /// Returns an empty string if the image cannot be read with this mode.
    pub fn decode(&self, image: &DynamicImage) -> String {
        self.try_decode(image, None).unwrap_or_else(|e| {
            warn!("{self} decoding failed: {e}");
            String::new()
        })
    }

    /// reads along an explicit position list, the counterpart of a φ encode with positions
    pub fn decode_at(&self, image: &DynamicImage, positions: &[(u32, u32)]) -> String {
        self.try_decode(image, Some(positions)).unwrap_or_else(|e| {
            warn!("{self} decoding failed: {e}");
            String::new()
        })
    }

    pub fn try_decode(
        &self,
        image: &DynamicImage,
        positions: Option<&[(u32, u32)]>,
    ) -> Result<String> {
        let (width, height) = image.dimensions();
        let map = self
            .strategy(positions)
            .placement_map(width, height, MAX_PAYLOAD_BITS);

        let bytes = match (self, image) {
            (SteganoMode::Psi, DynamicImage::ImageRgba8(carrier)) => lsb::unveil(carrier, &map)?,
            (SteganoMode::Psi, _) => {
                return Err(QuantumStegoError::UnsupportedPixelFormat(self.to_string()))
            }
            (_, DynamicImage::ImageRgb8(carrier)) => lsb::unveil(carrier, &map)?,
            (_, DynamicImage::ImageRgba8(carrier)) => lsb::unveil(carrier, &map)?,
            (_, other) => lsb::unveil(&other.to_rgb8(), &map)?,
        };

        Ok(bytes_to_tag(&bytes))
    }

    fn prepare(&self, image: &mut DynamicImage) {
        match self {
            SteganoMode::Psi if !matches!(image, DynamicImage::ImageRgba8(_)) => {
                *image = DynamicImage::ImageRgba8(image.to_rgba8());
            }
            SteganoMode::Phi | SteganoMode::Tau
                if !matches!(
                    image,
                    DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)
                ) =>
            {
                *image = DynamicImage::ImageRgb8(image.to_rgb8());
            }
            _ => {}
        }
    }
}

impl Display for SteganoMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol(), self.name())
    }
}

impl FromStr for SteganoMode {
    type Err = QuantumStegoError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "psi" | "ψ" | "superposition" => Ok(SteganoMode::Psi),
            "phi" | "φ" | "golden" => Ok(SteganoMode::Phi),
            "tau" | "τ" | "technical" => Ok(SteganoMode::Tau),
            other => Err(QuantumStegoError::InvalidMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for SteganoMode {
    type Error = QuantumStegoError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{prepare_rgb_image, TAG};

    #[test]
    fn should_select_psi_for_the_default_intensity() {
        assert_eq!(select_mode(CHAOS_INTENSITY), SteganoMode::Psi);
    }

    #[test]
    fn should_select_modes_by_range() {
        // 0.4 * φ ≈ 0.647
        assert_eq!(select_mode(0.4), SteganoMode::Phi);
        // 0.2 * φ ≈ 0.324
        assert_eq!(select_mode(0.2), SteganoMode::Tau);
        assert_eq!(select_mode(0.0), SteganoMode::Tau);
    }

    #[test]
    fn should_parse_names_and_symbols() {
        assert_eq!("ψ".parse::<SteganoMode>().unwrap(), SteganoMode::Psi);
        assert_eq!("PHI".parse::<SteganoMode>().unwrap(), SteganoMode::Phi);
        assert_eq!("tau".parse::<SteganoMode>().unwrap(), SteganoMode::Tau);
        assert!("omega".parse::<SteganoMode>().is_err());
    }

    #[test]
    fn should_round_trip_every_mode() {
        for mode in SteganoMode::ALL {
            let mut img = DynamicImage::ImageRgb8(prepare_rgb_image(100, 100));
            assert!(mode.encode(&mut img, TAG, None), "{mode} encode failed");
            assert_eq!(mode.decode(&img), TAG, "{mode} decode mismatched");
        }
    }

    #[test]
    fn psi_should_promote_the_carrier_to_rgba() {
        let mut img = DynamicImage::ImageRgb8(prepare_rgb_image(30, 30));
        assert!(SteganoMode::Psi.encode(&mut img, "tag", None));
        assert!(matches!(img, DynamicImage::ImageRgba8(_)));
    }

    #[test]
    fn psi_should_not_decode_rgb_images() {
        let img = DynamicImage::ImageRgb8(prepare_rgb_image(30, 30));
        assert_eq!(SteganoMode::Psi.decode(&img), "");
    }

    #[test]
    fn phi_should_round_trip_along_explicit_positions() {
        let positions: Vec<(u32, u32)> = (0..24).map(|i| (29 - i % 30, i / 2)).collect();
        let mut img = DynamicImage::ImageRgb8(prepare_rgb_image(30, 30));

        assert!(SteganoMode::Phi.encode(&mut img, "abc", Some(&positions)));
        assert_eq!(SteganoMode::Phi.decode_at(&img, &positions), "abc");
    }

    #[test]
    fn phi_should_fail_for_positions_outside_the_image() {
        let original = DynamicImage::ImageRgb8(prepare_rgb_image(10, 10));
        let mut img = original.clone();

        assert!(!SteganoMode::Phi.encode(&mut img, "a", Some(&[(0, 0), (10, 0)])));
        assert_eq!(img, original);
    }

    #[test]
    fn should_refuse_tags_that_do_not_fit_one_byte_per_char() {
        let mut img = DynamicImage::ImageRgb8(prepare_rgb_image(30, 30));
        assert!(!SteganoMode::Tau.encode(&mut img, "τ", None));
    }

    #[test]
    fn wrong_mode_decode_should_still_return_a_string() {
        let mut img = DynamicImage::ImageRgb8(prepare_rgb_image(100, 100));
        assert!(SteganoMode::Tau.encode(&mut img, TAG, None));

        let decoded = SteganoMode::Phi.decode(&img);
        assert_eq!(decoded.chars().count(), 64);
    }
}
