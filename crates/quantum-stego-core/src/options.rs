use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::media::checksum::{Region, CHECKSUM_REGION};
use crate::media::mode::{SteganoMode, CHAOS_INTENSITY};
use crate::Result;

/// Options of [`crate::QuantumSteganography`].
///
/// Every field has a default, so a config file only needs to name what it changes:
///
/// ```toml
/// chaos_intensity = 0.2
/// file_types = ["image/png", "application/pdf"]
///
/// [checksum_region]
/// x1 = 0
/// y1 = 0
/// x2 = 64
/// y2 = 64
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StegoOptions {
    /// folded through φ to pick the mode, see [`crate::media::mode::select_mode`]
    pub chaos_intensity: f64,
    /// overrides the mode derived from `chaos_intensity`
    pub mode: Option<SteganoMode>,
    pub checksum_region: Region,
    pub entropy_pool_size: usize,
    pub entropy_pool_capacity: usize,
    pub history_capacity: usize,
    pub security_log_capacity: usize,
    /// the catalog a decoded tag is looked up in
    pub file_types: Vec<String>,
    pub ethical_check: bool,
    pub validate_temporal: bool,
}

impl Default for StegoOptions {
    fn default() -> Self {
        Self {
            chaos_intensity: CHAOS_INTENSITY,
            mode: None,
            checksum_region: CHECKSUM_REGION,
            entropy_pool_size: 1024,
            entropy_pool_capacity: 8192,
            history_capacity: 256,
            security_log_capacity: 256,
            file_types: ["image/png", "text/plain", "audio/mpeg", "video/mp4"]
                .map(String::from)
                .to_vec(),
            ethical_check: true,
            validate_temporal: true,
        }
    }
}

impl StegoOptions {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_mode(mut self, mode: SteganoMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_chaos_intensity(mut self, chaos_intensity: f64) -> Self {
        self.chaos_intensity = chaos_intensity;
        self
    }
}
