//! # Quantum Stego Core API
//!
//! Hides a short identifying tag in the least significant bits of an image and
//! recovers it later. Three placement modes are available via [`SteganoMode`]:
//! - ψ writes into the alpha channel LSB in raster order
//! - φ writes into the red channel LSB along a position list or in raster order
//! - τ writes into red bit 1 and mirrors every bit into green bit 0
//!
//! [`QuantumSteganography`] works on files. It tags an image with the hash of a
//! file type and unveils the file type again by looking the decoded tag up in a catalog.
//!
//! # Usage Examples
//!
//! ## Tag an image with a file type
//!
//! ```rust
//! use image::{DynamicImage, RgbImage};
//! use tempfile::tempdir;
//!
//! let temp_dir = tempdir().expect("Failed to create temporary directory");
//! let carrier = temp_dir.path().join("carrier.png");
//! DynamicImage::ImageRgb8(RgbImage::new(64, 64))
//!     .save(&carrier)
//!     .expect("Failed to write the carrier");
//!
//! quantum_stego_core::api::hide::prepare()
//!     .with_image(&carrier)
//!     .with_file_type("text/plain")
//!     .with_output(temp_dir.path().join("tagged.png"))
//!     .execute()
//!     .expect("Failed to hide the tag");
//!
//! let file_type = quantum_stego_core::api::unveil::prepare()
//!     .with_secret_image(temp_dir.path().join("tagged.png"))
//!     .execute()
//!     .expect("Failed to unveil the tag");
//! assert_eq!(file_type.as_deref(), Some("text/plain"));
//! ```
//!
//! ## Work on an image in memory
//!
//! ```rust
//! use image::{DynamicImage, RgbImage};
//! use quantum_stego_core::{generate_pq_hash, SteganoMode};
//!
//! let mut image = DynamicImage::ImageRgb8(RgbImage::new(100, 100));
//! let tag = generate_pq_hash("image/png");
//!
//! assert!(SteganoMode::Tau.encode(&mut image, &tag, None));
//! assert_eq!(SteganoMode::Tau.decode(&image), tag);
//! ```

#![warn(clippy::redundant_else)]

pub mod api;
pub mod bit_packer;
pub mod commands;
pub mod error;
pub mod events;
pub mod hash;
pub mod media;
pub mod options;
pub mod quantum;
pub mod result;
pub mod validation;

use std::path::Path;

use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat};
use log::{debug, info, warn};
use serde::Serialize;

pub use crate::bit_packer::BitIterator;
pub use crate::error::QuantumStegoError;
pub use crate::events::{EventSink, LogSink, MemorySink, OperationEvent, Outcome};
pub use crate::hash::{generate_pq_hash, PqHasher};
pub use crate::media::mode::{select_mode, SteganoMode};
pub use crate::options::StegoOptions;
pub use crate::quantum::{Field, QuantumFeatures, QuantumMetadata, QuantumSecurity};
pub use crate::result::Result;
pub use crate::validation::{AcceptAll, ContentValidator, TemporalAnalyzer};

/// the golden ratio, the one modulation constant everything is derived from
pub const PHI: f64 = 1.618_033_988_749_895;

/// returned by [`QuantumSteganography::decode`] when no catalog entry matches
pub const UNKNOWN_FILE_TYPE: &str = "unknown";

const SUPERPOSITION_STATES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantumMetrics {
    pub mode: &'static str,
    pub phi_correlations: Vec<f64>,
    pub quantum_states: usize,
    pub creation_time: DateTime<Utc>,
    pub entropy_pool_size: usize,
}

/// File level orchestrator: validation hooks, quantum bookkeeping and the mode codec.
///
/// The mode is fixed at construction. The phase transform only feeds the state
/// history, the pixels that carry the tag are never perturbed by it.
pub struct QuantumSteganography {
    options: StegoOptions,
    mode: SteganoMode,
    features: QuantumFeatures,
    metadata: QuantumMetadata,
    security: QuantumSecurity,
    hasher: PqHasher,
    content_validator: Box<dyn ContentValidator>,
    temporal_analyzer: Box<dyn TemporalAnalyzer>,
    event_sink: Box<dyn EventSink>,
}

impl Default for QuantumSteganography {
    fn default() -> Self {
        Self::with_options(StegoOptions::default())
    }
}

impl QuantumSteganography {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: StegoOptions) -> Self {
        let mode = options
            .mode
            .unwrap_or_else(|| select_mode(options.chaos_intensity));
        debug!("{mode} selected for chaos intensity {}", options.chaos_intensity);

        Self {
            features: QuantumFeatures::new(
                options.entropy_pool_size,
                options.entropy_pool_capacity,
            ),
            metadata: QuantumMetadata::new(options.history_capacity),
            security: QuantumSecurity::new(options.security_log_capacity),
            options,
            mode,
            hasher: PqHasher::default(),
            content_validator: Box::new(AcceptAll),
            temporal_analyzer: Box::new(AcceptAll),
            event_sink: Box::new(LogSink),
        }
    }

    pub fn with_content_validator(mut self, validator: impl ContentValidator + 'static) -> Self {
        self.content_validator = Box::new(validator);
        self
    }

    pub fn with_temporal_analyzer(mut self, analyzer: impl TemporalAnalyzer + 'static) -> Self {
        self.temporal_analyzer = Box::new(analyzer);
        self
    }

    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.event_sink = Box::new(sink);
        self
    }

    /// seeds the entropy pool and the watermark noise, for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.features = QuantumFeatures::with_seed(
            seed,
            self.options.entropy_pool_size,
            self.options.entropy_pool_capacity,
        );
        self.security = QuantumSecurity::with_seed(seed, self.options.security_log_capacity);
        self
    }

    pub fn mode(&self) -> SteganoMode {
        self.mode
    }

    pub fn options(&self) -> &StegoOptions {
        &self.options
    }

    pub fn metadata(&self) -> &QuantumMetadata {
        &self.metadata
    }

    pub fn security(&self) -> &QuantumSecurity {
        &self.security
    }

    /// watermarking and scrambling, logged with `security_log_capacity` entries at most
    pub fn security_mut(&mut self) -> &mut QuantumSecurity {
        &mut self.security
    }

    /// Tags the image at `input_path` with `file_type` and writes it as PNG to `output_path`.
    /// Any failure, a rejection by the content validator included, is logged and gives `false`.
    pub fn encode(
        &mut self,
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        file_type: &str,
        ethical_check: bool,
    ) -> bool {
        self.try_encode(input_path, output_path, file_type, ethical_check)
            .is_ok()
    }

    pub fn try_encode(
        &mut self,
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        file_type: &str,
        ethical_check: bool,
    ) -> Result<()> {
        let result = self.encode_file(
            input_path.as_ref(),
            output_path.as_ref(),
            file_type,
            ethical_check,
        );
        self.report("encode", &result);
        result
    }

    fn encode_file(
        &mut self,
        input_path: &Path,
        output_path: &Path,
        file_type: &str,
        ethical_check: bool,
    ) -> Result<()> {
        if ethical_check && !self.content_validator.validate_content(input_path) {
            return Err(QuantumStegoError::ValidationRejected);
        }

        let mut image = image::open(input_path)?;
        self.encode_image(&mut image, file_type)?;
        image
            .save_with_format(output_path, ImageFormat::Png)
            .map_err(|e| match e {
                image::ImageError::IoError(source) => QuantumStegoError::WriteError { source },
                _ => QuantumStegoError::ImageEncodingError,
            })?;
        info!("{} tagged as {file_type} into {}", self.mode, output_path.display());

        Ok(())
    }

    /// tags an image in memory, the image is converted to the layout of the mode
    pub fn encode_image(&mut self, image: &mut DynamicImage, file_type: &str) -> Result<()> {
        let field = Field::from_image(image);
        if self.features.entropy_available() < SUPERPOSITION_STATES {
            self.features.replenish();
        }
        let transformed = self.features.apply_quantum_transform(&field)?;
        let states = self
            .features
            .superposition_states(&field, SUPERPOSITION_STATES)?;
        if let Some(state) = states.first() {
            self.metadata.record_state(state);
        }
        self.temporal_analyzer.analyze_pattern(&transformed);

        let tag = self.hasher.tag(file_type);
        let bits = self.mode.try_encode(image, &tag, None)?;
        debug!("{bits} bits of the {file_type} tag written");
        self.metadata.record_state(&transformed);

        Ok(())
    }

    /// Unveils the file type the image at `image_path` was tagged with.
    /// Failures and tags outside of the catalog give [`UNKNOWN_FILE_TYPE`].
    pub fn decode(&mut self, image_path: impl AsRef<Path>, validate_temporal: bool) -> String {
        match self.try_decode(image_path, validate_temporal) {
            Ok(Some(file_type)) => file_type,
            _ => UNKNOWN_FILE_TYPE.to_string(),
        }
    }

    /// `Ok(None)` when the decoded tag is not in the catalog
    pub fn try_decode(
        &mut self,
        image_path: impl AsRef<Path>,
        validate_temporal: bool,
    ) -> Result<Option<String>> {
        let result = image::open(image_path.as_ref())
            .map_err(QuantumStegoError::from)
            .and_then(|image| self.decode_image(&image, validate_temporal));
        self.report("decode", &result);
        result
    }

    pub fn decode_image(
        &mut self,
        image: &DynamicImage,
        validate_temporal: bool,
    ) -> Result<Option<String>> {
        let field = Field::from_image(image);
        if validate_temporal && !self.temporal_analyzer.validate_pattern(&field) {
            return Err(QuantumStegoError::TemporalPatternRejected);
        }

        let transformed = self.features.apply_quantum_transform(&field.negated())?;
        self.metadata.record_state(&transformed);

        let decoded = self.mode.try_decode(image, None)?;
        Ok(self.lookup(&decoded))
    }

    /// the catalog entry whose tag equals `tag`
    pub fn lookup(&self, tag: &str) -> Option<String> {
        self.options
            .file_types
            .iter()
            .find(|file_type| self.hasher.tag(file_type) == tag)
            .cloned()
    }

    pub fn quantum_metrics(&self) -> QuantumMetrics {
        QuantumMetrics {
            mode: self.mode.name(),
            phi_correlations: self
                .metadata
                .state_history()
                .map(|s| s.phi_correlation)
                .collect(),
            quantum_states: self.metadata.state_history().count(),
            creation_time: self.metadata.creation_time(),
            entropy_pool_size: self.features.entropy_available(),
        }
    }

    fn report<T>(&mut self, operation: &'static str, result: &Result<T>) {
        let event = match result {
            Ok(_) => OperationEvent::new(operation, Outcome::Success),
            Err(
                e @ (QuantumStegoError::ValidationRejected
                | QuantumStegoError::TemporalPatternRejected),
            ) => {
                warn!("{operation} rejected: {e}");
                OperationEvent::new(operation, Outcome::Rejected).with_detail(e.to_string())
            }
            Err(e) => {
                warn!("{operation} failed with code {}: {e}", e.code());
                OperationEvent::new(operation, Outcome::Failure).with_detail(e.to_string())
            }
        };
        self.event_sink.record(event);
    }
}

#[cfg(test)]
mod e2e_tests {
    use super::*;
    use crate::test_utils::prepare_rgb_image;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn carrier(dir: &TempDir, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join("carrier.png");
        DynamicImage::ImageRgb8(prepare_rgb_image(width, height))
            .save(&path)
            .expect("carrier was not written");
        path
    }

    #[test]
    fn should_select_psi_by_default() {
        assert_eq!(QuantumSteganography::new().mode(), SteganoMode::Psi);
    }

    #[test]
    fn should_tag_and_unveil_a_file_type_in_every_mode() -> Result<()> {
        let dir = TempDir::new()?;
        let input = carrier(&dir, 100, 100);

        for mode in SteganoMode::ALL {
            let output = dir.path().join(format!("{}.png", mode.name()));
            let mut stego =
                QuantumSteganography::with_options(StegoOptions::default().with_mode(mode))
                    .with_seed(1);

            assert!(stego.encode(&input, &output, "text/plain", true), "{mode}");
            assert_eq!(stego.decode(&output, true), "text/plain", "{mode}");
        }

        Ok(())
    }

    #[test]
    fn should_not_write_anything_when_the_content_is_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let input = carrier(&dir, 20, 20);
        let output = dir.path().join("never.png");
        let sink = MemorySink::default();
        let mut stego = QuantumSteganography::new()
            .with_content_validator(|_: &Path| false)
            .with_event_sink(sink.clone());

        assert!(!stego.encode(&input, &output, "image/png", true));
        assert!(!output.exists());
        assert_eq!(sink.events()[0].outcome, Outcome::Rejected);

        // skipping the check lets it through
        assert!(stego.encode(&input, &output, "image/png", false));
        assert!(output.exists());

        Ok(())
    }

    #[test]
    fn should_report_unknown_when_the_temporal_pattern_is_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let input = carrier(&dir, 100, 100);
        let output = dir.path().join("tagged.png");
        let mut stego = QuantumSteganography::new().with_temporal_analyzer(|_: &Field| false);

        assert!(stego.encode(&input, &output, "video/mp4", true));
        assert_eq!(stego.decode(&output, true), UNKNOWN_FILE_TYPE);
        assert_eq!(stego.decode(&output, false), "video/mp4");
        assert!(matches!(
            stego.try_decode(&output, true),
            Err(QuantumStegoError::TemporalPatternRejected)
        ));

        Ok(())
    }

    #[test]
    fn should_report_unknown_for_untagged_and_missing_images() -> Result<()> {
        let dir = TempDir::new()?;
        let input = carrier(&dir, 30, 30);
        let mut stego =
            QuantumSteganography::with_options(StegoOptions::default().with_mode(SteganoMode::Tau));

        assert_eq!(stego.decode(&input, true), UNKNOWN_FILE_TYPE);
        assert_eq!(stego.decode(dir.path().join("missing.png"), true), UNKNOWN_FILE_TYPE);

        Ok(())
    }

    #[test]
    fn should_only_find_catalog_entries() -> Result<()> {
        let dir = TempDir::new()?;
        let input = carrier(&dir, 100, 100);
        let output = dir.path().join("tagged.png");
        let mut stego = QuantumSteganography::new();

        assert!(stego.encode(&input, &output, "application/pdf", true));
        assert_eq!(stego.try_decode(&output, true)?, None);

        Ok(())
    }

    #[test]
    fn should_track_quantum_metrics() -> Result<()> {
        let dir = TempDir::new()?;
        let input = carrier(&dir, 10, 10);
        let output = dir.path().join("tagged.png");
        let mut stego = QuantumSteganography::with_options(StegoOptions {
            entropy_pool_size: 2,
            entropy_pool_capacity: 4096,
            ..StegoOptions::default()
        });

        assert!(stego.encode(&input, &output, "image/png", true));
        let metrics = stego.quantum_metrics();
        assert_eq!(metrics.mode, "psi");
        assert_eq!(metrics.quantum_states, 2);
        assert_eq!(metrics.phi_correlations.len(), 2);
        assert_eq!(metrics.entropy_pool_size, 0);

        // the drained pool is replenished on the next encode
        assert!(stego.encode(&input, &output, "image/png", true));
        assert_eq!(stego.quantum_metrics().entropy_pool_size, 1022);

        Ok(())
    }

    #[test]
    fn should_bound_the_security_log_by_the_options() {
        let mut stego = QuantumSteganography::with_options(StegoOptions {
            security_log_capacity: 2,
            ..StegoOptions::default()
        })
        .with_seed(3);
        let field = Field::from_values((0..64).map(|i| i as f64).collect());

        for _ in 0..3 {
            stego.security_mut().verify_watermark(&field);
        }
        assert_eq!(stego.security().security_metrics().total_operations, 2);
    }

    #[test]
    fn should_leave_the_carrier_pixels_to_the_codec() {
        let mut stego =
            QuantumSteganography::with_options(StegoOptions::default().with_mode(SteganoMode::Phi));
        let original = DynamicImage::ImageRgb8(prepare_rgb_image(100, 100));
        let mut image = original.clone();
        stego.encode_image(&mut image, "text/plain").unwrap();

        let (given, expected) = (image.to_rgb8(), original.to_rgb8());
        for (g, e) in given.pixels().zip(expected.pixels()) {
            assert_eq!(g.0[0] & !1, e.0[0] & !1);
            assert_eq!(g.0[1..], e.0[1..]);
        }
    }
}
