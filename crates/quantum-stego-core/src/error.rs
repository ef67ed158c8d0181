use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuantumStegoError {
    /// Represents a transformation that produced invalid or non-numeric data, for example NaN values
    #[error("Quantum state error: {0}")]
    StateError(String),

    /// Represents a failure inside a φ-modulated computation
    #[error("φ-modulation error: {0}")]
    ModulationError(String),

    /// Represents a depleted entropy pool, it has to be replenished explicitly
    #[error("Entropy pool exhausted: requested {requested} values, {available} available")]
    EntropyExhausted { requested: usize, available: usize },

    /// Represents an unreadable checksum region or a degenerate region clamp
    #[error("Checksum error: {0}")]
    ChecksumError(String),

    /// Represents a temporal pattern analyzer that refused the carrier
    #[error("Temporal pattern validation failed")]
    TemporalPatternRejected,

    /// Represents a content validator that refused the carrier
    #[error("Content failed validation")]
    ValidationRejected,

    /// Represents a failure of the watermark or the cosmetic encryption layer
    #[error("Security error: {0}")]
    SecurityError(String),

    /// Represents a payload that exceeds the fixed read window
    #[error("Payload of {0} bytes exceeds the maximum of {1} bytes")]
    PayloadTooLong(usize, usize),

    /// Represents a tag character that has no single byte representation
    #[error("Tag character {0:?} cannot be represented as a single byte")]
    InvalidTagCharacter(char),

    /// Represents an explicit position outside of the carrier image
    #[error("Position ({0}, {1}) is outside of the {2}x{3} image")]
    PositionOutOfBounds(u32, u32, u32, u32),

    /// Represents an explicit position list that addresses one pixel twice
    #[error("Position ({0}, {1}) is listed more than once")]
    DuplicatePosition(u32, u32),

    /// Represents a carrier whose pixel layout does not fit the selected mode
    #[error("Pixel format is not supported by mode {0}")]
    UnsupportedPixelFormat(String),

    /// Represents an unparsable mode name
    #[error("Unknown mode: {0}")]
    InvalidMode(String),

    /// Represents an invalid carrier image media. For example, a broken PNG file
    #[error("Image media is invalid")]
    InvalidImageMedia(#[from] image::ImageError),

    /// Represents a failure when encoding an image file.
    #[error("Image encoding error")]
    ImageEncodingError,

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Represents a broken configuration file
    #[error("Config error")]
    ConfigError(#[from] toml::de::Error),

    #[error("No carrier media set")]
    CarrierNotSet,

    #[error("No target file set")]
    TargetNotSet,

    #[error("API Error: Missing file type")]
    MissingFileType,
}

impl QuantumStegoError {
    /// numeric code for integrating with systems that only understand integers
    pub fn code(&self) -> u16 {
        match self {
            Self::StateError(_) => 1001,
            Self::ModulationError(_) => 1002,
            Self::EntropyExhausted { .. } => 1003,
            Self::ChecksumError(_) => 1004,
            Self::TemporalPatternRejected => 1005,
            Self::ValidationRejected => 1006,
            Self::SecurityError(_) => 1007,
            _ => 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_error_codes() {
        assert_eq!(QuantumStegoError::StateError("nan".into()).code(), 1001);
        assert_eq!(
            QuantumStegoError::EntropyExhausted {
                requested: 2,
                available: 1
            }
            .code(),
            1003
        );
        assert_eq!(QuantumStegoError::ValidationRejected.code(), 1006);
        assert_eq!(QuantumStegoError::CarrierNotSet.code(), 1000);
    }

    #[test]
    fn should_render_entropy_message() {
        let e = QuantumStegoError::EntropyExhausted {
            requested: 4,
            available: 1,
        };
        assert_eq!(
            e.to_string(),
            "Entropy pool exhausted: requested 4 values, 1 available"
        );
    }
}
