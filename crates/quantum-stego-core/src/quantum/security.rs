//! Cosmetic watermark and phase scrambling over [`Field`]s.
//!
//! Nothing in here is cryptographically meaningful. The "encryption" is a lossy
//! floating point perturbation keyed by a hash, the token only detects changes of the sum.

use std::collections::VecDeque;
use std::f64::consts::TAU;
use std::fmt::{self, Debug, Formatter};

use chrono::{DateTime, Utc};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use sha3::{Digest, Sha3_256};

use crate::error::QuantumStegoError;
use crate::quantum::field::{correlation, std_dev, Field};
use crate::result::Result;
use crate::PHI;

pub const NOISE_LEN: usize = 1024;
const WATERMARK_GAIN: f64 = 0.1;
const WATERMARK_THRESHOLD: f64 = 0.1;
const TOKEN_PREFIX_LEN: usize = 16;

/// key for [`QuantumSecurity::apply_encryption`], never printed in clear
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey(String);

impl Debug for EncryptionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptionKey({})", "*".repeat(self.0.len()))
    }
}

impl From<&str> for EncryptionKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for EncryptionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl AsRef<str> for EncryptionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum SecurityOperation {
    WatermarkApplied {
        data_shape: Vec<usize>,
        watermark_strength: f64,
    },
    WatermarkVerified {
        correlation: f64,
        result: bool,
    },
    EncryptionApplied {
        data_shape: Vec<usize>,
        token_prefix: String,
    },
    EncryptionVerified {
        result: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub operation: SecurityOperation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityMetrics {
    pub total_operations: usize,
    pub watermarks_applied: usize,
    pub watermarks_verified: usize,
    pub encryptions_applied: usize,
    pub encryptions_verified: usize,
    pub last_operation: Option<SecurityEvent>,
    pub noise_entropy: f64,
}

pub struct QuantumSecurity {
    noise: Vec<f64>,
    log: VecDeque<SecurityEvent>,
    log_capacity: usize,
}

impl Default for QuantumSecurity {
    fn default() -> Self {
        Self::new(256)
    }
}

impl QuantumSecurity {
    pub fn new(log_capacity: usize) -> Self {
        Self::with_rng(StdRng::from_entropy(), log_capacity)
    }

    pub fn with_seed(seed: u64, log_capacity: usize) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), log_capacity)
    }

    fn with_rng(mut rng: StdRng, log_capacity: usize) -> Self {
        let noise = (0..NOISE_LEN)
            .map(|_| (TAU * PHI * rng.gen::<f64>()).cos())
            .collect();
        let log_capacity = log_capacity.max(1);
        Self {
            noise,
            log: VecDeque::with_capacity(log_capacity),
            log_capacity,
        }
    }

    pub fn noise(&self) -> &[f64] {
        &self.noise
    }

    /// watermark keyed by the current time
    pub fn apply_watermark(&mut self, field: &Field) -> Result<Field> {
        let now = Utc::now().timestamp_millis() as f64 / 1000.0;
        self.apply_watermark_at(field, now)
    }

    /// adds `0.1 * sin(φ t) * noise`, the noise repeated along the flattened field
    pub fn apply_watermark_at(&mut self, field: &Field, timestamp: f64) -> Result<Field> {
        let amplitude = (PHI * timestamp).sin();
        if !amplitude.is_finite() || !field.is_finite() {
            return Err(QuantumStegoError::SecurityError(
                "cannot watermark non-finite data".to_string(),
            ));
        }

        let values = field
            .values()
            .iter()
            .enumerate()
            .map(|(i, v)| v + WATERMARK_GAIN * amplitude * self.noise[i % NOISE_LEN])
            .collect();
        let watermarked = Field::new(field.shape().to_vec(), values)?;

        let strength =
            self.noise.iter().map(|n| (amplitude * n).abs()).sum::<f64>() / NOISE_LEN as f64;
        self.log_event(SecurityOperation::WatermarkApplied {
            data_shape: field.shape().to_vec(),
            watermark_strength: strength,
        });

        Ok(watermarked)
    }

    /// true if the data correlates with the tiled noise beyond 0.1 in either direction
    pub fn verify_watermark(&mut self, field: &Field) -> bool {
        let tiled: Vec<f64> = self.noise.iter().copied().cycle().take(field.len()).collect();
        let r = correlation(field.values(), &tiled);
        let result = r.abs() > WATERMARK_THRESHOLD;

        self.log_event(SecurityOperation::WatermarkVerified {
            correlation: r,
            result,
        });
        result
    }

    /// scrambles every value by `cos(2π q)`, `q` drawn from an rng seeded with the key.
    /// Returns the scrambled field with its verification token.
    pub fn apply_encryption(
        &mut self,
        field: &Field,
        key: &EncryptionKey,
    ) -> Result<(Field, String)> {
        if !field.is_finite() {
            return Err(QuantumStegoError::SecurityError(
                "cannot encrypt non-finite data".to_string(),
            ));
        }

        let digest = Sha3_256::new()
            .chain_update(key.as_ref())
            .chain_update(PHI.to_string())
            .finalize();
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&digest);
        let mut rng = StdRng::from_seed(seed);
        let encrypted = field.map(|v| v * (TAU * rng.gen::<f64>()).cos());
        let token = verification_token(&encrypted);

        debug!("encrypted a field of shape {:?}", field.shape());
        self.log_event(SecurityOperation::EncryptionApplied {
            data_shape: field.shape().to_vec(),
            token_prefix: token.chars().take(TOKEN_PREFIX_LEN).collect(),
        });

        Ok((encrypted, token))
    }

    pub fn verify_encryption(&mut self, field: &Field, token: &str) -> bool {
        let result = verification_token(field) == token;
        self.log_event(SecurityOperation::EncryptionVerified { result });
        result
    }

    pub fn security_log(&self) -> impl Iterator<Item = &SecurityEvent> {
        self.log.iter()
    }

    pub fn security_metrics(&self) -> SecurityMetrics {
        let count = |f: fn(&SecurityOperation) -> bool| {
            self.log.iter().filter(|e| f(&e.operation)).count()
        };

        SecurityMetrics {
            total_operations: self.log.len(),
            watermarks_applied: count(|o| matches!(o, SecurityOperation::WatermarkApplied { .. })),
            watermarks_verified: count(|o| {
                matches!(o, SecurityOperation::WatermarkVerified { .. })
            }),
            encryptions_applied: count(|o| {
                matches!(o, SecurityOperation::EncryptionApplied { .. })
            }),
            encryptions_verified: count(|o| {
                matches!(o, SecurityOperation::EncryptionVerified { .. })
            }),
            last_operation: self.log.back().cloned(),
            noise_entropy: std_dev(&self.noise),
        }
    }

    pub fn clear_security_log(&mut self) {
        self.log.clear();
    }

    fn log_event(&mut self, operation: SecurityOperation) {
        while self.log.len() >= self.log_capacity {
            self.log.pop_front();
        }
        self.log.push_back(SecurityEvent {
            timestamp: Utc::now(),
            operation,
        });
    }
}

fn verification_token(field: &Field) -> String {
    Sha3_256::new()
        .chain_update(field.sum().to_string())
        .chain_update(PHI.to_string())
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
