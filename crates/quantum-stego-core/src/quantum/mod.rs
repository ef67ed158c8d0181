//! Quantum-inspired bookkeeping around the codec: entropy pool and phase
//! transforms, state history, watermark and cosmetic encryption.

pub mod features;
pub mod field;
pub mod metadata;
pub mod security;

pub use features::QuantumFeatures;
pub use field::Field;
pub use metadata::{PhiModulationStats, QuantumMetadata, StateRecord, StateTransition};
pub use security::{EncryptionKey, QuantumSecurity, SecurityMetrics};
