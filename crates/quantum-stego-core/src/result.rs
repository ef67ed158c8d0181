use crate::error::QuantumStegoError;

pub type Result<T> = std::result::Result<T, QuantumStegoError>;
