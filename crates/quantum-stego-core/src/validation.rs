//! External validation hooks consulted by [`crate::QuantumSteganography`].
//!
//! Both hooks default to [`AcceptAll`]. Plain closures work as hooks as well.

use std::path::Path;

use crate::quantum::Field;

/// gate before encoding, `false` aborts without writing anything
pub trait ContentValidator {
    fn validate_content(&self, path: &Path) -> bool;
}

/// observes carriers on encode and gates them on decode
pub trait TemporalAnalyzer {
    fn analyze_pattern(&mut self, _field: &Field) {}

    fn validate_pattern(&self, field: &Field) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ContentValidator for AcceptAll {
    fn validate_content(&self, _path: &Path) -> bool {
        true
    }
}

impl TemporalAnalyzer for AcceptAll {
    fn validate_pattern(&self, _field: &Field) -> bool {
        true
    }
}

impl<F> ContentValidator for F
where
    F: Fn(&Path) -> bool,
{
    fn validate_content(&self, path: &Path) -> bool {
        self(path)
    }
}

impl<F> TemporalAnalyzer for F
where
    F: Fn(&Field) -> bool,
{
    fn validate_pattern(&self, field: &Field) -> bool {
        self(field)
    }
}
