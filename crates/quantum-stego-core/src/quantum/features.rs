use std::collections::VecDeque;
use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::QuantumStegoError;
use crate::quantum::field::Field;
use crate::result::Result;
use crate::PHI;

/// values added by one [`QuantumFeatures::replenish`] call
pub const REPLENISH_BATCH: usize = 1024;

/// Entropy pool and φ-modulated phase transforms.
///
/// The pool never grows on access. A request larger than what is left fails with
/// [`QuantumStegoError::EntropyExhausted`]; callers replenish or reset explicitly.
pub struct QuantumFeatures {
    entropy_pool: VecDeque<f64>,
    initial_size: usize,
    capacity: usize,
    rng: StdRng,
    last_state: Option<Field>,
}

impl Default for QuantumFeatures {
    fn default() -> Self {
        Self::new(REPLENISH_BATCH, 8 * REPLENISH_BATCH)
    }
}

impl QuantumFeatures {
    pub fn new(pool_size: usize, capacity: usize) -> Self {
        Self::with_rng(StdRng::from_entropy(), pool_size, capacity)
    }

    /// reproducible pool, for tests and benchmarks
    pub fn with_seed(seed: u64, pool_size: usize, capacity: usize) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), pool_size, capacity)
    }

    fn with_rng(rng: StdRng, pool_size: usize, capacity: usize) -> Self {
        let capacity = capacity.max(pool_size);
        let mut features = Self {
            entropy_pool: VecDeque::with_capacity(capacity),
            initial_size: pool_size,
            capacity,
            rng,
            last_state: None,
        };
        features.fill(pool_size);
        features
    }

    fn fill(&mut self, count: usize) -> usize {
        let room = self.capacity - self.entropy_pool.len();
        let count = count.min(room);
        for _ in 0..count {
            let value = (self.rng.gen::<f64>() * PHI).rem_euclid(1.0);
            self.entropy_pool.push_back(value);
        }
        count
    }

    pub fn entropy_available(&self) -> usize {
        self.entropy_pool.len()
    }

    /// takes `size` values off the front of the pool
    pub fn take_entropy(&mut self, size: usize) -> Result<Vec<f64>> {
        if size > self.entropy_pool.len() {
            return Err(QuantumStegoError::EntropyExhausted {
                requested: size,
                available: self.entropy_pool.len(),
            });
        }

        Ok(self.entropy_pool.drain(..size).collect())
    }

    /// adds one batch, bounded by the capacity, returns how many values were added
    pub fn replenish(&mut self) -> usize {
        self.fill(REPLENISH_BATCH)
    }

    /// drops the pool and refills it to its initial size
    pub fn reset(&mut self) {
        self.entropy_pool.clear();
        self.fill(self.initial_size);
    }

    /// `x * cos(2π φ x)` for every value, the real part of `x * exp(2πiφx)`
    pub fn apply_quantum_transform(&mut self, field: &Field) -> Result<Field> {
        if !field.is_finite() {
            return Err(QuantumStegoError::StateError(
                "field contains non-finite values".to_string(),
            ));
        }
        let transformed = field.map(|x| x * (TAU * PHI * x).cos());
        if !transformed.is_finite() {
            return Err(QuantumStegoError::ModulationError(
                "phase transform overflowed".to_string(),
            ));
        }
        self.last_state = Some(transformed.clone());

        Ok(transformed)
    }

    /// `num_states` copies of `field`, each rotated by a phase taken from the pool
    pub fn superposition_states(&mut self, field: &Field, num_states: usize) -> Result<Vec<Field>> {
        let phases = self.take_entropy(num_states)?;
        let states: Vec<Field> = phases
            .into_iter()
            .map(|phase| {
                let factor = (TAU * phase).cos();
                field.map(|x| x * factor)
            })
            .collect();

        if states.iter().any(|s| !s.is_finite()) {
            return Err(QuantumStegoError::StateError(
                "superposition produced non-finite values".to_string(),
            ));
        }

        Ok(states)
    }

    pub fn last_state(&self) -> Option<&Field> {
        self.last_state.as_ref()
    }
}
