use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha3::{Digest, Sha3_512};

use crate::quantum::field::{correlation, std_dev, Field};
use crate::PHI;

const SHORT_HASH_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateRecord {
    pub timestamp: DateTime<Utc>,
    /// SHA3-512 hex digest of the raw state values
    pub state_hash: String,
    pub phi_correlation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Stable,
    Progressive,
    Regressive,
}

impl TransitionKind {
    /// lexicographic comparison of the two state hashes
    pub fn classify(from_hash: &str, to_hash: &str) -> Self {
        match from_hash.cmp(to_hash) {
            std::cmp::Ordering::Equal => Self::Stable,
            std::cmp::Ordering::Less => Self::Progressive,
            std::cmp::Ordering::Greater => Self::Regressive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateTransition {
    pub timestamp: DateTime<Utc>,
    pub from_state: String,
    pub to_state: String,
    pub kind: TransitionKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PhiModulationStats {
    pub mean: f64,
    pub std: f64,
    pub max: f64,
    pub min: f64,
}

/// Bounded history of recorded states, their transitions and φ correlations.
#[derive(Debug)]
pub struct QuantumMetadata {
    creation_time: DateTime<Utc>,
    capacity: usize,
    states: VecDeque<StateRecord>,
    transitions: VecDeque<StateTransition>,
    phi_history: VecDeque<f64>,
}

impl Default for QuantumMetadata {
    fn default() -> Self {
        Self::new(256)
    }
}

impl QuantumMetadata {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            creation_time: Utc::now(),
            capacity,
            states: VecDeque::with_capacity(capacity),
            transitions: VecDeque::with_capacity(capacity),
            phi_history: VecDeque::with_capacity(capacity),
        }
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    /// records `state`, and a transition from the previously recorded one if any
    pub fn record_state(&mut self, state: &Field) -> &StateRecord {
        let record = StateRecord {
            timestamp: Utc::now(),
            state_hash: hash_state(state),
            phi_correlation: phi_correlation(state),
        };

        if let Some(previous) = self.states.back() {
            let transition = StateTransition {
                timestamp: record.timestamp,
                from_state: short_hash(&previous.state_hash),
                to_state: short_hash(&record.state_hash),
                kind: TransitionKind::classify(&previous.state_hash, &record.state_hash),
            };
            push_bounded(&mut self.transitions, transition, self.capacity);
        }
        push_bounded(&mut self.phi_history, record.phi_correlation, self.capacity);
        push_bounded(&mut self.states, record, self.capacity);

        // just pushed
        &self.states[self.states.len() - 1]
    }

    pub fn state_history(&self) -> impl Iterator<Item = &StateRecord> {
        self.states.iter()
    }

    pub fn transition_history(&self) -> impl Iterator<Item = &StateTransition> {
        self.transitions.iter()
    }

    pub fn phi_modulation_stats(&self) -> PhiModulationStats {
        if self.phi_history.is_empty() {
            return PhiModulationStats::default();
        }
        let history: Vec<f64> = self.phi_history.iter().copied().collect();

        PhiModulationStats {
            mean: history.iter().sum::<f64>() / history.len() as f64,
            std: std_dev(&history),
            max: history.iter().copied().fold(f64::MIN, f64::max),
            min: history.iter().copied().fold(f64::MAX, f64::min),
        }
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.transitions.clear();
        self.phi_history.clear();
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, item: T, capacity: usize) {
    while queue.len() >= capacity {
        queue.pop_front();
    }
    queue.push_back(item);
}

fn short_hash(hash: &str) -> String {
    hash.chars().take(SHORT_HASH_LEN).collect()
}

pub fn hash_state(state: &Field) -> String {
    Sha3_512::digest(state.to_le_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// correlation of the flattened state with the Weyl sequence `frac((i + 1) φ)`
pub fn phi_correlation(state: &Field) -> f64 {
    let reference: Vec<f64> = (1..=state.len())
        .map(|i| (i as f64 * PHI).rem_euclid(1.0))
        .collect();
    correlation(state.values(), &reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_hash_states_deterministically() {
        let a = Field::from_values(vec![1.0, 2.0, 3.0]);
        assert_eq!(hash_state(&a), hash_state(&a.clone()));
        assert_eq!(hash_state(&a).len(), 128);
        assert_ne!(hash_state(&a), hash_state(&a.negated()));
    }

    #[test]
    fn should_record_transitions_between_states() {
        let mut metadata = QuantumMetadata::new(10);
        let a = Field::from_values(vec![1.0, 2.0, 3.0]);
        let b = Field::from_values(vec![3.0, 2.0, 1.0]);

        metadata.record_state(&a);
        assert_eq!(metadata.transition_history().count(), 0);
        metadata.record_state(&b);
        metadata.record_state(&b);

        let transitions: Vec<_> = metadata.transition_history().collect();
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].from_state.len(), 16);
        assert_eq!(
            transitions[0].kind,
            TransitionKind::classify(&hash_state(&a), &hash_state(&b))
        );
        assert_eq!(transitions[1].kind, TransitionKind::Stable);
    }

    #[test]
    fn should_classify_by_hash_order() {
        assert_eq!(TransitionKind::classify("ab", "ab"), TransitionKind::Stable);
        assert_eq!(TransitionKind::classify("ab", "ac"), TransitionKind::Progressive);
        assert_eq!(TransitionKind::classify("b0", "a9"), TransitionKind::Regressive);
    }

    #[test]
    fn should_stay_bounded() {
        let mut metadata = QuantumMetadata::new(3);
        for i in 0..10 {
            metadata.record_state(&Field::from_values(vec![i as f64, 1.0]));
        }
        assert_eq!(metadata.state_history().count(), 3);
        assert_eq!(metadata.transition_history().count(), 3);

        metadata.clear();
        assert_eq!(metadata.state_history().count(), 0);
        assert_eq!(metadata.phi_modulation_stats(), PhiModulationStats::default());
    }

    #[test]
    fn should_correlate_with_the_phi_sequence() {
        let reference = Field::from_values(
            (1..=32).map(|i| (i as f64 * PHI).rem_euclid(1.0)).collect(),
        );
        assert!((phi_correlation(&reference) - 1.0).abs() < 1e-9);
        assert!((phi_correlation(&reference.negated()) + 1.0).abs() < 1e-9);
        assert_eq!(phi_correlation(&Field::from_values(vec![4.0; 8])), 0.0);
    }

    #[test]
    fn should_summarize_phi_correlations() {
        let mut metadata = QuantumMetadata::new(8);
        let reference = Field::from_values(
            (1..=16).map(|i| (i as f64 * PHI).rem_euclid(1.0)).collect(),
        );
        metadata.record_state(&reference);
        metadata.record_state(&reference.negated());

        let stats = metadata.phi_modulation_stats();
        assert!(stats.mean.abs() < 1e-9);
        assert!((stats.max - 1.0).abs() < 1e-9);
        assert!((stats.min + 1.0).abs() < 1e-9);
        assert!((stats.std - 1.0).abs() < 1e-9);
    }
}
