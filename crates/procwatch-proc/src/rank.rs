//! Ranking of process samples.
//!
//! The ordering contract: descending by the chosen key, with equal-key
//! entries keeping their enumeration order. `sort_by` is stable, which gives
//! the tie-break for free.

use crate::ProcessSample;

/// Field to rank process samples by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Rank by `cpu_percent`.
    Cpu,
    /// Rank by `memory_percent`.
    Memory,
}

impl SortKey {
    fn value_of(self, sample: &ProcessSample) -> f32 {
        match self {
            SortKey::Cpu => sample.cpu_percent,
            SortKey::Memory => sample.memory_percent,
        }
    }
}

/// Order samples descending by `key`.
///
/// The result is a permutation of the input; equal-key entries preserve
/// their relative input order.
pub fn rank(mut samples: Vec<ProcessSample>, key: SortKey) -> Vec<ProcessSample> {
    samples.sort_by(|a, b| key.value_of(b).total_cmp(&key.value_of(a)));
    samples
}

/// Order samples descending by `key` and keep the first `k`.
///
/// Truncation never reorders the retained prefix.
pub fn top(samples: Vec<ProcessSample>, key: SortKey, k: usize) -> Vec<ProcessSample> {
    let mut ranked = rank(samples, key);
    ranked.truncate(k);
    ranked
}
