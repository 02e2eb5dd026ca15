//! Reverse Collatz recurrence
//!
//! For odd `m` and `k ≥ 1`, the candidate odd predecessor of `m · 2^k` is
//!
//!   g = (2^k · m − 1) / 3
//!
//! It exists only when the division is exact and `g` is an odd integer
//! other than `1`. Absence is the common case and is reported as `None`.

use std::collections::HashMap;

/// Compute the odd predecessor of `m · 2^k`, if any.
///
/// Pure: depends only on `(k, m)`. Products that leave `u64` are treated
/// as having no predecessor.
pub fn reverse_step(k: u32, m: u64) -> Option<u64> {
    let scaled = 2u64.checked_pow(k)?.checked_mul(m)?;
    let numerator = scaled.checked_sub(1)?;
    if numerator % 3 != 0 {
        return None;
    }
    let g = numerator / 3;
    (g % 2 == 1 && g != 1).then_some(g)
}

/// Cache counters for a [`ReverseEvaluator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct CacheStats {
    /// Queries answered from the cache.
    pub hits: usize,
    /// Queries that ran [`reverse_step`].
    pub misses: usize,
    /// Distinct `(k, m)` keys stored.
    pub entries: usize,
}

/// Memoized front end to [`reverse_step`], keyed on `(k, m)`.
///
/// One instance per generation run is the default; a caller may keep one
/// alive across runs to share results. Not synchronized.
#[derive(Debug, Default)]
pub struct ReverseEvaluator {
    cache: HashMap<(u32, u64), Option<u64>>,
    hits: usize,
    misses: usize,
}

impl ReverseEvaluator {
    /// Create an evaluator with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or compute the predecessor for `(k, m)`.
    pub fn evaluate(&mut self, k: u32, m: u64) -> Option<u64> {
        if let Some(&cached) = self.cache.get(&(k, m)) {
            self.hits += 1;
            return cached;
        }
        self.misses += 1;
        let result = reverse_step(k, m);
        self.cache.insert((k, m), result);
        result
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.cache.len(),
        }
    }
}
