use std::f64::consts::LN_2;

use crate::error::{Error, Result};

/// Shape of a Bloom filter: number of bits and number of hash probes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterConfig {
    // number of bits in a Bloom filter
    pub(crate) size: u64,
    // number of hash functions
    pub(crate) hash_count: u64,
}

impl FilterConfig {
    pub fn new(size: u64, hash_count: u64) -> Result<Self> {
        if size == 0 {
            return Err(Error::invalid_parameter("size", "must be greater than zero"));
        }
        if hash_count == 0 {
            return Err(Error::invalid_parameter(
                "hash_count",
                "must be at least one",
            ));
        }
        Ok(Self { size, hash_count })
    }

    /// Sizes a filter for `n` expected elements at false positive rate `f`.
    pub fn for_capacity(n: u64, f: f64) -> Result<Self> {
        if n == 0 {
            return Err(Error::invalid_parameter(
                "expected_items",
                "must be greater than zero",
            ));
        }
        if !(f > 0.0 && f < 1.0) {
            return Err(Error::invalid_parameter(
                "false_positive_rate",
                format!("must be in (0, 1), got {f}"),
            ));
        }
        let size = calculate_m(f, n);
        Self::new(size, calculate_k(size, n))
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn hash_count(&self) -> u64 {
        self.hash_count
    }
}

// m = -(nlε/(ln2)^2) where ε is desired false positive probability,
// in our case it is indicated by the letter f
fn calculate_m(f: f64, n: u64) -> u64 {
    (-(f.ln() * n as f64) / LN_2.powi(2)).ceil().max(1.0) as u64
}

/// k = m/n * ln2
pub(crate) fn calculate_k(m: u64, n: u64) -> u64 {
    (m as f64 / n as f64 * LN_2).ceil().max(1.0) as u64
}
