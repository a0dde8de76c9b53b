use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use bit_vec::BitVec;
use parking_lot::RwLock;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::bits::AtomicBitArray;
use crate::config::{calculate_k, FilterConfig};
use crate::error::{Error, Mismatch, Result};

/// Bloom filter over byte strings.
///
/// `lookup` never returns `false` for a value passed to `insert` since the
/// last `reset`; it may return `true` for values that were never inserted.
///
/// All methods take `&self`. Inserts and lookups share a read lock and set
/// bits atomically, `reset` takes the write lock, so a filter can be shared
/// between threads behind an `Arc` as is.
///
/// ```
/// use bloom_filter::BloomFilter;
///
/// let bf = BloomFilter::new(1000, 3).unwrap();
/// bf.insert(b"apple");
///
/// assert!(bf.lookup(b"apple"));
/// assert_eq!(bf.count(), 1);
/// ```
pub struct BloomFilter {
    config: FilterConfig,
    state: RwLock<State>,
}

struct State {
    storage: AtomicBitArray,
    // number of insert calls, duplicates included
    inserted: AtomicU64,
}

impl State {
    fn empty(size: u64) -> Self {
        Self {
            storage: AtomicBitArray::new(size),
            inserted: AtomicU64::new(0),
        }
    }

    fn inserted(&self) -> u64 {
        self.inserted.load(Ordering::Relaxed)
    }

    fn union(&self, other: &State) -> State {
        State {
            storage: self.storage.or_from(&other.storage),
            inserted: AtomicU64::new(self.inserted().saturating_add(other.inserted())),
        }
    }
}

impl BloomFilter {
    /// Creates an empty filter of `size` bits probed by `hash_count` hashes.
    pub fn new(size: u64, hash_count: u64) -> Result<Self> {
        Self::with_config(FilterConfig::new(size, hash_count)?)
    }

    /// Creates a filter sized for `n` elements at false positive rate `f`.
    pub fn with_capacity(n: u64, f: f64) -> Result<Self> {
        Self::with_config(FilterConfig::for_capacity(n, f)?)
    }

    pub fn with_config(config: FilterConfig) -> Result<Self> {
        if usize::try_from(config.size).is_err() {
            return Err(Error::invalid_parameter(
                "size",
                format!("{} bits is not addressable on this platform", config.size),
            ));
        }
        debug!(
            size = config.size,
            hash_count = config.hash_count,
            "created bloom filter"
        );
        Ok(Self {
            config,
            state: RwLock::new(State::empty(config.size)),
        })
    }

    pub(crate) fn from_parts(config: FilterConfig, storage: AtomicBitArray, inserted: u64) -> Self {
        debug_assert_eq!(storage.len(), config.size);
        Self {
            config,
            state: RwLock::new(State {
                storage,
                inserted: AtomicU64::new(inserted),
            }),
        }
    }

    pub fn config(&self) -> FilterConfig {
        self.config
    }

    /// Number of bits in the filter.
    pub fn size(&self) -> u64 {
        self.config.size
    }

    pub fn hash_count(&self) -> u64 {
        self.config.hash_count
    }

    // Probe i hashes with seed i, so every probe picks its own bit.
    fn probes<'a>(&self, value: &'a [u8]) -> impl Iterator<Item = u64> + 'a {
        let m = self.config.size;
        (0..self.config.hash_count).map(move |seed| xxh3_64_with_seed(value, seed) % m)
    }

    pub fn insert(&self, value: &[u8]) {
        let state = self.state.read();
        for idx in self.probes(value) {
            state.storage.set(idx);
        }
        // saturates so a decoded count near u64::MAX never wraps to zero
        let _ = state
            .inserted
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(n.saturating_add(1))
            });
    }

    /// Returns `false` if `value` was definitely never inserted.
    pub fn lookup(&self, value: &[u8]) -> bool {
        let state = self.state.read();
        self.probes(value).all(|idx| state.storage.get(idx))
    }

    /// Number of `insert` calls so far, duplicates included.
    pub fn count(&self) -> u64 {
        self.state.read().inserted()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Number of bits currently set.
    pub fn bits_set(&self) -> u64 {
        self.state.read().storage.count_ones()
    }

    /// Copy of the bit array.
    pub fn snapshot(&self) -> BitVec {
        self.state.read().storage.to_bit_vec()
    }

    /// Packed bits and insert count, read under one lock.
    pub(crate) fn packed(&self) -> (Vec<u8>, u64) {
        let state = self.state.read();
        (state.storage.to_le_bytes(), state.inserted())
    }

    /// (1 - e^(-kn/m))^k, assuming independent and uniform probes.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let k = self.config.hash_count as f64;
        let n = self.count() as f64;
        let m = self.config.size as f64;
        (1.0 - (-k * n / m).exp()).powf(k)
    }

    /// Hash count that minimizes false positives for this size after
    /// `expected_elements` inserts. Zero is treated as one.
    pub fn optimal_hash_count(&self, expected_elements: u64) -> u64 {
        calculate_k(self.config.size, expected_elements.max(1))
    }

    /// Clears every bit and the insert counter.
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.storage.clear();
        *state.inserted.get_mut() = 0;
        debug!(size = self.config.size, "reset bloom filter");
    }

    /// Returns a new filter holding the bitwise OR of both filters.
    ///
    /// Fails if the filters differ in size or hash count.
    pub fn union(&self, other: &BloomFilter) -> Result<BloomFilter> {
        if self.config.size != other.config.size {
            return Err(Error::Incompatible {
                field: Mismatch::Size,
                left: self.config.size,
                right: other.config.size,
            });
        }
        if self.config.hash_count != other.config.hash_count {
            return Err(Error::Incompatible {
                field: Mismatch::HashCount,
                left: self.config.hash_count,
                right: other.config.hash_count,
            });
        }

        let merged = if std::ptr::eq(self, other) {
            let state = self.state.read();
            state.union(&state)
        } else {
            // lock in address order so concurrent a.union(b) and b.union(a) can't deadlock
            let mine;
            let theirs;
            if (self as *const Self) < (other as *const Self) {
                mine = self.state.write();
                theirs = other.state.read();
            } else {
                theirs = other.state.read();
                mine = self.state.write();
            }
            mine.union(&theirs)
        };

        debug!(
            size = self.config.size,
            hash_count = self.config.hash_count,
            inserted = merged.inserted(),
            "merged bloom filters"
        );
        Ok(BloomFilter {
            config: self.config,
            state: RwLock::new(merged),
        })
    }
}

impl Clone for BloomFilter {
    fn clone(&self) -> Self {
        let state = self.state.read();
        Self::from_parts(self.config, state.storage.clone(), state.inserted())
    }
}

impl fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("BloomFilter")
            .field("size", &self.config.size)
            .field("hash_count", &self.config.hash_count)
            .field("inserted", &state.inserted())
            .field("bits_set", &state.storage.count_ones())
            .finish()
    }
}
