//! A thread-safe Bloom filter over byte strings.
//!
//! ```
//! use bloom_filter::BloomFilter;
//!
//! let bf = BloomFilter::new(1000, 3)?;
//! bf.insert(b"apple");
//! assert!(bf.lookup(b"apple"));
//!
//! let copy = BloomFilter::deserialize(&bf.serialize())?;
//! assert!(copy.lookup(b"apple"));
//! # Ok::<(), bloom_filter::Error>(())
//! ```

mod bits;
mod bloom;
mod codec;
mod config;
mod error;

pub use self::bloom::BloomFilter;
pub use self::config::FilterConfig;
pub use self::error::{Error, Mismatch, Result};
