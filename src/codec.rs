//! Binary encoding of a [`BloomFilter`].
//!
//! All integers are little-endian:
//!
//! | offset              | length            | field                    |
//! |---------------------|-------------------|--------------------------|
//! | 0                   | 8                 | size in bits             |
//! | 8                   | 8                 | insert count             |
//! | 16                  | `ceil(size / 8)`  | bits, LSB-first per byte |
//! | 16 + ceil(size / 8) | 8                 | hash count               |
//!
//! The trailing hash count is optional on input: encodings without it can be
//! read with [`BloomFilter::deserialize_with_hash_count`].

use std::io::Cursor;

use byteorder::{ReadBytesExt, LE};
use tracing::debug;

use crate::bits::{packed_len, AtomicBitArray};
use crate::bloom::BloomFilter;
use crate::config::FilterConfig;
use crate::error::{Error, Result};

const HEADER_BYTES: usize = 16;
const TRAILER_BYTES: usize = 8;

struct Header<'a> {
    size: u64,
    inserted: u64,
    bits: &'a [u8],
    rest: &'a [u8],
}

fn make_error(tag: &'static str) -> impl FnOnce(std::io::Error) -> Error {
    move |_| Error::malformed(format!("insufficient data ({tag})"))
}

// Validates the declared size against the input length before anything is
// allocated for the bit array.
fn read_header(bytes: &[u8]) -> Result<Header<'_>> {
    let mut cursor = Cursor::new(bytes);
    let size = cursor.read_u64::<LE>().map_err(make_error("size"))?;
    let inserted = cursor
        .read_u64::<LE>()
        .map_err(make_error("inserted_count"))?;

    if size == 0 {
        return Err(Error::malformed("declared size is zero"));
    }
    if usize::try_from(size).is_err() {
        return Err(Error::malformed(format!(
            "declared size {size} is not addressable on this platform"
        )));
    }

    let body = &bytes[HEADER_BYTES..];
    let needed = packed_len(size);
    if body.len() < needed {
        return Err(Error::malformed(format!(
            "insufficient data (bits): size {size} needs {} bytes, got {}",
            HEADER_BYTES + needed,
            bytes.len()
        )));
    }
    let (bits, rest) = body.split_at(needed);
    Ok(Header {
        size,
        inserted,
        bits,
        rest,
    })
}

fn build(header: Header<'_>, hash_count: u64) -> Result<BloomFilter> {
    if hash_count == 0 {
        return Err(Error::malformed("hash count is zero"));
    }
    let config = FilterConfig {
        size: header.size,
        hash_count,
    };
    let storage = AtomicBitArray::from_le_bytes(header.size, header.bits);
    debug!(
        size = header.size,
        hash_count,
        inserted = header.inserted,
        "decoded bloom filter"
    );
    Ok(BloomFilter::from_parts(config, storage, header.inserted))
}

impl BloomFilter {
    /// Encodes the filter, hash count included.
    pub fn serialize(&self) -> Vec<u8> {
        // bits and count come from one read-locked view
        let (bits, inserted) = self.packed();
        let mut bytes = Vec::with_capacity(HEADER_BYTES + bits.len() + TRAILER_BYTES);
        bytes.extend_from_slice(&self.size().to_le_bytes());
        bytes.extend_from_slice(&inserted.to_le_bytes());
        bytes.extend_from_slice(&bits);
        bytes.extend_from_slice(&self.hash_count().to_le_bytes());
        bytes
    }

    /// Decodes a filter written by [`BloomFilter::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<BloomFilter> {
        let header = read_header(bytes)?;
        let mut cursor = Cursor::new(header.rest);
        let hash_count = cursor
            .read_u64::<LE>()
            .map_err(make_error("hash_count"))?;

        let trailing = header.rest.len() - TRAILER_BYTES;
        if trailing != 0 {
            return Err(Error::malformed(format!(
                "{trailing} unexpected trailing bytes"
            )));
        }
        build(header, hash_count)
    }

    /// Decodes the size, count and bits of an encoding that carries no hash
    /// count, probing with `hash_count` hashes. Bytes after the bit array
    /// are ignored.
    pub fn deserialize_with_hash_count(bytes: &[u8], hash_count: u64) -> Result<BloomFilter> {
        build(read_header(bytes)?, hash_count)
    }
}
