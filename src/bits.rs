use std::sync::atomic::{AtomicU64, Ordering};

use bit_vec::BitVec;
use byteorder::{ByteOrder, LE};

const WORD_BITS: u64 = 64;
const WORD_BYTES: usize = 8;

/// Fixed-length bit array whose bits can be set through a shared reference.
///
/// Bits only ever go from 0 to 1 through `set`; clearing needs `&mut self`.
/// Bits past `len` in the last word are always zero.
pub(crate) struct AtomicBitArray {
    words: Box<[AtomicU64]>,
    len: u64,
}

impl AtomicBitArray {
    pub(crate) fn new(len: u64) -> Self {
        let words = (0..len.div_ceil(WORD_BITS))
            .map(|_| AtomicU64::new(0))
            .collect();
        Self { words, len }
    }

    /// Rebuilds an array from LSB-first packed bytes, ignoring any bits past
    /// `len`. `bytes` must hold at least `ceil(len / 8)` bytes.
    pub(crate) fn from_le_bytes(len: u64, bytes: &[u8]) -> Self {
        let used = packed_len(len);
        let mut words: Vec<AtomicU64> = bytes[..used]
            .chunks(WORD_BYTES)
            .map(|chunk| {
                let mut buf = [0u8; WORD_BYTES];
                buf[..chunk.len()].copy_from_slice(chunk);
                AtomicU64::new(LE::read_u64(&buf))
            })
            .collect();
        let tail = len % WORD_BITS;
        if tail != 0 {
            if let Some(last) = words.last_mut() {
                *last.get_mut() &= (1u64 << tail) - 1;
            }
        }
        Self {
            words: words.into_boxed_slice(),
            len,
        }
    }

    pub(crate) fn len(&self) -> u64 {
        self.len
    }

    pub(crate) fn set(&self, idx: u64) {
        let (word, mask) = locate(idx);
        self.words[word].fetch_or(mask, Ordering::Relaxed);
    }

    pub(crate) fn get(&self, idx: u64) -> bool {
        let (word, mask) = locate(idx);
        self.words[word].load(Ordering::Relaxed) & mask != 0
    }

    pub(crate) fn clear(&mut self) {
        for word in self.words.iter_mut() {
            *word.get_mut() = 0;
        }
    }

    pub(crate) fn count_ones(&self) -> u64 {
        self.words
            .iter()
            .map(|w| u64::from(w.load(Ordering::Relaxed).count_ones()))
            .sum()
    }

    /// Packs the bits LSB-first: bit `i` lands in byte `i / 8` at position `i % 8`.
    pub(crate) fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.words.len() * WORD_BYTES];
        for (chunk, word) in bytes.chunks_exact_mut(WORD_BYTES).zip(self.words.iter()) {
            LE::write_u64(chunk, word.load(Ordering::Relaxed));
        }
        bytes.truncate(packed_len(self.len));
        bytes
    }

    /// Word-wise OR of two arrays of the same length.
    pub(crate) fn or_from(&self, other: &AtomicBitArray) -> AtomicBitArray {
        debug_assert_eq!(self.len, other.len);
        let words = self
            .words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| AtomicU64::new(a.load(Ordering::Relaxed) | b.load(Ordering::Relaxed)))
            .collect();
        Self {
            words,
            len: self.len,
        }
    }

    pub(crate) fn to_bit_vec(&self) -> BitVec {
        BitVec::from_fn(self.len as usize, |i| self.get(i as u64))
    }
}

impl Clone for AtomicBitArray {
    fn clone(&self) -> Self {
        let words = self
            .words
            .iter()
            .map(|w| AtomicU64::new(w.load(Ordering::Relaxed)))
            .collect();
        Self {
            words,
            len: self.len,
        }
    }
}

/// Number of bytes needed to hold `len` bits.
pub(crate) fn packed_len(len: u64) -> usize {
    len.div_ceil(8) as usize
}

fn locate(idx: u64) -> (usize, u64) {
    ((idx / WORD_BITS) as usize, 1u64 << (idx % WORD_BITS))
}
