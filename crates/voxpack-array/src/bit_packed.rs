//! Bit-packed array for storing fixed-width integer values in a compact `Vec<u64>`.
//!
//! Each element occupies exactly `bits` bits (1 to 64). Elements are packed
//! tightly and may straddle two neighbouring `u64` words: element `i` starts at
//! bit `i * bits` of the buffer, counted from the least significant bit of
//! word 0.

use crate::error::ArrayError;

/// A compact array where each element is stored using a fixed number of bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitPackedArray {
    /// Raw storage. Elements are packed into 64-bit words.
    data: Vec<u64>,
    /// Bits per element.
    bits: u8,
    /// Total number of logical elements.
    len: usize,
}

/// Bit position of an element inside the word buffer.
#[derive(Clone, Copy, Debug)]
struct Slot {
    word0: usize,
    word1: usize,
    offset: u32,
}

impl BitPackedArray {
    /// Creates a new array with `len` elements, all initialized to zero.
    ///
    /// `bits` must be in `1..=64`.
    pub fn new(bits: u8, len: usize) -> Self {
        debug_assert!((1..=64).contains(&bits), "bits must be in 1..=64");
        Self {
            data: vec![0u64; Self::words_for(bits, len)],
            bits,
            len,
        }
    }

    /// Constructs an array from raw words, checking that the buffer has the
    /// size implied by `bits` and `len`.
    pub fn from_raw(bits: u8, len: usize, data: Vec<u64>) -> Result<Self, ArrayError> {
        if !(1..=64).contains(&bits) {
            return Err(ArrayError::InvalidBitsPerValue(bits));
        }
        let expected = Self::words_for(bits, len);
        if data.len() != expected {
            return Err(ArrayError::WordCountMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, bits, len })
    }

    /// Number of `u64` words needed to hold `len` elements of `bits` bits.
    pub fn words_for(bits: u8, len: usize) -> usize {
        (len * usize::from(bits)).div_ceil(64)
    }

    /// Returns the raw value at `index`.
    pub fn get(&self, index: usize) -> Result<u64, ArrayError> {
        let slot = self.locate(index)?;
        let low = self.data[slot.word0] >> slot.offset;
        let value = if slot.word0 == slot.word1 {
            low
        } else {
            // A straddling element never starts at offset 0, so the shift is < 64.
            low | (self.data[slot.word1] << (64 - slot.offset))
        };
        Ok(value & self.max_value())
    }

    /// Stores `value` at `index`.
    ///
    /// Fails with [`ArrayError::InvalidRawValue`] if `value` needs more than
    /// `bits` bits; the value is never truncated.
    pub fn set(&mut self, index: usize, value: u64) -> Result<(), ArrayError> {
        let slot = self.locate(index)?;
        let mask = self.max_value();
        if value > mask {
            return Err(ArrayError::InvalidRawValue {
                value,
                bits: self.bits,
            });
        }

        // Bits shifted past the top of word0 fall off here and land in word1 below.
        let word = &mut self.data[slot.word0];
        *word = (*word & !(mask << slot.offset)) | (value << slot.offset);

        if slot.word1 != slot.word0 {
            let written = 64 - slot.offset;
            let word = &mut self.data[slot.word1];
            *word = (*word & !(mask >> written)) | (value >> written);
        }
        Ok(())
    }

    /// Returns the number of bits per element.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Largest value a single element can hold.
    pub fn max_value(&self) -> u64 {
        if self.bits >= 64 {
            u64::MAX
        } else {
            (1u64 << self.bits) - 1
        }
    }

    /// Returns the number of logical elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the size of the backing storage in bytes (not counting struct overhead).
    pub fn storage_bytes(&self) -> usize {
        self.data.len() * 8
    }

    /// Returns a reference to the raw `u64` storage words.
    pub fn raw_data(&self) -> &[u64] {
        &self.data
    }

    /// Consumes the array and returns its words.
    pub fn into_raw(self) -> Vec<u64> {
        self.data
    }

    fn locate(&self, index: usize) -> Result<Slot, ArrayError> {
        if index >= self.len {
            return Err(ArrayError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        let bits = usize::from(self.bits);
        let start = index * bits;
        Ok(Slot {
            word0: start / 64,
            word1: (start + bits - 1) / 64,
            offset: (start % 64) as u32,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
