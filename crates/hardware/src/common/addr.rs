//! Address decomposition for set-associative structures.
//!
//! A cache level is described by three base-2 logarithms:
//! `c` (total capacity in bytes), `b` (block size in bytes) and `s` (ways per
//! set). From these, an address splits into three disjoint fields:
//!
//! ```text
//!  63                       c-s   c-s-1            b   b-1           0
//! +----------------------------+--------------------+----------------+
//! |            tag             |       index        |  byte offset   |
//! +----------------------------+--------------------+----------------+
//! ```
//!
//! The block address is everything above the byte offset. Any field may be
//! zero bits wide (a fully associative structure has no index bits, a
//! one-byte block has no offset bits); a zero-width field always decodes to
//! zero and contributes nothing when composing.

use serde::Serialize;

use super::constants::{ADDR_WIDTH, MAX_INDEX_BITS};
use super::data::LevelId;
use super::error::ConfigError;

/// Returns a mask of the low `bits` bits, exact for every width in `0..=64`.
#[inline]
pub const fn low_mask(bits: u32) -> u64 {
    if bits >= ADDR_WIDTH {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Logical right shift that yields zero once the shift reaches the word size.
#[inline]
const fn shr(value: u64, bits: u32) -> u64 {
    if bits >= ADDR_WIDTH { 0 } else { value >> bits }
}

/// Logical left shift that yields zero once the shift reaches the word size.
#[inline]
const fn shl(value: u64, bits: u32) -> u64 {
    if bits >= ADDR_WIDTH { 0 } else { value << bits }
}

/// The three fields of a decoded address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// Bits `[c - s, 64)`.
    pub tag: u64,
    /// Bits `[b, c - s)`; selects the set.
    pub index: usize,
    /// Bits `[0, b)`.
    pub byte_offset: u64,
}

/// Validated `(c, b, s)` geometry of one cache structure.
///
/// Construction enforces `c >= s + b`, so every derived width is
/// non-negative and every address decodes into in-range coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Geometry {
    c: u32,
    b: u32,
    s: u32,
}

impl Geometry {
    /// Validates and builds the geometry of a set-associative level.
    ///
    /// # Arguments
    ///
    /// * `level` - Structure the geometry belongs to, used in error reports.
    /// * `c` - log2 of the total capacity in bytes.
    /// * `b` - log2 of the block size in bytes.
    /// * `s` - log2 of the associativity.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::AddressTooWide`] when `c` exceeds the address width.
    /// * [`ConfigError::DegenerateGeometry`] when `c < s + b`.
    /// * [`ConfigError::TooManySets`] when the index field is wider than
    ///   [`MAX_INDEX_BITS`].
    pub fn new(level: LevelId, c: u32, b: u32, s: u32) -> Result<Self, ConfigError> {
        if c > ADDR_WIDTH {
            return Err(ConfigError::AddressTooWide { level, c });
        }
        // Checked first so the subtraction below cannot underflow.
        if u64::from(c) < u64::from(s) + u64::from(b) {
            return Err(ConfigError::DegenerateGeometry { level, c, b, s });
        }
        let index_bits = c - s - b;
        if index_bits > MAX_INDEX_BITS {
            return Err(ConfigError::TooManySets {
                level,
                index_bits,
                max: MAX_INDEX_BITS,
            });
        }
        Ok(Self { c, b, s })
    }

    /// Builds the geometry of a fully associative structure with `entries`
    /// lines of `2^b` bytes.
    ///
    /// `s` is rounded up to `ceil(log2(entries))` and `c = s + b`, so the
    /// index field is empty and the tag is the whole block address.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Geometry::new`].
    pub fn fully_associative(level: LevelId, entries: u32, b: u32) -> Result<Self, ConfigError> {
        let s = entries.max(1).next_power_of_two().trailing_zeros();
        Self::new(level, s.saturating_add(b), b, s)
    }

    /// log2 of the total capacity in bytes.
    #[inline]
    pub const fn c(&self) -> u32 {
        self.c
    }

    /// log2 of the block size in bytes.
    #[inline]
    pub const fn b(&self) -> u32 {
        self.b
    }

    /// log2 of the associativity.
    #[inline]
    pub const fn s(&self) -> u32 {
        self.s
    }

    /// Width of the index field, `c - s - b`.
    #[inline]
    pub const fn index_bits(&self) -> u32 {
        self.c - self.s - self.b
    }

    /// Width of the tag field, `64 - c + s`.
    #[inline]
    pub const fn tag_bits(&self) -> u32 {
        ADDR_WIDTH - self.c + self.s
    }

    /// Number of sets, `2^index_bits`.
    #[inline]
    pub const fn num_sets(&self) -> usize {
        1usize << self.index_bits()
    }

    /// Number of ways per set, `2^s`, saturating at `usize::MAX`.
    #[inline]
    pub fn ways(&self) -> usize {
        1usize.checked_shl(self.s).unwrap_or(usize::MAX)
    }

    /// Block size in bytes, `2^b`, saturating at `u64::MAX`.
    #[inline]
    pub fn block_bytes(&self) -> u64 {
        1u64.checked_shl(self.b).unwrap_or(u64::MAX)
    }

    /// Bits `[0, b)` of `address`.
    #[inline]
    pub const fn byte_offset(&self, address: u64) -> u64 {
        address & low_mask(self.b)
    }

    /// Bits `[b, c - s)` of `address`.
    #[inline]
    pub const fn index(&self, address: u64) -> usize {
        (shr(address, self.b) & low_mask(self.index_bits())) as usize
    }

    /// Bits `[c - s, 64)` of `address`.
    #[inline]
    pub const fn tag(&self, address: u64) -> u64 {
        shr(address, self.c - self.s)
    }

    /// Bits `[b, 64)` of `address`.
    #[inline]
    pub const fn block_address(&self, address: u64) -> u64 {
        shr(address, self.b)
    }

    /// Splits `address` into tag, index and byte offset.
    #[inline]
    pub const fn decode(&self, address: u64) -> Decoded {
        Decoded {
            tag: self.tag(address),
            index: self.index(address),
            byte_offset: self.byte_offset(address),
        }
    }

    /// Reassembles an address from its fields; the exact inverse of
    /// [`Geometry::decode`]. Bits outside each field's width are ignored.
    #[inline]
    pub const fn compose(&self, tag: u64, index: usize, byte_offset: u64) -> u64 {
        shl(tag, self.c - self.s)
            | shl(index as u64 & low_mask(self.index_bits()), self.b)
            | (byte_offset & low_mask(self.b))
    }

    /// Address of byte `byte_offset` within block `block_address`.
    #[inline]
    pub const fn block_to_address(&self, block_address: u64, byte_offset: u64) -> u64 {
        shl(block_address, self.b) | (byte_offset & low_mask(self.b))
    }

    /// Replaces the block-address bits of `address`, keeping its byte offset.
    #[inline]
    pub const fn with_block_address(&self, address: u64, block_address: u64) -> u64 {
        self.block_to_address(block_address, self.byte_offset(address))
    }
}
