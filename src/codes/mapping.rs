/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Mappings from word indices to codewords.
//!
//! A mapping assigns a prefix-free codeword to each word index, where the
//! index of a word is its position in
//! [`FrequencyTable::ranked`](crate::table::FrequencyTable::ranked), so
//! that more frequent words receive shorter (or equal) codewords.

use crate::error::{HuffmanError, Result};
use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// A prefix-free code on word indices.
///
/// On error, [`write_index`](WordMapping::write_index) leaves the writer
/// untouched, whereas after a failed
/// [`read_index`](WordMapping::read_index) the position of the reader is
/// unspecified.
pub trait WordMapping {
    /// Return the length in bits of the codeword of `idx`.
    fn compressed_len(&self, idx: u64) -> u64;

    /// Write the codeword of `idx` and return the number of bits written.
    fn write_index<W: BitWrite>(&self, idx: u64, writer: &mut W) -> Result<usize>;

    /// Read a codeword and return its index, which must be smaller than
    /// `unique_words`; otherwise, [`HuffmanError::InvalidData`] is returned.
    fn read_index<R: BitRead>(&self, reader: &mut R, unique_words: u64) -> Result<u64>;
}

#[inline(always)]
fn check_index(idx: u64, unique_words: u64) -> Result<u64> {
    if idx >= unique_words {
        return Err(HuffmanError::InvalidData(
            "word index is not smaller than the number of unique words",
        ));
    }
    Ok(idx)
}

/// The one-hot mapping: index `i` is written in unary, that is, as `i`
/// zeros followed by a one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
pub struct OneHot;

impl WordMapping for OneHot {
    #[inline]
    fn compressed_len(&self, idx: u64) -> u64 {
        idx.saturating_add(1)
    }

    #[inline]
    fn write_index<W: BitWrite>(&self, idx: u64, writer: &mut W) -> Result<usize> {
        writer.write_unary(idx)
    }

    #[inline]
    fn read_index<R: BitRead>(&self, reader: &mut R, unique_words: u64) -> Result<u64> {
        check_index(reader.read_unary()?, unique_words)
    }
}

/// The fixed-depth tree mapping.
///
/// The tree has a spine of left branches; every node of the spine but the
/// root carries a complete binary subtree of depth `depth`. Index 0 is the
/// codeword `1`. Index `i > 0` lives in the subtree `g = ⌈i / 2^depth⌉`
/// levels down the spine: its codeword is `g` zeros followed by the
/// `depth + 1`-bit value `2^depth` if `r = i mod 2^depth` is zero, and
/// `2^(depth + 1) - r` otherwise, for a total of `1 + depth + g` bits.
///
/// A depth of zero gives back the [one-hot](OneHot) mapping.
///
/// # Example
/// ```
/// use huffword::prelude::*;
///
/// let tree = FixedDepthTree::new(2)?;
/// let mut data = [0; 2];
/// let mut writer = MemBitWriter::new(&mut data);
/// // 0 + 100
/// assert_eq!(tree.write_index(4, &mut writer)?, 4);
/// // 00 + 111
/// assert_eq!(tree.write_index(5, &mut writer)?, 5);
/// assert_eq!(data, [0b0100_0011, 0b1000_0000]);
///
/// let mut reader = MemBitReader::new(&data);
/// assert_eq!(tree.read_index(&mut reader, 6)?, 4);
/// assert!(tree.read_index(&mut reader, 5).is_err());
/// # Ok::<(), HuffmanError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
pub struct FixedDepthTree {
    depth: u8,
    /// 2^depth
    pow2: u64,
}

impl FixedDepthTree {
    /// The largest supported depth.
    pub const MAX_DEPTH: u8 = 62;

    /// Create a fixed-depth tree mapping whose subtrees have depth `depth`.
    ///
    /// # Errors
    /// [`HuffmanError::InvalidValue`] if `depth` is larger than
    /// [`MAX_DEPTH`](Self::MAX_DEPTH).
    pub fn new(depth: u8) -> Result<Self> {
        if depth > Self::MAX_DEPTH {
            return Err(HuffmanError::InvalidValue("tree depth must be at most 62"));
        }
        Ok(Self {
            depth,
            pow2: 1 << depth,
        })
    }

    #[inline(always)]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Return the number of leading zeros and the `depth + 1`-bit value
    /// following them of the codeword of `idx > 0`.
    #[inline]
    fn split(&self, idx: u64) -> (u64, u64) {
        let r = idx % self.pow2;
        let g = idx / self.pow2 + (r != 0) as u64;
        let value = if r == 0 { self.pow2 } else { 2 * self.pow2 - r };
        (g, value)
    }
}

impl WordMapping for FixedDepthTree {
    #[inline]
    fn compressed_len(&self, idx: u64) -> u64 {
        if idx == 0 {
            return 1;
        }
        let (g, _) = self.split(idx);
        g + 1 + self.depth as u64
    }

    fn write_index<W: BitWrite>(&self, idx: u64, writer: &mut W) -> Result<usize> {
        if idx == 0 {
            return writer.write_bits(1, 1);
        }
        let len = self.compressed_len(idx);
        if len > writer.remaining_bits() {
            return Err(HuffmanError::InsufficientSpace);
        }
        let (g, value) = self.split(idx);
        // the unary terminator is the highest bit of value
        writer.write_unary(g)?;
        if self.depth != 0 {
            writer.write_bits(value - self.pow2, self.depth as usize)?;
        }
        Ok(len as usize)
    }

    fn read_index<R: BitRead>(&self, reader: &mut R, unique_words: u64) -> Result<u64> {
        let g = reader.read_unary()?;
        if g == 0 {
            return check_index(0, unique_words);
        }
        let value = if self.depth == 0 {
            self.pow2
        } else {
            self.pow2 + reader.read_bits(self.depth as usize)?
        };
        let idx = if value == self.pow2 {
            g.checked_mul(self.pow2)
        } else {
            (g - 1)
                .checked_mul(self.pow2)
                .and_then(|base| base.checked_add(2 * self.pow2 - value))
        };
        check_index(
            idx.ok_or(HuffmanError::InvalidData("word index overflow"))?,
            unique_words,
        )
    }
}
