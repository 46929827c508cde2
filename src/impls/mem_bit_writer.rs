/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{check_args, touched_bytes};
use crate::error::{HuffmanError, Result};
use crate::traits::*;

/// Write the lowest `n` bits of `value` starting at bit `bit_offset` of
/// `dst[0]`.
///
/// Returns the number of whole bytes the cursor must advance and the new bit
/// offset.
///
/// The bits of `dst[0]` preceding `bit_offset` are preserved, the bytes
/// covered entirely by the run are overwritten, and the bits of the last
/// touched byte following the run are cleared, so that a stream written
/// sequentially never contains stale bits past its end.
///
/// If `dst` contains fewer than `⌈(bit_offset + n) / 8⌉` bytes,
/// [`HuffmanError::InsufficientSpace`] is returned and `dst` is not modified.
///
/// # Example
/// ```
/// use huffword::prelude::*;
///
/// let mut data = [0xA5];
/// assert_eq!(write_bits_at(&mut data, 0, 0x08, 5).unwrap(), (0, 5));
/// assert_eq!(data, [0x40]);
/// ```
pub fn write_bits_at(dst: &mut [u8], bit_offset: u8, value: u64, n: usize) -> Result<(usize, u8)> {
    check_args(bit_offset, n)?;
    let window = dst
        .get_mut(..touched_bytes(bit_offset, n))
        .ok_or(HuffmanError::InsufficientSpace)?;

    let value = if n == 64 {
        value
    } else {
        value & ((1 << n) - 1)
    };
    let end = bit_offset as usize + n;
    let kept = window[0] & !(0xFF >> bit_offset);
    let buffer = ((kept as u128) << 120) | ((value as u128) << (128 - end));
    for (i, byte) in window.iter_mut().enumerate() {
        *byte = (buffer >> (120 - 8 * i)) as u8;
    }

    Ok((end / 8, (end % 8) as u8))
}

/// An implementation of [`BitWrite`] and [`BitSeek`] for a mutable byte
/// slice.
///
/// The slice is never reallocated: writes that do not fit fail with
/// [`HuffmanError::InsufficientSpace`] and leave both the slice and the
/// writer untouched.
///
/// # Example
/// ```
/// use huffword::prelude::*;
///
/// let mut data = [0xFF; 2];
/// let mut writer = MemBitWriter::new(&mut data);
///
/// assert_eq!(writer.write_bits(0b101, 3).unwrap(), 3);
/// assert_eq!(writer.write_bits(0x1F0, 9).unwrap(), 9);
/// assert_eq!((writer.byte_pos(), writer.bit_offset()), (1, 4));
/// assert_eq!(writer.remaining(), 1);
///
/// // five bits do not fit in the four bits left
/// assert!(writer.write_bits(0, 5).is_err());
/// assert_eq!(writer.written_bytes(), 2);
/// assert_eq!(data, [0b1011_1111, 0b0000_0000]);
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct MemBitWriter<'a> {
    data: &'a mut [u8],
    byte_pos: usize,
    bit_offset: u8,
}

impl<'a> MemBitWriter<'a> {
    /// Create a new [`MemBitWriter`] positioned at the first bit of `data`.
    #[must_use]
    pub fn new(data: &'a mut [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_offset: 0,
        }
    }

    /// Create a new [`MemBitWriter`] positioned at bit `bit_offset` of byte
    /// `byte_pos`.
    pub fn with_position(data: &'a mut [u8], byte_pos: usize, bit_offset: u8) -> Result<Self> {
        if bit_offset >= 8 {
            return Err(HuffmanError::InvalidValue("bit offset must be in 0..8"));
        }
        let mut writer = Self::new(data);
        writer.set_bit_pos(byte_pos as u64 * 8 + bit_offset as u64)?;
        Ok(writer)
    }

    /// The index of the byte containing the next bit.
    #[inline]
    pub fn byte_pos(&self) -> usize {
        self.byte_pos
    }

    /// The offset of the next bit inside its byte, in `0..8`.
    #[inline]
    pub fn bit_offset(&self) -> u8 {
        self.bit_offset
    }

    /// The number of bytes from the current byte (included) to the end of
    /// the slice.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.byte_pos
    }

    /// The number of bytes holding at least one written bit, assuming the
    /// stream was written from the start of the slice.
    pub fn written_bytes(&self) -> usize {
        self.byte_pos + (self.bit_offset != 0) as usize
    }

    /// Return the underlying slice, consuming the writer.
    pub fn into_inner(self) -> &'a mut [u8] {
        self.data
    }
}

impl BitWrite for MemBitWriter<'_> {
    #[inline]
    fn write_bits(&mut self, value: u64, n: usize) -> Result<usize> {
        let (advance, bit_offset) =
            write_bits_at(&mut self.data[self.byte_pos..], self.bit_offset, value, n)?;
        self.byte_pos += advance;
        self.bit_offset = bit_offset;
        Ok(n)
    }

    #[inline]
    fn remaining_bits(&self) -> u64 {
        self.remaining() as u64 * 8 - self.bit_offset as u64
    }
}

impl BitSeek for MemBitWriter<'_> {
    #[inline]
    fn bit_pos(&self) -> u64 {
        self.byte_pos as u64 * 8 + self.bit_offset as u64
    }

    fn set_bit_pos(&mut self, bit_pos: u64) -> Result<()> {
        if bit_pos > self.data.len() as u64 * 8 {
            return Err(HuffmanError::InvalidValue(
                "bit position past the end of the stream",
            ));
        }
        self.byte_pos = (bit_pos / 8) as usize;
        self.bit_offset = (bit_pos % 8) as u8;
        Ok(())
    }
}
