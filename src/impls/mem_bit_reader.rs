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

/// Read `n` bits starting at bit `bit_offset` of `src[0]`.
///
/// Returns the value in the lowest bits, the number of whole bytes the
/// cursor must advance and the new bit offset.
///
/// `src` must contain at least `⌈(bit_offset + n) / 8⌉` bytes; otherwise
/// [`HuffmanError::InsufficientSpace`] is returned.
///
/// # Example
/// ```
/// use huffword::prelude::*;
///
/// // 0x96 = 100 101 10
/// assert_eq!(read_bits_at(&[0x96], 0, 3).unwrap(), (4, 0, 3));
/// assert_eq!(read_bits_at(&[0x96], 3, 5).unwrap(), (0x16, 1, 0));
/// ```
pub fn read_bits_at(src: &[u8], bit_offset: u8, n: usize) -> Result<(u64, usize, u8)> {
    check_args(bit_offset, n)?;
    let window = src
        .get(..touched_bytes(bit_offset, n))
        .ok_or(HuffmanError::InsufficientSpace)?;

    // at most 9 bytes, left-aligned in a 128-bit buffer
    let buffer = window
        .iter()
        .enumerate()
        .fold(0_u128, |acc, (i, &byte)| acc | ((byte as u128) << (120 - 8 * i)));
    let value = ((buffer << bit_offset) >> (128 - n)) as u64;

    let end = bit_offset as usize + n;
    Ok((value, end / 8, (end % 8) as u8))
}

/// An implementation of [`BitRead`] and [`BitSeek`] for a byte slice.
///
/// # Example
/// ```
/// use huffword::prelude::*;
///
/// let data = [0x1B, 0xFF];
/// let mut reader = MemBitReader::new(&data);
///
/// assert_eq!(reader.read_bits(2).unwrap(), 0);
/// assert_eq!(reader.read_bits(2).unwrap(), 1);
/// assert_eq!(reader.read_bits(7).unwrap(), 0b1011111);
/// assert_eq!((reader.byte_pos(), reader.bit_offset()), (1, 3));
///
/// // not enough bits left: the reader does not move
/// assert!(reader.read_bits(6).is_err());
/// assert_eq!(reader.bit_pos(), 11);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemBitReader<'a> {
    data: &'a [u8],
    byte_pos: usize,
    bit_offset: u8,
}

impl<'a> MemBitReader<'a> {
    /// Create a new [`MemBitReader`] positioned at the first bit of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_offset: 0,
        }
    }

    /// Create a new [`MemBitReader`] positioned at bit `bit_offset` of byte
    /// `byte_pos`.
    pub fn with_position(data: &'a [u8], byte_pos: usize, bit_offset: u8) -> Result<Self> {
        let mut reader = Self::new(data);
        if bit_offset >= 8 {
            return Err(HuffmanError::InvalidValue("bit offset must be in 0..8"));
        }
        reader.set_bit_pos(byte_pos as u64 * 8 + bit_offset as u64)?;
        Ok(reader)
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

    /// The whole underlying slice.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline(always)]
    fn tail(&self) -> &'a [u8] {
        &self.data[self.byte_pos..]
    }
}

impl BitRead for MemBitReader<'_> {
    #[inline]
    fn read_bits(&mut self, n: usize) -> Result<u64> {
        let (value, advance, bit_offset) = read_bits_at(self.tail(), self.bit_offset, n)?;
        self.byte_pos += advance;
        self.bit_offset = bit_offset;
        Ok(value)
    }

    fn read_unary(&mut self) -> Result<u64> {
        let skipped = self.bit_offset as u64;
        let mut zeros = 0;
        for (i, &byte) in self.tail().iter().enumerate() {
            let byte = if i == 0 {
                byte & (0xFF >> self.bit_offset)
            } else {
                byte
            };
            if byte != 0 {
                let one = byte.leading_zeros() as u64;
                zeros += if i == 0 { one - skipped } else { one };
                self.byte_pos += i + ((one + 1) / 8) as usize;
                self.bit_offset = ((one + 1) % 8) as u8;
                return Ok(zeros);
            }
            zeros += if i == 0 { 8 - skipped } else { 8 };
        }
        Err(HuffmanError::InsufficientSpace)
    }

    #[inline]
    fn remaining_bits(&self) -> u64 {
        self.remaining() as u64 * 8 - self.bit_offset as u64
    }
}

impl BitSeek for MemBitReader<'_> {
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
