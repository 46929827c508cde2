/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::{HuffmanError, Result};

/// Sequential, streaming bit-by-bit reads.
///
/// Bits are read MSB-first within each byte, and bytes are read in order, so
/// the first bit of the stream is the most significant bit of the first
/// byte.
///
/// A failed read never moves the stream.
pub trait BitRead {
    /// Read `n` bits and return them in the lowest bits.
    ///
    /// `n` must be in `1..=64`; otherwise [`HuffmanError::InvalidValue`] is
    /// returned.
    fn read_bits(&mut self, n: usize) -> Result<u64>;

    /// Read a unary code, that is, the number of zeros preceding the next
    /// one, and skip the one.
    fn read_unary(&mut self) -> Result<u64>;

    /// Return the number of bits left in the stream.
    fn remaining_bits(&self) -> u64;

    /// Copy `n` bits from this stream to `bit_write`.
    ///
    /// Both streams are checked for space before any bit is moved.
    fn copy_to<W: BitWrite>(&mut self, bit_write: &mut W, mut n: u64) -> Result<()> {
        if n > self.remaining_bits() || n > bit_write.remaining_bits() {
            return Err(HuffmanError::InsufficientSpace);
        }
        while n > 0 {
            let to_read = core::cmp::min(n, 64) as usize;
            let read = self.read_bits(to_read)?;
            bit_write.write_bits(read, to_read)?;
            n -= to_read as u64;
        }
        Ok(())
    }
}

/// Sequential, streaming bit-by-bit writes.
///
/// The bit order is the same as that of [`BitRead`].
pub trait BitWrite {
    /// Write the lowest `n` bits of `value` to the stream and return the number
    /// of bits written, that is, `n`.
    ///
    /// Higher bits of `value` are silently discarded. `n` must be in
    /// `1..=64`. If the stream cannot hold `n` more bits nothing is written
    /// and [`HuffmanError::InsufficientSpace`] is returned.
    fn write_bits(&mut self, value: u64, n: usize) -> Result<usize>;

    /// Write `value` as a unary code to the stream and return the number of
    /// bits written, that is, `value` plus one.
    fn write_unary(&mut self, value: u64) -> Result<usize> {
        let len = value.checked_add(1).ok_or(HuffmanError::Overflow)?;
        if len > self.remaining_bits() {
            return Err(HuffmanError::InsufficientSpace);
        }
        let mut zeros = value;
        while zeros > 0 {
            let n = core::cmp::min(zeros, 64);
            self.write_bits(0, n as usize)?;
            zeros -= n;
        }
        self.write_bits(1, 1)?;
        Ok(len as usize)
    }

    /// Return the number of bits that can still be written.
    fn remaining_bits(&self) -> u64;
}

/// Seekability for [`BitRead`] and [`BitWrite`] streams.
pub trait BitSeek {
    /// Get the current position in bits from the start of the stream.
    fn bit_pos(&self) -> u64;

    /// Set the current position in bits from the start of the stream to `bit_pos`.
    ///
    /// Positions past the end of the stream are rejected with
    /// [`HuffmanError::InvalidValue`].
    fn set_bit_pos(&mut self, bit_pos: u64) -> Result<()>;
}
