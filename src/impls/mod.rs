/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Implementations of bit streams over byte slices.

[`MemBitReader`] and [`MemBitWriter`] are bounded cursors: they borrow a
byte slice and keep a `(byte position, bit offset)` pair pointing at the next
bit to read or write. Bits are stored MSB-first within each byte, so the
stream `1, 0, 0, 1, 0, 1, 1, 0` is the byte `0x96`.

Both cursors check the length of the slice before touching it: an operation
that does not fit returns
[`InsufficientSpace`](crate::error::HuffmanError::InsufficientSpace) and
leaves the cursor (and, for the writer, the slice) unchanged.

If you do not want to carry a cursor around, the underlying primitives
[`read_bits_at`] and [`write_bits_at`] work on a slice and a starting bit
offset, and return how far the cursor should advance.

*/

use crate::error::{HuffmanError, Result};

mod mem_bit_reader;
pub use mem_bit_reader::*;

mod mem_bit_writer;
pub use mem_bit_writer::*;

/// Check the arguments shared by all the bit primitives.
#[inline(always)]
fn check_args(bit_offset: u8, n: usize) -> Result<()> {
    if bit_offset >= 8 {
        return Err(HuffmanError::InvalidValue("bit offset must be in 0..8"));
    }
    if n == 0 || n > 64 {
        return Err(HuffmanError::InvalidValue("bit count must be in 1..=64"));
    }
    Ok(())
}

/// Number of bytes touched by a run of `n` bits starting at `bit_offset`.
#[inline(always)]
fn touched_bytes(bit_offset: u8, n: usize) -> usize {
    (bit_offset as usize + n).div_ceil(8)
}
