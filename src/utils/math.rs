/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use num_traits::PrimInt;

/// Return the number of bits needed to write any value in `0..x`, that is,
/// `⌈log₂x⌉`, except that the result for `x == 1` is 1 rather than 0.
///
/// Used to size the pad-bits field of the header: a word size of `w` needs
/// `log2_ceil(w)` bits to store any padding in `0..w`.
///
/// The result for `x == 0` is 0.
///
/// # Examples
/// ```
/// use huffword::utils::log2_ceil;
///
/// assert_eq!(log2_ceil(1_u8), 1);
/// assert_eq!(log2_ceil(8_u8), 3);
/// assert_eq!(log2_ceil(9_u64), 4);
/// assert_eq!(log2_ceil(64_u64), 6);
/// ```
#[must_use]
#[inline]
pub fn log2_ceil<T: PrimInt>(x: T) -> u32 {
    if x.is_zero() {
        return 0;
    }
    if x.is_one() {
        return 1;
    }
    let bits = T::zero().count_zeros();
    let highest = bits - 1 - x.leading_zeros();
    highest + (x.count_ones() > 1) as u32
}
