/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{FrequencyTable, MAX_INITIAL_CAPACITY, max_table_size};
use crate::error::{HuffmanError, Result};
use crate::header::HuffmanHeader;
use crate::impls::MemBitReader;
use crate::traits::*;
use crate::{MAX_WORD_SIZE, MIN_WORD_SIZE};
use tracing::{debug, trace};

/// Return the number of slots allocated by [`FrequencyTable::build`] for
/// words of `word_size` bits, that is, the number of possible words divided
/// by the word size, clamped to `1..=`[`MAX_INITIAL_CAPACITY`].
#[must_use]
pub fn initial_capacity(word_size: u8) -> usize {
    let max_size = max_table_size(word_size);
    (max_size / word_size.max(1) as usize)
        .clamp(1, MAX_INITIAL_CAPACITY)
        .min(max_size)
}

impl FrequencyTable {
    /// Count the words of `word_size` bits in `source`, returning the header
    /// describing the stream together with the table.
    ///
    /// The source is split into words MSB-first. If its length in bits is
    /// not a multiple of `word_size`, the trailing bits are completed with
    /// [`pad_bits`](HuffmanHeader::pad_bits) padding bits, all zeros or all
    /// ones: if exactly one of the two completions is already in the table,
    /// that one is used; if both are, the most frequent is used (zeros on a
    /// tie); if neither is, zeros are used.
    ///
    /// # Errors
    /// - [`HuffmanError::InvalidValue`] if `source` is empty or `word_size`
    ///   is not in `2..=64`;
    /// - [`HuffmanError::InsufficientSpace`] if the table cannot grow;
    /// - [`HuffmanError::Overflow`] if a counter overflows.
    ///
    /// # Example
    /// ```
    /// use huffword::prelude::*;
    ///
    /// // 111 111 100 111 111 1: the last word is completed with ones
    /// let (header, table) = FrequencyTable::build(&[0xFE, 0x7F], 3)?;
    ///
    /// assert_eq!(header.word_size, 3);
    /// assert_eq!(header.pad_bits, 2);
    /// assert_eq!(header.unique_words, 2);
    /// assert_eq!(table.get(0b111), Some(5));
    /// assert_eq!(table.get(0b100), Some(1));
    /// # Ok::<(), HuffmanError>(())
    /// ```
    pub fn build(source: &[u8], word_size: u8) -> Result<(HuffmanHeader, Self)> {
        if !(MIN_WORD_SIZE..=MAX_WORD_SIZE).contains(&word_size) {
            return Err(HuffmanError::InvalidValue("word size must be in 2..=64"));
        }
        Self::build_with_capacity(source, word_size, initial_capacity(word_size))
    }

    /// Like [`build`](Self::build), but starting from a table with `capacity`
    /// slots.
    ///
    /// A capacity close to the number of distinct words avoids rehashing;
    /// the result does not depend on it.
    pub fn build_with_capacity(
        source: &[u8],
        word_size: u8,
        capacity: usize,
    ) -> Result<(HuffmanHeader, Self)> {
        if source.is_empty() {
            return Err(HuffmanError::InvalidValue("the source is empty"));
        }
        let mut table = Self::new(word_size, capacity)?;

        let ws = word_size as usize;
        let total_bits = source.len() as u64 * 8;
        let num_full = total_bits / ws as u64;
        let final_bits = (total_bits % ws as u64) as usize;

        let mut reader = MemBitReader::new(source);
        for _ in 0..num_full {
            table.add_or_increment(reader.read_bits(ws)?)?;
        }

        let mut pad_bits = 0;
        if final_bits != 0 {
            pad_bits = ws - final_bits;
            let low = reader.read_bits(final_bits)? << pad_bits;
            let high = low | ((1 << pad_bits) - 1);
            let word = match (table.get(low), table.get(high)) {
                (Some(low_count), Some(high_count)) if high_count > low_count => high,
                (None, Some(_)) => high,
                _ => low,
            };
            trace!(
                low,
                high,
                word,
                pad_bits,
                "padded the trailing word"
            );
            table.add_or_increment(word)?;
        }

        let header = HuffmanHeader {
            word_size,
            pad_bits: pad_bits as u8,
            unique_words: table.num_words(),
        };
        debug!(
            word_size,
            words = num_full + (final_bits != 0) as u64,
            unique_words = header.unique_words,
            pad_bits,
            size = table.size(),
            "built frequency table"
        );
        Ok((header, table))
    }
}
