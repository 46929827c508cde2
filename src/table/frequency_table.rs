/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::MAX_TABLE_SIZE;
use crate::error::{HuffmanError, Result};
use crate::{MAX_WORD_SIZE, MIN_WORD_SIZE};
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};
use tracing::debug;

/// A slot of a [`FrequencyTable`].
///
/// A slot with a zero count is empty, whatever its id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    /// The word.
    pub id: u64,
    /// The number of occurrences of the word.
    pub count: u64,
}

impl Slot {
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Return the number of slots needed to hold every word of `word_size`
/// bits, capped at [`MAX_TABLE_SIZE`].
#[must_use]
pub fn max_table_size(word_size: u8) -> usize {
    if word_size as u32 >= MAX_TABLE_SIZE.trailing_zeros() {
        MAX_TABLE_SIZE
    } else {
        1 << word_size
    }
}

/// Find, starting from the home slot of `id`, the first slot that is empty
/// or (unless `assume_no_match`) holds `id`.
///
/// Every slot is examined at most once.
#[inline]
fn probe(slots: &[Slot], id: u64, assume_no_match: bool) -> Option<usize> {
    if slots.is_empty() {
        return None;
    }
    let home = (id % slots.len() as u64) as usize;
    (home..slots.len())
        .chain(0..home)
        .find(|&i| slots[i].is_empty() || (!assume_no_match && slots[i].id == id))
}

/// Allocate `len` empty slots, failing gracefully if memory is exhausted.
fn alloc_slots(len: usize) -> Result<Vec<Slot>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(len)
        .map_err(|_| HuffmanError::InsufficientSpace)?;
    slots.resize(len, Slot::default());
    Ok(slots)
}

/// An open-addressing table counting the occurrences of words.
///
/// See the [module documentation](crate::table) for the hashing scheme.
///
/// # Example
/// ```
/// use huffword::prelude::*;
///
/// let mut table = FrequencyTable::new(8, 4)?;
/// for word in [7, 3, 7, 11, 7, 3, 15] {
///     table.add_or_increment(word)?;
/// }
/// // the fifth distinct word made the table grow
/// table.add_or_increment(19)?;
/// assert_eq!(table.size(), 8);
///
/// assert_eq!(table.num_words(), 5);
/// assert_eq!(table.get(7), Some(3));
/// assert_eq!(table.get(8), None);
/// assert_eq!(
///     table.ranked(),
///     vec![(7, 3), (3, 2), (11, 1), (15, 1), (19, 1)]
/// );
/// # Ok::<(), HuffmanError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyTable {
    slots: Vec<Slot>,
    num_words: u64,
    max_size: usize,
}

impl FrequencyTable {
    /// Create an empty table with `capacity` slots for words of
    /// `word_size` bits.
    ///
    /// # Errors
    /// - [`HuffmanError::InvalidValue`] if `word_size` is not in `2..=64`, or
    ///   `capacity` is zero or larger than [`max_table_size`]`(word_size)`;
    /// - [`HuffmanError::InsufficientSpace`] if the slots cannot be
    ///   allocated.
    pub fn new(word_size: u8, capacity: usize) -> Result<Self> {
        if !(MIN_WORD_SIZE..=MAX_WORD_SIZE).contains(&word_size) {
            return Err(HuffmanError::InvalidValue("word size must be in 2..=64"));
        }
        let max_size = max_table_size(word_size);
        if capacity == 0 || capacity > max_size {
            return Err(HuffmanError::InvalidValue(
                "capacity must be positive and at most the number of possible words",
            ));
        }
        Ok(Self {
            slots: alloc_slots(capacity)?,
            num_words: 0,
            max_size,
        })
    }

    /// Return the number of slots.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Return the number of slots beyond which the table does not grow.
    #[inline(always)]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Return the number of distinct words in the table.
    #[inline(always)]
    pub fn num_words(&self) -> u64 {
        self.num_words
    }

    /// Return whether no word has been counted yet.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.num_words == 0
    }

    /// Return the slot of index `index`, or `None` if `index` is out of
    /// bounds.
    #[inline]
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Return the index of the first slot, starting from the home slot of
    /// `id`, that is empty or (unless `assume_no_match` is true) holds `id`.
    ///
    /// Passing `assume_no_match` skips the id comparison when the caller
    /// knows that `id` is not in the table, as it happens during a resize.
    ///
    /// # Errors
    /// [`HuffmanError::InsufficientSpace`] if no slot qualifies, that is, the
    /// table is full and does not contain `id`.
    pub fn lookup_or_empty(&self, id: u64, assume_no_match: bool) -> Result<usize> {
        probe(&self.slots, id, assume_no_match).ok_or(HuffmanError::InsufficientSpace)
    }

    /// Return the count of `word`, or `None` if it is not in the table.
    ///
    /// The table is not modified.
    pub fn get(&self, word: u64) -> Option<u64> {
        probe(&self.slots, word, false)
            .map(|i| self.slots[i])
            .filter(|slot| !slot.is_empty())
            .map(|slot| slot.count)
    }

    /// Grow the table to `new_size` slots, rehashing all words.
    ///
    /// The new slots are allocated before the old ones are released, so on
    /// error the table is left unchanged.
    ///
    /// # Errors
    /// - [`HuffmanError::InvalidValue`] if `new_size` is not larger than the
    ///   current size or exceeds [`max_size`](Self::max_size);
    /// - [`HuffmanError::InsufficientSpace`] if the slots cannot be
    ///   allocated.
    pub fn resize(&mut self, new_size: usize) -> Result<()> {
        let size = self.slots.len();
        if new_size == 0 || size == 0 || new_size <= size {
            return Err(HuffmanError::InvalidValue(
                "a table can only grow to a larger size",
            ));
        }
        if new_size > self.max_size {
            return Err(HuffmanError::InvalidValue(
                "new size exceeds the number of possible words",
            ));
        }

        let mut slots = alloc_slots(new_size)?;
        for slot in self.slots.iter().filter(|slot| !slot.is_empty()) {
            let i = probe(&slots, slot.id, true).ok_or(HuffmanError::InsufficientSpace)?;
            slots[i] = *slot;
        }
        self.slots = slots;

        debug!(
            old_size = size,
            new_size,
            num_words = self.num_words,
            "resized frequency table"
        );
        Ok(())
    }

    /// Count one more occurrence of `word`, and return its updated count.
    ///
    /// If the table is full, its size is doubled (but never beyond
    /// [`max_size`](Self::max_size)) and the insertion is retried once.
    ///
    /// # Errors
    /// - [`HuffmanError::InsufficientSpace`] if the table is full and cannot
    ///   grow;
    /// - [`HuffmanError::Overflow`] if the count of `word` is `u64::MAX`.
    pub fn add_or_increment(&mut self, word: u64) -> Result<u64> {
        let i = match self.lookup_or_empty(word, false) {
            Ok(i) => i,
            Err(HuffmanError::InsufficientSpace) => {
                let size = self.slots.len();
                if size >= self.max_size {
                    return Err(HuffmanError::InsufficientSpace);
                }
                self.resize(size.saturating_mul(2).min(self.max_size))?;
                self.lookup_or_empty(word, false)?
            }
            Err(e) => return Err(e),
        };

        let slot = &mut self.slots[i];
        let count = slot.count.checked_add(1).ok_or(HuffmanError::Overflow)?;
        if slot.is_empty() {
            self.num_words = self
                .num_words
                .checked_add(1)
                .ok_or(HuffmanError::Overflow)?;
            slot.id = word;
        }
        slot.count = count;
        Ok(count)
    }

    /// Return an iterator over the occupied slots, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.slots.iter().filter(|slot| !slot.is_empty())
    }

    /// Return the total number of occurrences counted.
    pub fn total_count(&self) -> u64 {
        self.iter().map(|slot| slot.count).sum()
    }

    /// Return the `(word, count)` pairs sorted by decreasing count, breaking
    /// ties by increasing word.
    ///
    /// The position of a word in this list is its index in the
    /// [word mappings](crate::codes::mapping).
    pub fn ranked(&self) -> Vec<(u64, u64)> {
        let mut ranked: Vec<_> = self.iter().map(|slot| (slot.id, slot.count)).collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TEST_TABLE_SIZE: u64 = 20;

    /// A table of [`TEST_TABLE_SIZE`] slots for bytes.
    fn test_table() -> FrequencyTable {
        FrequencyTable::new(8, TEST_TABLE_SIZE as usize).unwrap()
    }

    /// Store `count` occurrences of `id` in the slot returned by a lookup
    /// that assumes `id` is absent, as a resize would.
    fn place(table: &mut FrequencyTable, id: u64, count: u64) {
        let i = table.lookup_or_empty(id, true).unwrap();
        table.slots[i] = Slot { id, count };
        table.num_words += 1;
    }

    #[test]
    fn test_max_table_size() {
        assert_eq!(max_table_size(2), 4);
        assert_eq!(max_table_size(8), 256);
        assert_eq!(max_table_size(58), 1 << 58);
        assert_eq!(max_table_size(59), MAX_TABLE_SIZE);
        assert_eq!(max_table_size(64), MAX_TABLE_SIZE);
    }

    #[test]
    fn test_new_errors() {
        assert!(matches!(
            FrequencyTable::new(1, 1),
            Err(HuffmanError::InvalidValue(_))
        ));
        assert!(matches!(
            FrequencyTable::new(65, 1),
            Err(HuffmanError::InvalidValue(_))
        ));
        assert!(matches!(
            FrequencyTable::new(8, 0),
            Err(HuffmanError::InvalidValue(_))
        ));
        assert!(matches!(
            FrequencyTable::new(2, 5),
            Err(HuffmanError::InvalidValue(_))
        ));
        let table = FrequencyTable::new(2, 4).unwrap();
        assert_eq!(table.size(), 4);
        assert_eq!(table.max_size(), 4);
        assert!(table.is_empty());
    }

    #[test]
    fn test_lookup_full_table() {
        let mut table = test_table();
        for i in 0..TEST_TABLE_SIZE {
            place(&mut table, i + 1, i + 1);
        }
        assert_eq!(
            table.lookup_or_empty(TEST_TABLE_SIZE * 5, false),
            Err(HuffmanError::InsufficientSpace)
        );
        assert_eq!(
            table.lookup_or_empty(3, true),
            Err(HuffmanError::InsufficientSpace)
        );
        assert_eq!(table.lookup_or_empty(3, false), Ok(3));
        assert_eq!(table.get(TEST_TABLE_SIZE * 5), None);
    }

    #[test]
    fn test_lookup() {
        // every slot taken, with clustered home slots
        let mut table = test_table();
        for i in 0..TEST_TABLE_SIZE {
            place(&mut table, i * 10 / 3, i + 1);
        }
        for i in 0..TEST_TABLE_SIZE {
            let slot = table.slots[table.lookup_or_empty(i * 10 / 3, false).unwrap()];
            assert_eq!(slot, Slot { id: i * 10 / 3, count: i + 1 });
        }

        // half the slots taken
        let mut table = test_table();
        for i in 0..TEST_TABLE_SIZE / 2 {
            place(&mut table, i * 10 / 3 + 3, TEST_TABLE_SIZE - i);
        }
        for i in 0..TEST_TABLE_SIZE / 2 {
            let slot = table.slots[table.lookup_or_empty(i * 10 / 3 + 3, false).unwrap()];
            assert_eq!(
                slot,
                Slot {
                    id: i * 10 / 3 + 3,
                    count: TEST_TABLE_SIZE - i
                }
            );
            let slot = table.slots[table.lookup_or_empty(i * 10 / 3 + 2, false).unwrap()];
            assert!(slot.is_empty());
            assert_eq!(slot, Slot::default());
        }
    }

    #[test]
    fn test_resize_errors() {
        let mut table = test_table();
        let size = TEST_TABLE_SIZE as usize;
        for new_size in [0, size - 1, size, 257] {
            assert!(matches!(
                table.resize(new_size),
                Err(HuffmanError::InvalidValue(_))
            ));
        }
        assert_eq!(table.size(), size);

        let mut table = FrequencyTable {
            slots: Vec::new(),
            num_words: 0,
            max_size: 256,
        };
        assert!(matches!(
            table.resize(size),
            Err(HuffmanError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_resize() {
        let new_size = TEST_TABLE_SIZE as usize + 3;

        // full table
        let mut table = test_table();
        for i in 0..TEST_TABLE_SIZE {
            place(&mut table, i * 10 / 3, i + 1);
        }
        table.resize(new_size).unwrap();
        assert_eq!(table.size(), new_size);
        assert_eq!(table.num_words(), TEST_TABLE_SIZE);
        for i in 0..TEST_TABLE_SIZE {
            assert_eq!(table.get(i * 10 / 3), Some(i + 1));
            let slot = table.slots[table.lookup_or_empty(i * 10 / 3 + 1, false).unwrap()];
            assert!(slot.is_empty());
        }

        // half-full table
        let mut table = test_table();
        for i in 0..TEST_TABLE_SIZE / 2 {
            place(&mut table, i * 10 / 3 + 3, TEST_TABLE_SIZE - i);
        }
        table.resize(new_size).unwrap();
        assert_eq!(table.size(), new_size);
        for i in 0..TEST_TABLE_SIZE / 2 {
            assert_eq!(table.get(i * 10 / 3 + 3), Some(TEST_TABLE_SIZE - i));
            assert_eq!(table.get(i * 10 / 3 + 2), None);
        }
    }

    #[test]
    fn test_add_or_increment() {
        let mut table = FrequencyTable::new(8, 1).unwrap();
        assert_eq!(table.add_or_increment(5).unwrap(), 1);
        assert_eq!(table.add_or_increment(5).unwrap(), 2);
        assert_eq!(table.size(), 1);

        // growth by doubling
        assert_eq!(table.add_or_increment(0).unwrap(), 1);
        assert_eq!(table.size(), 2);
        assert_eq!(table.add_or_increment(200).unwrap(), 1);
        assert_eq!(table.size(), 4);
        assert_eq!(table.num_words(), 3);
        assert_eq!(table.total_count(), 4);
        assert_eq!(table.get(0), Some(1));
        assert_eq!(table.get(5), Some(2));
    }

    #[test]
    fn test_add_or_increment_max_size() {
        let mut table = FrequencyTable::new(2, 3).unwrap();
        for word in 0..3 {
            table.add_or_increment(word).unwrap();
        }
        // growth is capped
        table.add_or_increment(3).unwrap();
        assert_eq!(table.size(), 4);
        assert_eq!(table.size(), table.max_size());
        // a word that does not fit in two bits has no room
        assert_eq!(
            table.add_or_increment(4),
            Err(HuffmanError::InsufficientSpace)
        );
        for word in 0..4 {
            assert_eq!(table.add_or_increment(word).unwrap(), 2);
        }
        assert_eq!(table.num_words(), 4);
    }

    #[test]
    fn test_overflow() {
        let mut table = FrequencyTable::new(8, 4).unwrap();
        place(&mut table, 9, u64::MAX);
        assert_eq!(table.add_or_increment(9), Err(HuffmanError::Overflow));
        assert_eq!(table.get(9), Some(u64::MAX));
        assert_eq!(table.num_words(), 1);
    }

    #[test]
    fn test_ranked() {
        let mut table = FrequencyTable::new(16, 2).unwrap();
        for word in [40, 2, 40, 7, 2, 1000, 40, 9] {
            table.add_or_increment(word).unwrap();
        }
        assert_eq!(
            table.ranked(),
            vec![(40, 3), (2, 2), (7, 1), (9, 1), (1000, 1)]
        );
        assert_eq!(table.iter().count(), 5);
        assert_eq!(table.total_count(), 8);
        assert!(table.slot(table.size()).is_none());
    }
}
