/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Word frequency tables.

A [`FrequencyTable`] counts the occurrences of fixed-width words in a byte
stream. It is an open-addressing hash table with linear probing: the home
slot of a word `w` in a table of `s` slots is `w % s`, and the following
slots (wrapping around) are scanned until the word or an empty slot is
found. A slot is empty when its count is zero.

The table grows on demand, doubling its number of slots up to the number of
distinct words representable with the word size (but never beyond
[`MAX_TABLE_SIZE`]).

[`FrequencyTable::build`] scans a whole source and returns the table
together with the [`HuffmanHeader`](crate::header::HuffmanHeader)
describing it:

```
use huffword::prelude::*;

let source = [0x1B; 1024]; // 00 01 10 11
let (header, table) = FrequencyTable::build(&source, 2)?;

assert_eq!(header.unique_words, 4);
assert_eq!(header.pad_bits, 0);
for word in 0..4 {
    assert_eq!(table.get(word), Some(1024));
}
# Ok::<(), HuffmanError>(())
```

Plain modulo hashing clusters badly on structured inputs, such as words
that are multiples of the table size; it is kept because it makes the slot
of a word predictable.

*/

mod frequency_table;
pub use frequency_table::*;

mod build;
pub use build::*;

/// The largest number of slots of a table.
pub const MAX_TABLE_SIZE: usize = 1 << 59;

/// The largest number of slots allocated before the first word is seen.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 16;
