/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Codes for word indices.

Once a [`FrequencyTable`](crate::table::FrequencyTable) has been built, each
word is identified by its index in the
[ranking](crate::table::FrequencyTable::ranked), 0 being the most frequent
word. A [`WordMapping`] turns indices into prefix-free codewords; the first
few codewords of the mappings in this module are:

| Index | [`OneHot`] | [`FixedDepthTree`] (depth 1) |
|-------|-----------:|-----------------------------:|
| 0     |          1 |                            1 |
| 1     |         01 |                          011 |
| 2     |        001 |                          010 |
| 3     |       0001 |                         0011 |
| 4     |      00001 |                         0010 |
| 5     |     000001 |                        00011 |

Codewords are written to a [`BitWrite`](crate::traits::BitWrite) and read
from a [`BitRead`](crate::traits::BitRead); reading needs the number of
unique words, which is stored in the
[`HuffmanHeader`](crate::header::HuffmanHeader), to reject indices that do
not correspond to any word.

*/

pub mod mapping;
pub use mapping::{FixedDepthTree, OneHot, WordMapping};
