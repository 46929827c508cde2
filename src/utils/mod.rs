/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Integer helpers shared by the header codec and the frequency table.

*/

mod math;
pub use math::*;
