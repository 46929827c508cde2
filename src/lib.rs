/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]

pub mod codes;
pub mod error;
pub mod header;
pub mod impls;
pub mod table;
pub mod traits;
pub mod utils;

/// Smallest supported word size, in bits.
pub const MIN_WORD_SIZE: u8 = 2;

/// Largest supported word size, in bits.
pub const MAX_WORD_SIZE: u8 = 64;

/// Prelude module to import everything from this crate
pub mod prelude {
    pub use crate::codes::*;
    pub use crate::error::*;
    pub use crate::header::*;
    pub use crate::impls::*;
    pub use crate::table::*;
    pub use crate::traits::*;
    pub use crate::utils::*;
    pub use crate::{MAX_WORD_SIZE, MIN_WORD_SIZE};
}
