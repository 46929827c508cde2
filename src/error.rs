/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The error type shared by all the operations of this crate.

use thiserror::Error;

/// Errors returned by bit streams, the header codec and frequency tables.
///
/// Every operation either succeeds or returns one of these variants without
/// having modified the state of its arguments, with the exception of the
/// documented resize-and-retry in
/// [`FrequencyTable::add_or_increment`](crate::table::FrequencyTable::add_or_increment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HuffmanError {
    /// A parameter is outside its legal range; this is a bug in the caller.
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),
    /// The destination buffer, the source buffer or the table capacity is
    /// too small for the requested operation.
    #[error("Insufficient space to complete the operation")]
    InsufficientSpace,
    /// Parsed bits violate the format; the input is corrupt or
    /// non-conforming.
    #[error("Invalid data: {0}")]
    InvalidData(&'static str),
    /// A counter would exceed `u64::MAX`.
    #[error("Counter overflow")]
    Overflow,
}

/// Shorthand for results carrying a [`HuffmanError`].
pub type Result<T, E = HuffmanError> = core::result::Result<T, E>;
