/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

The compressed-stream header.

A header is bit-packed MSB-first, with no padding between fields:

| field          | width                  | content              |
|----------------|------------------------|----------------------|
| word size      | 6                      | `w`, with 64 as `0`  |
| pad bits       | [`log2_ceil`]`(w)`     | `p`                  |
| unique words   | `w`                    | `u - 1`              |

The header thus occupies [`header_bits`]`(w)` bits, and the next section of
the stream starts at the bit immediately following it.

*/

use crate::error::{HuffmanError, Result};
use crate::impls::MemBitReader;
use crate::traits::*;
use crate::utils::log2_ceil;
use crate::{MAX_WORD_SIZE, MIN_WORD_SIZE};
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// Number of bits of the word-size field.
pub const WORD_SIZE_NUM_BITS: usize = 6;

/// Return the number of bits of a header with the given word size.
#[must_use]
#[inline]
pub fn header_bits(word_size: u8) -> usize {
    WORD_SIZE_NUM_BITS + log2_ceil(word_size) as usize + word_size as usize
}

/// The header of a compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HuffmanHeader {
    /// The size in bits of a word, in `2..=64`.
    pub word_size: u8,
    /// The number of bits appended to the last word of the source to
    /// complete it, in `0..word_size`.
    pub pad_bits: u8,
    /// The number of distinct words, in `1..=2^word_size`.
    pub unique_words: u64,
}

impl HuffmanHeader {
    /// Check that all fields are in range.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_WORD_SIZE..=MAX_WORD_SIZE).contains(&self.word_size) {
            return Err(HuffmanError::InvalidValue("word size must be in 2..=64"));
        }
        if self.pad_bits >= self.word_size {
            return Err(HuffmanError::InvalidValue(
                "pad bits must be smaller than the word size",
            ));
        }
        if self.unique_words == 0 {
            return Err(HuffmanError::InvalidValue("there must be at least one word"));
        }
        if self.word_size < 64 && self.unique_words > 1 << self.word_size {
            return Err(HuffmanError::InvalidValue(
                "unique words exceed the number of possible words",
            ));
        }
        Ok(())
    }

    /// Return the number of bits this header occupies.
    #[must_use]
    #[inline]
    pub fn bit_len(&self) -> usize {
        header_bits(self.word_size)
    }

    /// Write the header to `writer` and return the number of bits written.
    ///
    /// The fields are validated and the available space is checked before
    /// anything is written, so on error `writer` is left untouched.
    ///
    /// # Errors
    /// - [`HuffmanError::InvalidValue`] if a field is out of range;
    /// - [`HuffmanError::InsufficientSpace`] if `writer` cannot hold the
    ///   header.
    ///
    /// # Example
    /// ```
    /// use huffword::prelude::*;
    ///
    /// let header = HuffmanHeader { word_size: 2, pad_bits: 1, unique_words: 3 };
    /// let mut data = [0; 2];
    /// let mut writer = MemBitWriter::new(&mut data);
    /// assert_eq!(header.encode(&mut writer).unwrap(), 9);
    ///
    /// let mut reader = MemBitReader::new(&data);
    /// assert_eq!(HuffmanHeader::decode(&mut reader).unwrap(), header);
    /// assert_eq!((reader.byte_pos(), reader.bit_offset()), (1, 1));
    /// ```
    pub fn encode<W: BitWrite>(&self, writer: &mut W) -> Result<usize> {
        self.validate()?;
        let bits = self.bit_len();
        if bits as u64 > writer.remaining_bits() {
            return Err(HuffmanError::InsufficientSpace);
        }
        // 64 does not fit in the field and wraps to 0
        writer.write_bits(self.word_size as u64, WORD_SIZE_NUM_BITS)?;
        writer.write_bits(self.pad_bits as u64, log2_ceil(self.word_size) as usize)?;
        writer.write_bits(self.unique_words - 1, self.word_size as usize)?;
        Ok(bits)
    }

    /// Read a header from `reader`.
    ///
    /// The reader is advanced past the header only if decoding succeeds.
    ///
    /// # Errors
    /// - [`HuffmanError::InvalidValue`] if fewer than two bytes are left;
    /// - [`HuffmanError::InvalidData`] if the word size or the pad bits are
    ///   out of range;
    /// - [`HuffmanError::InsufficientSpace`] if the stream ends before the
    ///   header does.
    pub fn decode(reader: &mut MemBitReader<'_>) -> Result<Self> {
        if reader.remaining() < 2 {
            return Err(HuffmanError::InvalidValue(
                "a header needs at least two bytes",
            ));
        }
        let mut probe = *reader;

        let word_size = match probe.read_bits(WORD_SIZE_NUM_BITS)? as u8 {
            0 => MAX_WORD_SIZE,
            w if w < MIN_WORD_SIZE => {
                return Err(HuffmanError::InvalidData("word size must be in 2..=64"));
            }
            w => w,
        };
        if header_bits(word_size) as u64 > reader.remaining_bits() {
            return Err(HuffmanError::InsufficientSpace);
        }

        let pad_bits = probe.read_bits(log2_ceil(word_size) as usize)? as u8;
        if pad_bits >= word_size {
            return Err(HuffmanError::InvalidData(
                "pad bits must be smaller than the word size",
            ));
        }
        // u64::MAX + 1 is not representable; with 64-bit words it would mean
        // 2^64 distinct words, which no source can contain
        let unique_words = probe
            .read_bits(word_size as usize)?
            .checked_add(1)
            .ok_or(HuffmanError::InvalidData("unique words overflow"))?;

        *reader = probe;
        Ok(Self {
            word_size,
            pad_bits,
            unique_words,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::impls::MemBitWriter;

    /// Write the raw fields of a header, with no validation.
    fn write_raw(data: &mut [u8], word_size: u64, pad_bits: u64, unique_words: u64) {
        let mut writer = MemBitWriter::new(data);
        writer.write_bits(word_size, WORD_SIZE_NUM_BITS).unwrap();
        writer
            .write_bits(pad_bits, log2_ceil(word_size) as usize)
            .unwrap();
        writer
            .write_bits(unique_words - 1, word_size as usize)
            .unwrap();
    }

    #[test]
    fn test_encode() {
        for word_size in MIN_WORD_SIZE..=MAX_WORD_SIZE {
            let header = HuffmanHeader {
                word_size,
                pad_bits: word_size >> 1,
                unique_words: (word_size as u64 - 1) * word_size as u64,
            };
            let bits = header_bits(word_size);
            let mut data = [0; 128];
            let mut writer = MemBitWriter::new(&mut data);
            assert_eq!(header.encode(&mut writer).unwrap(), bits);
            assert_eq!(writer.byte_pos(), bits / 8);
            assert_eq!(writer.bit_offset() as usize, bits % 8);
            assert_eq!(writer.remaining(), 128 - bits / 8);

            let mut reader = MemBitReader::new(&data);
            assert_eq!(
                reader.read_bits(WORD_SIZE_NUM_BITS).unwrap(),
                word_size as u64 % 64
            );
            assert_eq!(
                reader
                    .read_bits(log2_ceil(word_size) as usize)
                    .unwrap(),
                header.pad_bits as u64
            );
            assert_eq!(
                reader.read_bits(word_size as usize).unwrap(),
                header.unique_words - 1
            );
        }
    }

    #[test]
    fn test_encode_errors() {
        let mut data = [0xA5_u8; 16];
        let mut header = HuffmanHeader {
            word_size: 1,
            pad_bits: 0,
            unique_words: 1,
        };
        let mut writer = MemBitWriter::new(&mut data);
        assert!(matches!(
            header.encode(&mut writer),
            Err(HuffmanError::InvalidValue(_))
        ));
        header.word_size = 65;
        assert!(matches!(
            header.encode(&mut writer),
            Err(HuffmanError::InvalidValue(_))
        ));
        header.word_size = 9;
        header.pad_bits = 9;
        assert!(matches!(
            header.encode(&mut writer),
            Err(HuffmanError::InvalidValue(_))
        ));
        header.word_size = 3;
        header.pad_bits = 0;
        header.unique_words = 9;
        assert!(matches!(
            header.encode(&mut writer),
            Err(HuffmanError::InvalidValue(_))
        ));
        header.unique_words = 0;
        assert!(matches!(
            header.encode(&mut writer),
            Err(HuffmanError::InvalidValue(_))
        ));
        assert_eq!(writer.bit_pos(), 0);

        // 6 + 4 + 9 = 19 bits
        header.word_size = 9;
        header.pad_bits = 3;
        header.unique_words = 1;
        for len in [0, 2] {
            let mut writer = MemBitWriter::new(&mut data[..len]);
            assert_eq!(
                header.encode(&mut writer),
                Err(HuffmanError::InsufficientSpace)
            );
        }
        // 6 + 6 + 60 = 72 bits
        header.word_size = 60;
        for len in [0, 2, 8] {
            let mut writer = MemBitWriter::new(&mut data[..len]);
            assert_eq!(
                header.encode(&mut writer),
                Err(HuffmanError::InsufficientSpace)
            );
        }
        // 72 bits from offset 1 need ten bytes
        let mut writer = MemBitWriter::with_position(&mut data[..9], 0, 1).unwrap();
        assert_eq!(
            header.encode(&mut writer),
            Err(HuffmanError::InsufficientSpace)
        );
        assert_eq!(data, [0xA5; 16]);
    }

    #[test]
    fn test_decode() {
        let mut data = [0; 128];

        // smallest header
        write_raw(&mut data, 2, 1, 3);
        let mut reader = MemBitReader::new(&data[..2]);
        assert_eq!(
            HuffmanHeader::decode(&mut reader).unwrap(),
            HuffmanHeader {
                word_size: 2,
                pad_bits: 1,
                unique_words: 3
            }
        );
        assert_eq!((reader.byte_pos(), reader.bit_offset()), (1, 1));
        assert_eq!(reader.remaining(), 1);

        // ending on a byte boundary
        write_raw(&mut data, 14, 10, 0x53C);
        let mut reader = MemBitReader::new(&data[..3]);
        assert_eq!(
            HuffmanHeader::decode(&mut reader).unwrap(),
            HuffmanHeader {
                word_size: 14,
                pad_bits: 10,
                unique_words: 0x53C
            }
        );
        assert_eq!((reader.byte_pos(), reader.bit_offset()), (3, 0));
        assert_eq!(reader.remaining(), 0);

        // ending inside a byte
        write_raw(&mut data, 24, 13, 0x94F);
        let mut reader = MemBitReader::new(&data[..5]);
        assert_eq!(
            HuffmanHeader::decode(&mut reader).unwrap(),
            HuffmanHeader {
                word_size: 24,
                pad_bits: 13,
                unique_words: 0x94F
            }
        );
        assert_eq!((reader.byte_pos(), reader.bit_offset()), (4, 3));
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn test_decode_errors() {
        let mut data = [0; 128];

        let mut reader = MemBitReader::new(&data[..1]);
        assert!(matches!(
            HuffmanHeader::decode(&mut reader),
            Err(HuffmanError::InvalidValue(_))
        ));

        // a word size of 1
        MemBitWriter::new(&mut data)
            .write_bits(1, WORD_SIZE_NUM_BITS)
            .unwrap();
        let mut reader = MemBitReader::new(&data);
        assert!(matches!(
            HuffmanHeader::decode(&mut reader),
            Err(HuffmanError::InvalidData(_))
        ));
        assert_eq!(reader.bit_pos(), 0);

        // pad bits larger than the word size
        let mut writer = MemBitWriter::new(&mut data);
        writer.write_bits(5, WORD_SIZE_NUM_BITS).unwrap();
        writer.write_bits(6, 3).unwrap();
        let mut reader = MemBitReader::new(&data);
        assert!(matches!(
            HuffmanHeader::decode(&mut reader),
            Err(HuffmanError::InvalidData(_))
        ));
        assert_eq!(reader.bit_pos(), 0);

        // 6 + 4 + 14 = 24 bits
        MemBitWriter::new(&mut data)
            .write_bits(14, WORD_SIZE_NUM_BITS)
            .unwrap();
        let mut reader = MemBitReader::new(&data[..2]);
        assert_eq!(
            HuffmanHeader::decode(&mut reader),
            Err(HuffmanError::InsufficientSpace)
        );
        // 6 + 5 + 23 = 34 bits
        MemBitWriter::new(&mut data)
            .write_bits(23, WORD_SIZE_NUM_BITS)
            .unwrap();
        let mut reader = MemBitReader::new(&data[..4]);
        assert_eq!(
            HuffmanHeader::decode(&mut reader),
            Err(HuffmanError::InsufficientSpace)
        );
        assert_eq!(reader.bit_pos(), 0);
    }

    #[test]
    fn test_round_trip() {
        for word_size in MIN_WORD_SIZE..=MAX_WORD_SIZE {
            for bit_offset in 0..8 {
                let max_unique = if word_size == 64 {
                    u64::MAX
                } else {
                    1 << word_size
                };
                for (pad_bits, unique_words) in [
                    (0, 1),
                    (word_size - 1, max_unique),
                    (word_size / 3, max_unique / 3 + 1),
                ] {
                    let header = HuffmanHeader {
                        word_size,
                        pad_bits,
                        unique_words,
                    };
                    let mut data = [0xFF; 16];
                    let mut writer =
                        MemBitWriter::with_position(&mut data, 1, bit_offset).unwrap();
                    header.encode(&mut writer).unwrap();
                    let end = writer.bit_pos();

                    let mut reader = MemBitReader::with_position(&data, 1, bit_offset).unwrap();
                    assert_eq!(HuffmanHeader::decode(&mut reader).unwrap(), header);
                    assert_eq!(reader.bit_pos(), end);
                    assert_eq!(end, 8 + bit_offset as u64 + header.bit_len() as u64);
                }
            }
        }
    }
}
