//! Conversion between tags, bytes and the big-endian bit stream that is spread over pixels.
//!
//! Bits are produced most significant first per byte, bytes in order.
//! On the way back, a trailing group of less than 8 bits is dropped, never padded.
//! That matters because decoding always reads a fixed window of [`MAX_PAYLOAD_BITS`]
//! regardless of how long the hidden payload really was.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use std::io::Read;

use crate::error::QuantumStegoError;
use crate::result::Result;

/// upper bound of a payload, equals the fixed decode window
pub const MAX_PAYLOAD_BYTES: usize = 64;
pub const MAX_PAYLOAD_BITS: usize = MAX_PAYLOAD_BYTES * 8;

/// iterates the bits of any `Read` source, MSB first
pub struct BitIterator<R: Read> {
    reader: BitReader<R, BigEndian>,
}

impl<R: Read> BitIterator<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: BitReader::endian(source, BigEndian),
        }
    }
}

impl<R: Read> Iterator for BitIterator<R> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_bit().ok()
    }
}

pub fn to_bits(payload: &[u8]) -> Vec<bool> {
    BitIterator::new(payload).collect()
}

pub fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Vec<u8> {
    let mut writer = BitWriter::endian(Vec::new(), BigEndian);
    for bit in bits {
        if writer.write_bit(bit).is_err() {
            break;
        }
    }

    // partial bits that did not complete a byte are discarded here
    writer.into_writer()
}

/// maps every char of a tag onto exactly one byte, like a latin-1 encoding
pub fn tag_to_bytes(tag: &str) -> Result<Vec<u8>> {
    let bytes = tag
        .chars()
        .map(|c| u8::try_from(c).map_err(|_| QuantumStegoError::InvalidTagCharacter(c)))
        .collect::<Result<Vec<u8>>>()?;

    if bytes.len() > MAX_PAYLOAD_BYTES {
        return Err(QuantumStegoError::PayloadTooLong(
            bytes.len(),
            MAX_PAYLOAD_BYTES,
        ));
    }

    Ok(bytes)
}

/// inverse of [`tag_to_bytes`], every byte becomes the char with the same code point
pub fn bytes_to_tag(bytes: &[u8]) -> String {
    bytes.iter().map(|b| char::from(*b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_emit_msb_first() {
        // H = 0x48 = 0b0100_1000
        let bits = to_bits(b"H");
        assert_eq!(
            bits,
            vec![false, true, false, false, true, false, false, false]
        );
    }

    #[test]
    fn should_emit_eight_bits_per_byte_in_byte_order() {
        let bits = to_bits(&[0xff, 0x00]);
        assert_eq!(bits.len(), 16);
        assert!(bits[..8].iter().all(|b| *b));
        assert!(bits[8..].iter().all(|b| !*b));
    }

    #[test]
    fn should_drop_trailing_partial_byte() {
        let mut bits = to_bits(b"ok");
        bits.extend([true, true, true]);

        assert_eq!(from_bits(bits), b"ok".to_vec());
    }

    #[test]
    fn should_produce_nothing_for_less_than_a_byte() {
        assert!(from_bits(vec![true; 7]).is_empty());
    }

    #[test]
    fn should_map_high_code_points_consistently() {
        let tag = "a\u{e9}\u{ff}";
        let bytes = tag_to_bytes(tag).unwrap();
        assert_eq!(bytes, vec![0x61, 0xe9, 0xff]);
        assert_eq!(bytes_to_tag(&bytes), tag);
    }

    #[test]
    fn should_reject_chars_beyond_one_byte() {
        match tag_to_bytes("ψ") {
            Err(QuantumStegoError::InvalidTagCharacter('ψ')) => (),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn should_reject_payloads_beyond_the_read_window() {
        let tag = "f".repeat(MAX_PAYLOAD_BYTES + 1);
        match tag_to_bytes(&tag) {
            Err(QuantumStegoError::PayloadTooLong(65, 64)) => (),
            other => panic!("unexpected {other:?}"),
        }
        assert!(tag_to_bytes(&"f".repeat(MAX_PAYLOAD_BYTES)).is_ok());
    }
}
