//! Canonical CBOR encoder.
//!
//! Arguments below 24 are packed into the initial byte. Larger arguments use
//! the smallest of the 1, 2, 4 or 8 byte extended forms that holds them.

use crate::bitstring::BitString;
use crate::cbor::{MajorType, FALSE, NULL, TRUE};
use crate::error::EncodingError;

/// Write the initial byte and argument for `major`.
fn write_header(out: &mut Vec<u8>, major: MajorType, argument: u64) {
    let bits = major.initial_bits();
    if argument < 24 {
        out.push(bits | argument as u8);
    } else if argument <= u64::from(u8::MAX) {
        out.push(bits | 24);
        out.push(argument as u8);
    } else if argument <= u64::from(u16::MAX) {
        out.push(bits | 25);
        out.extend_from_slice(&(argument as u16).to_be_bytes());
    } else if argument <= u64::from(u32::MAX) {
        out.push(bits | 26);
        out.extend_from_slice(&(argument as u32).to_be_bytes());
    } else {
        out.push(bits | 27);
        out.extend_from_slice(&argument.to_be_bytes());
    }
}

fn header(major: MajorType, argument: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    write_header(&mut out, major, argument);
    out
}

fn checked_u64(value: i128) -> Result<u64, EncodingError> {
    if value < 0 {
        return Err(EncodingError::NegativeValue { value });
    }
    u64::try_from(value).map_err(|_| EncodingError::Overflow { value })
}

/// Encode an unsigned integer (major type 0).
///
/// # Errors
///
/// `NegativeValue` for values below zero, `Overflow` above `u64::MAX`.
pub fn encode_unsigned_integer(value: impl Into<i128>) -> Result<Vec<u8>, EncodingError> {
    Ok(encode_uint(checked_u64(value.into())?))
}

pub(crate) fn encode_uint(value: u64) -> Vec<u8> {
    header(MajorType::UnsignedInteger, value)
}

/// Encode a byte string (major type 2).
pub fn encode_byte_string(bytes: &[u8]) -> Vec<u8> {
    let mut out = header(MajorType::ByteString, bytes.len() as u64);
    out.extend_from_slice(bytes);
    out
}

/// Encode a UTF-8 text string (major type 3).
pub fn encode_text_string(text: &str) -> Vec<u8> {
    let mut out = header(MajorType::TextString, text.len() as u64);
    out.extend_from_slice(text.as_bytes());
    out
}

/// Encode an array (major type 4) from already-encoded items.
pub fn encode_array<T: AsRef<[u8]>>(items: &[T]) -> Vec<u8> {
    let body: usize = items.iter().map(|item| item.as_ref().len()).sum();
    let mut out = Vec::with_capacity(9 + body);
    write_header(&mut out, MajorType::Array, items.len() as u64);
    for item in items {
        out.extend_from_slice(item.as_ref());
    }
    out
}

/// Encode a tag (major type 6) wrapping an already-encoded item.
///
/// # Errors
///
/// `NegativeValue` or `Overflow` when the tag number is out of range.
pub fn encode_tag(tag: impl Into<i128>, item: &[u8]) -> Result<Vec<u8>, EncodingError> {
    Ok(encode_tagged(checked_u64(tag.into())?, item))
}

pub(crate) fn encode_tagged(tag: u64, item: &[u8]) -> Vec<u8> {
    let mut out = header(MajorType::Tag, tag);
    out.extend_from_slice(item);
    out
}

/// Encode a map (major type 5) from already-encoded key/value pairs.
///
/// Entries are sorted by their encoded key bytes, so insertion order never
/// affects the output.
///
/// # Errors
///
/// `DuplicateMapKey` when two keys encode identically.
pub fn encode_map<I>(entries: I) -> Result<Vec<u8>, EncodingError>
where
    I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
{
    let mut entries: Vec<(Vec<u8>, Vec<u8>)> = entries.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(EncodingError::DuplicateMapKey {
            key: hex::encode(&pair[0].0),
        });
    }

    let mut out = header(MajorType::Map, entries.len() as u64);
    for (key, value) in entries {
        out.extend_from_slice(&key);
        out.extend_from_slice(&value);
    }
    Ok(out)
}

/// Encode `null`.
pub fn encode_null() -> Vec<u8> {
    vec![NULL]
}

/// Encode a boolean.
pub fn encode_boolean(value: bool) -> Vec<u8> {
    vec![if value { TRUE } else { FALSE }]
}

/// Encode a bit string as a byte string carrying an end-marker bit.
pub fn encode_bit_string(bits: &BitString) -> Vec<u8> {
    encode_byte_string(&bits.to_marked_bytes())
}
