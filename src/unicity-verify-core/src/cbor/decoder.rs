//! Canonical CBOR decoder.
//!
//! [`CborReader`] is a cursor over an immutable buffer. The free functions
//! in this module read exactly one item from a slice and reject trailing
//! bytes, which is what positional schema decoding needs: every element
//! returned by [`read_array`] is a complete item on its own.

use crate::bitstring::BitString;
use crate::cbor::{MajorType, FALSE, NULL, TRUE};
use crate::error::DecodeError;

/// Deepest nesting of arrays, maps and tags the decoder will walk.
pub const MAX_NESTING_DEPTH: usize = 64;

type Result<T> = std::result::Result<T, DecodeError>;

/// Initial byte plus argument of one item.
#[derive(Debug, Clone, Copy)]
struct Header {
    major: MajorType,
    argument: u64,
}

/// Cursor over a CBOR buffer.
#[derive(Debug, Clone)]
pub struct CborReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> CborReader<'a> {
    /// Create a reader positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current offset into the buffer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left after the cursor.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Whether the whole buffer has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail unless the whole buffer has been consumed.
    pub fn finish(&self) -> Result<()> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(DecodeError::malformed(
                self.position,
                format!("{} trailing bytes after item", self.remaining()),
            ))
        }
    }

    fn take(&mut self, count: u64) -> Result<&'a [u8]> {
        let available = self.remaining();
        let len = usize::try_from(count)
            .ok()
            .filter(|len| *len <= available)
            .ok_or(DecodeError::Truncated {
                offset: self.position,
                needed: count,
                available,
            })?;
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn peek(&self) -> Result<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or(DecodeError::Truncated {
                offset: self.position,
                needed: 1,
                available: 0,
            })
    }

    fn read_header(&mut self) -> Result<Header> {
        let offset = self.position;
        let initial = self.take(1)?[0];
        let major = MajorType::from_initial_byte(initial);
        let additional = initial & 0x1f;

        let argument = match additional {
            0..=23 => u64::from(additional),
            24..=27 => {
                let argument = self
                    .take(1 << (additional - 24))?
                    .iter()
                    .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
                check_minimal(major, additional, argument, offset)?;
                argument
            },
            28..=30 => {
                return Err(DecodeError::malformed(
                    offset,
                    format!("reserved additional info {additional}"),
                ))
            },
            _ if major.has_indefinite_form() => {
                return Err(DecodeError::IndefiniteLengthUnsupported { major, offset })
            },
            _ => {
                return Err(DecodeError::malformed(
                    offset,
                    format!("additional info 31 is not valid for {major}"),
                ))
            },
        };

        Ok(Header { major, argument })
    }

    /// Read the header of an item of major type `expected` and return its
    /// argument: the value, the length, the element or pair count, or the
    /// tag number.
    pub fn read_length(&mut self, expected: MajorType) -> Result<u64> {
        let offset = self.position;
        let actual = MajorType::from_initial_byte(self.peek()?);
        if actual != expected {
            return Err(DecodeError::MajorTypeMismatch {
                expected,
                actual,
                offset,
            });
        }
        Ok(self.read_header()?.argument)
    }

    /// Read an unsigned integer.
    pub fn read_unsigned_integer(&mut self) -> Result<u64> {
        self.read_length(MajorType::UnsignedInteger)
    }

    /// Read a byte string, borrowing its contents.
    pub fn read_byte_string(&mut self) -> Result<&'a [u8]> {
        let len = self.read_length(MajorType::ByteString)?;
        self.take(len)
    }

    /// Read a UTF-8 text string, borrowing its contents.
    pub fn read_text_string(&mut self) -> Result<&'a str> {
        let offset = self.position;
        let len = self.read_length(MajorType::TextString)?;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map_err(|e| DecodeError::malformed(offset, format!("invalid UTF-8: {e}")))
    }

    /// Read an array and return the raw bytes of each element.
    pub fn read_array(&mut self) -> Result<Vec<&'a [u8]>> {
        let count = self.read_length(MajorType::Array)?;
        let mut items = Vec::with_capacity(self.bounded_capacity(count, 1)?);
        for _ in 0..count {
            items.push(self.skip_nested(1)?);
        }
        Ok(items)
    }

    /// Read a map and return the raw bytes of each key and value.
    pub fn read_map(&mut self) -> Result<Vec<(&'a [u8], &'a [u8])>> {
        let count = self.read_length(MajorType::Map)?;
        let mut entries: Vec<(&'a [u8], &'a [u8])> =
            Vec::with_capacity(self.bounded_capacity(count, 2)?);
        for _ in 0..count {
            let offset = self.position;
            let key = self.skip_nested(1)?;
            check_key_order(entries.last().map(|(previous, _)| *previous), key, offset)?;
            let value = self.skip_nested(1)?;
            entries.push((key, value));
        }
        Ok(entries)
    }

    /// Read a tag number. The tagged item follows at the cursor.
    pub fn read_tag(&mut self) -> Result<u64> {
        self.read_length(MajorType::Tag)
    }

    /// Read a tag and require it to be `expected`.
    pub fn read_tagged(&mut self, expected: u64) -> Result<()> {
        let actual = self.read_tag()?;
        if actual != expected {
            return Err(DecodeError::UnexpectedTag { expected, actual });
        }
        Ok(())
    }

    /// Read `null`.
    pub fn read_null(&mut self) -> Result<()> {
        match self.read_simple()? {
            NULL => Ok(()),
            other => Err(DecodeError::malformed(
                self.position - 1,
                format!("expected null, found simple value 0x{other:02x}"),
            )),
        }
    }

    /// Read a boolean.
    pub fn read_boolean(&mut self) -> Result<bool> {
        match self.read_simple()? {
            TRUE => Ok(true),
            FALSE => Ok(false),
            other => Err(DecodeError::malformed(
                self.position - 1,
                format!("expected boolean, found simple value 0x{other:02x}"),
            )),
        }
    }

    fn read_simple(&mut self) -> Result<u8> {
        let offset = self.position;
        let initial = self.peek()?;
        let actual = MajorType::from_initial_byte(initial);
        if actual != MajorType::Simple {
            return Err(DecodeError::MajorTypeMismatch {
                expected: MajorType::Simple,
                actual,
                offset,
            });
        }
        self.read_header()?;
        Ok(initial)
    }

    /// Read a byte string holding an end-marked bit string.
    pub fn read_bit_string(&mut self) -> Result<BitString> {
        let offset = self.position;
        let bytes = self.read_byte_string()?;
        BitString::from_marked_bytes(bytes)
            .ok_or_else(|| DecodeError::malformed(offset, "bit string has no end marker"))
    }

    /// Read an optional value: `null` yields `None`, anything else is
    /// handed to `read`. The cursor advances past the item either way.
    pub fn read_optional<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<Option<T>> {
        if self.peek()? == NULL {
            self.position += 1;
            return Ok(None);
        }
        read(self).map(Some)
    }

    /// Skip one complete item and return its raw bytes.
    pub fn skip_item(&mut self) -> Result<&'a [u8]> {
        self.skip_nested(0)
    }

    fn skip_nested(&mut self, depth: usize) -> Result<&'a [u8]> {
        let start = self.position;
        self.skip(depth)?;
        Ok(&self.data[start..self.position])
    }

    fn skip(&mut self, depth: usize) -> Result<()> {
        if depth > MAX_NESTING_DEPTH {
            return Err(DecodeError::malformed(
                self.position,
                format!("nesting deeper than {MAX_NESTING_DEPTH}"),
            ));
        }

        let header = self.read_header()?;
        match header.major {
            MajorType::UnsignedInteger | MajorType::NegativeInteger | MajorType::Simple => {},
            MajorType::ByteString | MajorType::TextString => {
                self.take(header.argument)?;
            },
            MajorType::Array => {
                self.bounded_capacity(header.argument, 1)?;
                for _ in 0..header.argument {
                    self.skip(depth + 1)?;
                }
            },
            MajorType::Map => {
                self.bounded_capacity(header.argument, 2)?;
                let mut previous = None;
                for _ in 0..header.argument {
                    let offset = self.position;
                    let key = self.skip_nested(depth + 1)?;
                    check_key_order(previous, key, offset)?;
                    previous = Some(key);
                    self.skip(depth + 1)?;
                }
            },
            MajorType::Tag => self.skip(depth + 1)?,
        }
        Ok(())
    }

    /// Every item takes at least one byte, so a count larger than the
    /// remaining input can be rejected before allocating.
    fn bounded_capacity(&self, count: u64, items_per_entry: u64) -> Result<usize> {
        let needed = count.saturating_mul(items_per_entry);
        let available = self.remaining();
        if needed > available as u64 {
            return Err(DecodeError::Truncated {
                offset: self.position,
                needed,
                available,
            });
        }
        Ok(count as usize)
    }
}

/// Smallest argument each extended width (additional info 24 to 27) may carry.
const MINIMAL_ARGUMENT: [u64; 4] = [24, 0x100, 0x1_0000, 0x1_0000_0000];

/// Reject an argument written wider than needed. Simple values with
/// additional info 24 must be at least 32; the float widths are exempt.
fn check_minimal(major: MajorType, additional: u8, argument: u64, offset: usize) -> Result<()> {
    let minimum = match (major, additional) {
        (MajorType::Simple, 24) => 32,
        (MajorType::Simple, _) => return Ok(()),
        _ => MINIMAL_ARGUMENT[usize::from(additional - 24)],
    };
    if argument < minimum {
        return Err(DecodeError::malformed(
            offset,
            format!("argument {argument} not in shortest form (additional info {additional})"),
        ));
    }
    Ok(())
}

/// Map keys must be strictly increasing by encoded bytes.
fn check_key_order(previous: Option<&[u8]>, key: &[u8], offset: usize) -> Result<()> {
    match previous {
        Some(previous) if previous >= key => Err(DecodeError::malformed(
            offset,
            if previous == key {
                "duplicate map key"
            } else {
                "map keys not in canonical order"
            },
        )),
        _ => Ok(()),
    }
}

fn read_exact<'a, T>(
    data: &'a [u8],
    read: impl FnOnce(&mut CborReader<'a>) -> Result<T>,
) -> Result<T> {
    let mut reader = CborReader::new(data);
    let value = read(&mut reader)?;
    reader.finish()?;
    Ok(value)
}

/// Decode a buffer holding exactly one unsigned integer.
pub fn read_unsigned_integer(data: &[u8]) -> Result<u64> {
    read_exact(data, CborReader::read_unsigned_integer)
}

/// Decode a buffer holding exactly one byte string.
pub fn read_byte_string(data: &[u8]) -> Result<&[u8]> {
    read_exact(data, CborReader::read_byte_string)
}

/// Decode a buffer holding exactly one text string.
pub fn read_text_string(data: &[u8]) -> Result<&str> {
    read_exact(data, CborReader::read_text_string)
}

/// Decode a buffer holding exactly one array into raw element slices.
pub fn read_array(data: &[u8]) -> Result<Vec<&[u8]>> {
    read_exact(data, CborReader::read_array)
}

/// Decode a buffer holding exactly one map into raw key/value slices.
pub fn read_map(data: &[u8]) -> Result<Vec<(&[u8], &[u8])>> {
    read_exact(data, CborReader::read_map)
}

/// Decode a buffer holding exactly one tagged item.
pub fn read_tag(data: &[u8]) -> Result<(u64, &[u8])> {
    read_exact(data, |reader| {
        let tag = reader.read_tag()?;
        let item = reader.skip_item()?;
        Ok((tag, item))
    })
}

/// Decode a buffer holding exactly `null`.
pub fn read_null(data: &[u8]) -> Result<()> {
    read_exact(data, CborReader::read_null)
}

/// Decode a buffer holding exactly one boolean.
pub fn read_boolean(data: &[u8]) -> Result<bool> {
    read_exact(data, CborReader::read_boolean)
}

/// Decode a buffer holding exactly one bit string.
pub fn read_bit_string(data: &[u8]) -> Result<BitString> {
    read_exact(data, CborReader::read_bit_string)
}

/// Decode an optional item: `null` yields `None`, anything else goes to `read`.
pub fn read_optional<'a, T>(
    data: &'a [u8],
    read: impl FnOnce(&'a [u8]) -> Result<T>,
) -> Result<Option<T>> {
    if data.first() == Some(&NULL) {
        read_null(data)?;
        return Ok(None);
    }
    read(data).map(Some)
}
