//! Deterministic CBOR codec.
//!
//! Every byte produced here may end up inside a hash that the root chain
//! signs, so encoding is canonical: definite lengths only, the shortest
//! argument width, and map entries sorted by their encoded key bytes.
//!
//! Decoding is positional. [`CborReader::read_array`] hands back the raw
//! byte range of each element and callers apply the reader the message
//! schema prescribes for that position.

mod decoder;
mod encoder;

use std::fmt;

use crate::error::{DecodeError, EncodingError};

pub use decoder::{
    read_array, read_bit_string, read_boolean, read_byte_string, read_map, read_null,
    read_optional, read_tag, read_text_string, read_unsigned_integer, CborReader,
    MAX_NESTING_DEPTH,
};
pub use encoder::{
    encode_array, encode_bit_string, encode_boolean, encode_byte_string, encode_map,
    encode_null, encode_tag, encode_text_string, encode_unsigned_integer,
};

pub(crate) use encoder::{encode_tagged, encode_uint};

/// Encoded `false`.
pub const FALSE: u8 = 0xf4;
/// Encoded `true`.
pub const TRUE: u8 = 0xf5;
/// Encoded `null`, the marker for absent optional values.
pub const NULL: u8 = 0xf6;

/// CBOR major type, the top three bits of the initial byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MajorType {
    /// Major type 0.
    UnsignedInteger = 0,
    /// Major type 1.
    NegativeInteger = 1,
    /// Major type 2.
    ByteString = 2,
    /// Major type 3.
    TextString = 3,
    /// Major type 4.
    Array = 4,
    /// Major type 5.
    Map = 5,
    /// Major type 6.
    Tag = 6,
    /// Major type 7: simple values, floats and `null`.
    Simple = 7,
}

impl MajorType {
    /// Extract the major type from an initial byte.
    #[must_use]
    pub const fn from_initial_byte(byte: u8) -> Self {
        match byte >> 5 {
            0 => Self::UnsignedInteger,
            1 => Self::NegativeInteger,
            2 => Self::ByteString,
            3 => Self::TextString,
            4 => Self::Array,
            5 => Self::Map,
            6 => Self::Tag,
            _ => Self::Simple,
        }
    }

    /// The major type shifted into initial-byte position.
    #[must_use]
    pub const fn initial_bits(self) -> u8 {
        (self as u8) << 5
    }

    /// Whether CBOR defines an indefinite-length form for this type.
    #[must_use]
    pub const fn has_indefinite_form(self) -> bool {
        matches!(
            self,
            Self::ByteString | Self::TextString | Self::Array | Self::Map
        )
    }
}

impl fmt::Display for MajorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnsignedInteger => "unsigned integer",
            Self::NegativeInteger => "negative integer",
            Self::ByteString => "byte string",
            Self::TextString => "text string",
            Self::Array => "array",
            Self::Map => "map",
            Self::Tag => "tag",
            Self::Simple => "simple value",
        };
        f.write_str(name)
    }
}

/// Types with a canonical CBOR encoding.
pub trait CborEncode {
    /// Encode to canonical CBOR bytes.
    fn to_cbor(&self) -> Result<Vec<u8>, EncodingError>;
}

/// Types decodable from exactly one CBOR item.
pub trait CborDecode: Sized {
    /// Decode from a buffer holding exactly one item.
    fn from_cbor(data: &[u8]) -> Result<Self, DecodeError>;
}
