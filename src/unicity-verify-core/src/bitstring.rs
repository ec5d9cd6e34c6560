//! Bit strings used as shard identifiers.
//!
//! On the wire a bit string is a byte string holding the bits most
//! significant first, followed by a single `1` end marker and zero padding
//! up to the byte boundary. The empty bit string is therefore `0x80`.

use std::fmt;

/// An ordered sequence of bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitString {
    /// Packed bits, most significant first, unused trailing bits zero.
    bytes: Vec<u8>,
    /// Number of meaningful bits.
    len: usize,
}

impl BitString {
    /// The empty bit string (a partition with a single shard).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from individual bits.
    #[must_use]
    pub fn from_bits(bits: &[bool]) -> Self {
        let mut bytes = vec![0u8; bits.len().div_ceil(8)];
        for (i, _) in bits.iter().enumerate().filter(|(_, bit)| **bit) {
            bytes[i / 8] |= 0x80 >> (i % 8);
        }
        Self {
            bytes,
            len: bits.len(),
        }
    }

    /// Parse the end-marker representation.
    ///
    /// Returns `None` when there is no marker bit (empty input or a zero
    /// last byte).
    #[must_use]
    pub fn from_marked_bytes(data: &[u8]) -> Option<Self> {
        let last = *data.last()?;
        if last == 0 {
            return None;
        }
        let padding = last.trailing_zeros() as usize + 1;
        let len = data.len() * 8 - padding;

        let mut bytes = data[..len.div_ceil(8)].to_vec();
        if len % 8 != 0 {
            if let Some(tail) = bytes.last_mut() {
                *tail &= 0xffu8 << (8 - len % 8);
            }
        }
        Some(Self { bytes, len })
    }

    /// Serialize with the end marker appended.
    #[must_use]
    pub fn to_marked_bytes(&self) -> Vec<u8> {
        let mut out = self.bytes.clone();
        if self.len % 8 == 0 {
            out.push(0x80);
        } else if let Some(tail) = out.last_mut() {
            *tail |= 0x80 >> (self.len % 8);
        }
        out
    }

    /// Number of bits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at `index`, counting from the most significant end.
    #[must_use]
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Iterate over the bits from the most significant end.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).filter_map(move |i| self.bit(i))
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("ε");
        }
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
