//! Certificate data model.
//!
//! Immutable value objects decoded from the root chain's canonical CBOR.
//! Each type owns its positional schema: `from_cbor` reads the array,
//! checks the field count and applies the right reader per position;
//! `to_cbor` produces the exact canonical bytes that get hashed.

mod input_record;
mod proof;
mod seal;
mod shard_tree;
mod trust_base;
mod unicity_certificate;
mod unicity_tree;

use unicity_crypto::{hash_from_slice, Hash, HASH_LEN};

use crate::cbor::{
    encode_byte_string, encode_null, read_byte_string, read_optional, read_unsigned_integer,
    CborReader,
};
use crate::error::DecodeError;

pub use input_record::InputRecord;
pub use proof::{decode_hex, MerkleChainItem, TransactionProof, TransactionRecordWithProof};
pub use seal::UnicitySeal;
pub use shard_tree::ShardTreeCertificate;
pub use trust_base::{NodeInfo, TrustBase};
pub use unicity_certificate::UnicityCertificate;
pub use unicity_tree::{HashStep, UnicityTreeCertificate};

/// CBOR tag of a unicity seal.
pub const UNICITY_SEAL_TAG: u64 = 1001;
/// CBOR tag of a unicity certificate.
pub const UNICITY_CERTIFICATE_TAG: u64 = 1007;
/// CBOR tag of an input record.
pub const INPUT_RECORD_TAG: u64 = 1008;
/// CBOR tag of a unicity tree certificate.
pub const UNICITY_TREE_CERTIFICATE_TAG: u64 = 1014;

/// Read `tag(array)` holding exactly `fields` elements.
fn read_tagged_array<'a>(
    data: &'a [u8],
    tag: u64,
    fields: usize,
    what: &str,
) -> Result<Vec<&'a [u8]>, DecodeError> {
    let mut reader = CborReader::new(data);
    reader.read_tagged(tag)?;
    let items = reader.read_array()?;
    reader.finish()?;
    check_field_count(&items, fields, what)?;
    Ok(items)
}

/// Read an untagged array holding exactly `fields` elements.
fn read_fixed_array<'a>(
    data: &'a [u8],
    fields: usize,
    what: &str,
) -> Result<Vec<&'a [u8]>, DecodeError> {
    let items = crate::cbor::read_array(data)?;
    check_field_count(&items, fields, what)?;
    Ok(items)
}

fn check_field_count(items: &[&[u8]], fields: usize, what: &str) -> Result<(), DecodeError> {
    if items.len() != fields {
        return Err(DecodeError::malformed(
            0,
            format!("{what} has {} fields, expected {fields}", items.len()),
        ));
    }
    Ok(())
}

fn read_hash(data: &[u8]) -> Result<Hash, DecodeError> {
    let bytes = read_byte_string(data)?;
    hash_from_slice(bytes).ok_or_else(|| {
        DecodeError::malformed(
            0,
            format!("hash must be {HASH_LEN} bytes, got {}", bytes.len()),
        )
    })
}

fn read_optional_hash(data: &[u8]) -> Result<Option<Hash>, DecodeError> {
    read_optional(data, read_hash)
}

fn read_u32(data: &[u8], what: &str) -> Result<u32, DecodeError> {
    let value = read_unsigned_integer(data)?;
    u32::try_from(value)
        .map_err(|_| DecodeError::malformed(0, format!("{what} {value} exceeds 32 bits")))
}

fn encode_optional_hash(hash: Option<&Hash>) -> Vec<u8> {
    match hash {
        Some(hash) => encode_byte_string(hash),
        None => encode_null(),
    }
}
