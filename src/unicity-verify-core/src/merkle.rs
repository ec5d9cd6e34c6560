//! Merkle path folding for the shard tree and the unicity tree.
//!
//! ```text
//! shard tree:    node = H(left || right)
//! unicity leaf:  H(LEAF_TAG || key || H(shard_root || pdr_hash))
//! unicity node:  H(NODE_TAG || split_key || left || right)
//! ```

use unicity_crypto::{sha256_concat, Hash};

use crate::bitstring::BitString;
use crate::certificate::HashStep;

/// Domain separator for unicity tree leaves.
pub const LEAF_TAG: u8 = 0x01;
/// Domain separator for unicity tree inner nodes.
pub const NODE_TAG: u8 = 0x00;

/// Hash two nodes to produce a shard tree parent.
#[must_use]
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    sha256_concat(&[&left[..], &right[..]])
}

/// Fold a shard tree sibling path.
///
/// Sibling `i` (counted from the leaf) pairs with shard-id bit
/// `len - 1 - i`; a set bit means the running hash is the right child.
/// Returns `None` if the path is not exactly as long as the shard id.
#[must_use]
pub fn shard_tree_root(leaf: Hash, shard: &BitString, siblings: &[Hash]) -> Option<Hash> {
    let depth = shard.len();
    if siblings.len() != depth {
        return None;
    }

    let mut current = leaf;
    for (i, sibling) in siblings.iter().enumerate() {
        current = if shard.bit(depth - 1 - i)? {
            hash_pair(sibling, &current)
        } else {
            hash_pair(&current, sibling)
        };
    }
    Some(current)
}

/// Hash the unicity tree leaf for a partition.
#[must_use]
pub fn unicity_leaf_hash(key: &[u8], shard_tree_root: &Hash, pdr_hash: &Hash) -> Hash {
    let data_hash = sha256_concat(&[&shard_tree_root[..], &pdr_hash[..]]);
    sha256_concat(&[&[LEAF_TAG][..], key, &data_hash[..]])
}

/// Fold an indexed tree path upwards from `leaf`.
///
/// Keys order the tree: when `key <= step.key` the running hash is on the
/// left of the step's node.
#[must_use]
pub fn index_tree_root(key: &[u8], leaf: Hash, steps: &[HashStep]) -> Hash {
    steps.iter().fold(leaf, |current, step| {
        if key <= step.key.as_slice() {
            sha256_concat(&[&[NODE_TAG][..], &step.key[..], &current[..], &step.hash[..]])
        } else {
            sha256_concat(&[&[NODE_TAG][..], &step.key[..], &step.hash[..], &current[..]])
        }
    })
}
