use std::collections::HashMap;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::types::{hash_with_domain, Digest};

/// Tree depth: one level per bit of the 256-bit key.
/// Every digest is a valid key, so the map never needs rebalancing or
/// collision handling — a key IS its path.
pub const DEPTH: usize = 256;

/// The leaf digest of an unset key. Mirrors the sparse-map convention of
/// "absent means the zero leaf".
pub const EMPTY_LEAF: Digest = [0u8; 32];

/// Hash two child digests into their parent node.
pub fn hash_nodes(left: &Digest, right: &Digest) -> Digest {
    let mut payload = [0u8; 64];
    payload[..32].copy_from_slice(left);
    payload[32..].copy_from_slice(right);
    hash_with_domain(b"opal/node", &payload)
}

/// A sparse Merkle map from 32-byte keys to 32-byte leaf digests.
///
/// Only non-empty nodes are materialized; absent subtrees contribute
/// precomputed empty-subtree hashes. The root authenticates the entire
/// key space: changing any leaf changes the root.
#[derive(Clone, Debug)]
pub struct MerkleMap {
    /// Materialized nodes, keyed by (level, index-within-level).
    /// Level 0 holds leaves; level `DEPTH` holds only the root at index 0.
    nodes: HashMap<(usize, U256), Digest>,
    /// Empty-subtree hash per level: `empty[0]` is the empty leaf,
    /// `empty[l + 1] = H(empty[l], empty[l])`.
    empty: Vec<Digest>,
    root: Digest,
}

impl Default for MerkleMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MerkleMap {
    /// Create an empty map. The root of an empty map is deterministic and
    /// identical across instances.
    pub fn new() -> Self {
        let mut empty = Vec::with_capacity(DEPTH + 1);
        empty.push(EMPTY_LEAF);
        for level in 0..DEPTH {
            let node = hash_nodes(&empty[level], &empty[level]);
            empty.push(node);
        }
        let root = empty[DEPTH];
        Self {
            nodes: HashMap::new(),
            empty,
            root,
        }
    }

    /// The current root digest.
    pub fn root(&self) -> Digest {
        self.root
    }

    /// Read the leaf digest stored under a key, or the empty leaf if unset.
    pub fn get(&self, key: Digest) -> Digest {
        self.node(0, U256::from_be_bytes(key))
    }

    /// Write a leaf digest and recompute every ancestor up to the root.
    /// Returns the new root.
    pub fn set(&mut self, key: Digest, leaf: Digest) -> Digest {
        let mut index = U256::from_be_bytes(key);
        let mut current = leaf;
        self.nodes.insert((0, index), leaf);

        for level in 0..DEPTH {
            let sibling = self.node(level, index ^ U256::from(1u8));
            current = if index.bit(0) {
                hash_nodes(&sibling, &current)
            } else {
                hash_nodes(&current, &sibling)
            };
            index >>= 1usize;
            self.nodes.insert((level + 1, index), current);
        }

        self.root = current;
        self.root
    }

    /// Produce a membership witness for a key against the current root.
    /// The witness is valid for whatever leaf is (or is not) stored there;
    /// pairing it with a claimed leaf digest is the verifier's job.
    pub fn witness(&self, key: Digest) -> MerkleMapWitness {
        let mut index = U256::from_be_bytes(key);
        let mut siblings = Vec::with_capacity(DEPTH);
        let mut path = Vec::with_capacity(DEPTH);

        for level in 0..DEPTH {
            siblings.push(self.node(level, index ^ U256::from(1u8)));
            path.push(index.bit(0));
            index >>= 1usize;
        }

        MerkleMapWitness { siblings, path }
    }

    fn node(&self, level: usize, index: U256) -> Digest {
        self.nodes
            .get(&(level, index))
            .copied()
            .unwrap_or(self.empty[level])
    }
}

/// A Merkle path from one leaf up to the root: the sibling digest at every
/// level plus the direction taken.
///
/// The key is deliberately NOT part of the witness payload — it is
/// reconstituted from the path bits by `compute_root_and_key`, so a verifier
/// learns which key the prover actually walked, not which key they claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleMapWitness {
    /// Sibling digests, leaf level first.
    siblings: Vec<Digest>,
    /// Direction per level: true when the walked node is the right child.
    path: Vec<bool>,
}

impl MerkleMapWitness {
    /// Fold a claimed leaf digest up the path, returning the root this
    /// witness commits to and the key encoded by its direction bits.
    ///
    /// Never fails: a tampered witness simply produces a root or key that
    /// matches nothing the verifier trusts.
    pub fn compute_root_and_key(&self, leaf: Digest) -> (Digest, Digest) {
        let mut current = leaf;
        let mut key = U256::ZERO;

        for (level, (sibling, is_right)) in self.siblings.iter().zip(&self.path).enumerate() {
            if *is_right {
                current = hash_nodes(sibling, &current);
                key |= U256::from(1u8) << level;
            } else {
                current = hash_nodes(&current, sibling);
            }
        }

        let key_bytes: [u8; 32] = key.to_be_bytes();
        (current, key_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const KEY_A: Digest = hex!("00000000000000000000000000000000000000000000000000000000000000aa");
    const KEY_B: Digest = hex!("00000000000000000000000000000000000000000000000000000000000000bb");
    const LEAF_1: Digest = hex!("1111111111111111111111111111111111111111111111111111111111111111");
    const LEAF_2: Digest = hex!("2222222222222222222222222222222222222222222222222222222222222222");

    #[test]
    fn test_empty_root_is_stable() {
        assert_eq!(MerkleMap::new().root(), MerkleMap::new().root());
    }

    #[test]
    fn test_set_changes_root() {
        let mut map = MerkleMap::new();
        let empty_root = map.root();
        let new_root = map.set(KEY_A, LEAF_1);
        assert_ne!(new_root, empty_root);
        assert_eq!(map.root(), new_root);
        assert_eq!(map.get(KEY_A), LEAF_1);
        assert_eq!(map.get(KEY_B), EMPTY_LEAF);
    }

    #[test]
    fn test_overwrite_changes_root() {
        let mut map = MerkleMap::new();
        let root_1 = map.set(KEY_A, LEAF_1);
        let root_2 = map.set(KEY_A, LEAF_2);
        assert_ne!(root_1, root_2);
        assert_eq!(map.get(KEY_A), LEAF_2);
    }

    #[test]
    fn test_witness_recomputes_root_and_key() {
        let mut map = MerkleMap::new();
        map.set(KEY_A, LEAF_1);
        map.set(KEY_B, LEAF_2);

        let witness = map.witness(KEY_A);
        let (computed_root, computed_key) = witness.compute_root_and_key(LEAF_1);
        assert_eq!(computed_root, map.root());
        assert_eq!(computed_key, KEY_A);
    }

    #[test]
    fn test_witness_with_wrong_leaf_diverges() {
        let mut map = MerkleMap::new();
        map.set(KEY_A, LEAF_1);

        let witness = map.witness(KEY_A);
        let (computed_root, computed_key) = witness.compute_root_and_key(LEAF_2);
        // Key reconstruction only depends on the path, so it still matches...
        assert_eq!(computed_key, KEY_A);
        // ...but the root does not.
        assert_ne!(computed_root, map.root());
    }

    #[test]
    fn test_witness_for_unset_key_proves_absence() {
        let mut map = MerkleMap::new();
        map.set(KEY_A, LEAF_1);

        // A witness for an unset key folds the empty leaf to the true root.
        let witness = map.witness(KEY_B);
        let (computed_root, computed_key) = witness.compute_root_and_key(EMPTY_LEAF);
        assert_eq!(computed_root, map.root());
        assert_eq!(computed_key, KEY_B);
    }

    #[test]
    fn test_witness_goes_stale_after_other_updates() {
        let mut map = MerkleMap::new();
        map.set(KEY_A, LEAF_1);
        let stale = map.witness(KEY_A);

        map.set(KEY_B, LEAF_2);
        let (stale_root, _) = stale.compute_root_and_key(LEAF_1);
        assert_ne!(stale_root, map.root());

        let fresh = map.witness(KEY_A);
        let (fresh_root, _) = fresh.compute_root_and_key(LEAF_1);
        assert_eq!(fresh_root, map.root());
    }
}
