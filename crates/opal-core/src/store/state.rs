use std::collections::HashMap;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::store::codec::StateValue;
use crate::store::merkle_map::{MerkleMap, MerkleMapWitness};
use crate::types::{hash_with_domain, Digest};

/// Hash a `(module, field, key)` triple into the slot digest that addresses
/// it in the authenticated tree. Lengths are encoded so no two triples can
/// share a byte layout.
fn slot_digest(module: &str, field: &str, key: &[u8]) -> Digest {
    let mut payload =
        Vec::with_capacity(24 + module.len() + field.len() + key.len());
    payload.extend_from_slice(&(module.len() as u64).to_be_bytes());
    payload.extend_from_slice(module.as_bytes());
    payload.extend_from_slice(&(field.len() as u64).to_be_bytes());
    payload.extend_from_slice(field.as_bytes());
    payload.extend_from_slice(&(key.len() as u64).to_be_bytes());
    payload.extend_from_slice(key);
    hash_with_domain(b"opal/slot", &payload)
}

/// Hash an encoded value into its leaf digest.
fn leaf_digest(encoded: &[u8]) -> Digest {
    hash_with_domain(b"opal/leaf", encoded)
}

/// The single authenticated key-value store every module writes into.
///
/// A sparse Merkle tree carries the commitment; a preimage table carries the
/// encoded values so reads can return more than a digest. The store is cheap
/// to clone, which is how the runtime snapshots it per call.
#[derive(Clone, Debug, Default)]
pub struct AuthenticatedStore {
    tree: MerkleMap,
    values: HashMap<Digest, Vec<u8>>,
}

impl AuthenticatedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root digest authenticating every slot in the store.
    pub fn root(&self) -> Digest {
        self.tree.root()
    }

    fn read(&self, slot: Digest) -> Option<&[u8]> {
        self.values.get(&slot).map(Vec::as_slice)
    }

    fn write(&mut self, slot: Digest, encoded: Vec<u8>) -> Digest {
        let leaf = leaf_digest(&encoded);
        self.values.insert(slot, encoded);
        self.tree.set(slot, leaf)
    }

    fn witness(&self, slot: Digest) -> MerkleMapWitness {
        self.tree.witness(slot)
    }
}

/// A membership proof for one store slot against a store root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateProof {
    witness: MerkleMapWitness,
}

/// A typed map handle over the authenticated store: one `(module, field)`
/// namespace, keys and values with canonical encodings.
///
/// The handle holds no data — all state lives in the store — so modules stay
/// plain structs of configuration plus handles.
#[derive(Clone, Copy, Debug)]
pub struct StateMap<K, V> {
    module: &'static str,
    field: &'static str,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K: StateValue, V: StateValue> StateMap<K, V> {
    pub const fn new(module: &'static str, field: &'static str) -> Self {
        Self {
            module,
            field,
            _marker: PhantomData,
        }
    }

    /// Read the value under a key together with a proof of what was read.
    /// Absent keys read as `V::default()` — the sparse-map convention the
    /// ledger semantics rely on (zero balance, unclaimed flag). Value types
    /// with no meaningful default (certificates) read through `get_option`.
    pub fn get(&self, store: &AuthenticatedStore, key: &K) -> (V, StateProof)
    where
        V: Default,
    {
        let slot = self.slot(key);
        let value = store
            .read(slot)
            .and_then(V::decode)
            // Slots are only ever written through `set`, so a present value
            // always decodes; a miss is the genuine default case.
            .unwrap_or_default();
        let proof = StateProof {
            witness: store.witness(slot),
        };
        (value, proof)
    }

    /// Read the value under a key, distinguishing "absent" from "default".
    pub fn get_option(&self, store: &AuthenticatedStore, key: &K) -> Option<V> {
        store.read(self.slot(key)).and_then(V::decode)
    }

    /// Write a value, returning the new store root.
    pub fn set(&self, store: &mut AuthenticatedStore, key: &K, value: &V) -> Digest {
        store.write(self.slot(key), value.encode())
    }

    /// Check a claimed key-value pair against a published store root.
    /// Any mismatch — wrong value, wrong key, wrong root — returns `false`;
    /// this never fails with an error.
    pub fn verify(&self, proof: &StateProof, root: Digest, key: &K, value: &V) -> bool {
        let (computed_root, computed_key) =
            proof.witness.compute_root_and_key(leaf_digest(&value.encode()));
        computed_root == root && computed_key == self.slot(key)
    }

    fn slot(&self, key: &K) -> Digest {
        slot_digest(self.module, self.field, &key.encode())
    }
}

/// A typed single-slot handle: module-level scalars such as the circulating
/// supply or the airdrop commitment.
#[derive(Clone, Copy, Debug)]
pub struct StateCell<V> {
    module: &'static str,
    field: &'static str,
    _marker: PhantomData<fn() -> V>,
}

impl<V: StateValue + Default> StateCell<V> {
    pub const fn new(module: &'static str, field: &'static str) -> Self {
        Self {
            module,
            field,
            _marker: PhantomData,
        }
    }

    /// Read the cell, or `V::default()` if it was never written.
    pub fn get(&self, store: &AuthenticatedStore) -> (V, StateProof) {
        let slot = self.slot();
        let value = store.read(slot).and_then(V::decode).unwrap_or_default();
        let proof = StateProof {
            witness: store.witness(slot),
        };
        (value, proof)
    }

    /// Write the cell, returning the new store root.
    pub fn set(&self, store: &mut AuthenticatedStore, value: &V) -> Digest {
        store.write(self.slot(), value.encode())
    }

    /// Check a claimed cell value against a published store root.
    pub fn verify(&self, proof: &StateProof, root: Digest, value: &V) -> bool {
        let (computed_root, computed_key) =
            proof.witness.compute_root_and_key(leaf_digest(&value.encode()));
        computed_root == root && computed_key == self.slot()
    }

    fn slot(&self) -> Digest {
        slot_digest(self.module, self.field, &[])
    }
}
