//! The authenticated state layer: a sparse Merkle map, a canonical value
//! codec, and typed store handles with default-on-miss reads.

pub mod codec;
pub mod merkle_map;
pub mod state;

pub use codec::StateValue;
pub use merkle_map::{MerkleMap, MerkleMapWitness};
pub use state::{AuthenticatedStore, StateCell, StateMap, StateProof};
