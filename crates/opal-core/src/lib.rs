//! # Opal Core
//!
//! Deterministic state-transition engine for a capped token ledger.
//!
//! This crate contains **no proving system** and **no networking** — it is
//! the state-machine heart of Opal. Every operation is a provable-style
//! transition: reads and writes go through one authenticated key-value store,
//! airdrop eligibility is checked with a Merkle witness against a published
//! commitment, and every failure is a precondition assertion that aborts the
//! call with the store untouched.
//!
//! ## Modules
//!
//! - **Balances** (`modules::balances`): address balances plus a circulating
//!   supply bounded by an immutable cap.
//! - **Airdrop** (`modules::airdrop`): a published commitment and per-address
//!   claim flags; claiming verifies a witness and credits the claimed amount.
//! - **SoulBound** (`modules::soulbound`): controller-issued, non-transferable
//!   certificates, at most one per address.
//!
//! Signing, proof generation, transaction pooling, and block sequencing are
//! external collaborators: the core receives an authenticated sender and a
//! store snapshot per call, and returns the updated store or a failure reason.
//!
//! ## Usage
//!
//! ```ignore
//! use opal_core::{MethodCall, Runtime, RuntimeConfig};
//!
//! let mut runtime = Runtime::new(config);
//! let new_root = runtime.execute(sender, MethodCall::Credit { address, amount })?;
//! ```

pub mod modules;
pub mod runtime;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use modules::{
    airdrop::Airdrop,
    balances::{Balances, BalancesConfig, Mintable},
    soulbound::{SoulBound, SoulBoundConfig},
};
pub use runtime::{
    context::{MethodCall, Runtime, RuntimeConfig},
    error::RuntimeError,
};
pub use store::{
    merkle_map::{MerkleMap, MerkleMapWitness},
    state::{AuthenticatedStore, StateCell, StateMap, StateProof},
};
pub use types::{
    hash_address, hash_amount, hash_with_domain, Address, CertificateProperties, Digest,
};
