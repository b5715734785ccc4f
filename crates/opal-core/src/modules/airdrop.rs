use tracing::debug;

use crate::modules::balances::Mintable;
use crate::runtime::error::RuntimeError;
use crate::store::{AuthenticatedStore, MerkleMapWitness, StateCell, StateMap};
use crate::types::{hash_address, hash_amount, Address, Digest};

/// The airdrop registry: a published Merkle commitment over
/// `hash(address) -> hash(amount)` entries, plus the per-address claimed
/// flags that make each entry spendable at most once.
///
/// Claimed flags are flat and never reset: publishing a new commitment does
/// not start a fresh claim epoch, so an address that claimed under any past
/// commitment can never claim again. Known limitation; a follow-up airdrop
/// has to fold unclaimed rewards into its new tree instead.
#[derive(Clone, Debug)]
pub struct Airdrop {
    commitment: StateCell<Digest>,
    claimed: StateMap<Address, bool>,
}

impl Default for Airdrop {
    fn default() -> Self {
        Self::new()
    }
}

impl Airdrop {
    pub fn new() -> Self {
        Self {
            commitment: StateCell::new("airdrop", "commitment"),
            claimed: StateMap::new("airdrop", "claimed"),
        }
    }

    /// Read the published commitment (the zero digest before any publish).
    pub fn commitment(&self, store: &AuthenticatedStore) -> Digest {
        self.commitment.get(store).0
    }

    /// Whether an address has already claimed.
    pub fn is_claimed(&self, store: &AuthenticatedStore, address: &Address) -> bool {
        self.claimed.get(store, address).0
    }

    /// Publish a new airdrop commitment, replacing any previous one.
    ///
    /// Deliberately unconstrained: any caller may overwrite the commitment.
    /// The write is left open rather than gated on an issuer identity; a
    /// deployment that needs authorization must add it upstream. Never fails.
    pub fn set_commitment(&self, store: &mut AuthenticatedStore, root: Digest) {
        self.commitment.set(store, &root);
        debug!(commitment = %hex::encode(root), "published airdrop commitment");
    }

    /// Claim the caller's airdrop entry.
    ///
    /// The witness decides who is claiming: the claim succeeds only when the
    /// key reconstituted from the witness path equals `hash(sender)` and the
    /// recomputed root equals the published commitment. On success the
    /// sender's flag is set and `amount` is credited through the injected
    /// `Mintable` capability.
    ///
    /// Checks, in order:
    /// 1. sender has not claimed before (`AlreadyClaimed`)
    /// 2. witness path encodes `hash(sender)` (`ProofKeyMismatch`)
    /// 3. witness root equals the commitment (`ProofRootMismatch`)
    /// 4. minting `amount` respects the supply cap (`SupplyExceeded`)
    pub fn claim(
        &self,
        store: &mut AuthenticatedStore,
        sender: Address,
        witness: &MerkleMapWitness,
        amount: u64,
        minter: &dyn Mintable,
    ) -> Result<(), RuntimeError> {
        let (is_claimed, _) = self.claimed.get(store, &sender);
        if is_claimed {
            return Err(RuntimeError::AlreadyClaimed {
                address: hex::encode(sender),
            });
        }

        let leaf_key = hash_address(&sender);
        let leaf_value = hash_amount(amount);
        let (computed_root, computed_key) = witness.compute_root_and_key(leaf_value);

        if computed_key != leaf_key {
            return Err(RuntimeError::ProofKeyMismatch {
                computed: hex::encode(computed_key),
                expected: hex::encode(leaf_key),
            });
        }

        let (commitment, _) = self.commitment.get(store);
        debug!(
            computed = %hex::encode(computed_root),
            stored = %hex::encode(commitment),
            "airdrop claim proof roots"
        );
        if computed_root != commitment {
            return Err(RuntimeError::ProofRootMismatch {
                computed: hex::encode(computed_root),
                expected: hex::encode(commitment),
            });
        }

        // Mint before flagging: the mint can still fail on the supply cap,
        // and no write may precede the last fallible step.
        minter.mint(store, sender, amount)?;
        self.claimed.set(store, &sender, &true);

        debug!(address = %hex::encode(sender), amount, "airdrop claimed");
        Ok(())
    }
}
