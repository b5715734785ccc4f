use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::modules::{Airdrop, Balances, BalancesConfig, SoulBound, SoulBoundConfig};
use crate::runtime::error::RuntimeError;
use crate::store::{AuthenticatedStore, MerkleMapWitness};
use crate::types::{Address, CertificateProperties, Digest};

/// Runtime configuration: every module's immutable parameters, gathered so a
/// whole deployment can be parsed from one document.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub balances: BalancesConfig,
    pub soulbound: SoulBoundConfig,
}

/// One call into the core: the full method surface across all modules.
/// The caller identity is not part of the call — it arrives separately from
/// the transaction context that authenticated it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum MethodCall {
    /// Mint tokens to an address, bounded by the supply cap.
    Credit { address: Address, amount: u64 },
    /// Move tokens from the caller to a recipient.
    Transfer { recipient: Address, amount: u64 },
    /// Publish a new airdrop commitment.
    SetCommitment { root: Digest },
    /// Claim the caller's airdrop entry under the published commitment.
    Claim { witness: MerkleMapWitness, amount: u64 },
    /// Issue a soulbound certificate (controller only).
    Issue {
        address: Address,
        properties: CertificateProperties,
    },
}

/// The deterministic state-transition engine: one authenticated store, three
/// modules, one call at a time.
///
/// Calls are applied snapshot-then-commit: a failing call restores the store
/// byte-for-byte, so the sequencer only ever observes fully-applied or
/// fully-rejected transitions. Ordering across calls is the sequencer's
/// problem; nothing here suspends, locks, or retries.
#[derive(Clone, Debug)]
pub struct Runtime {
    store: AuthenticatedStore,
    balances: Balances,
    airdrop: Airdrop,
    soulbound: SoulBound,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            store: AuthenticatedStore::new(),
            balances: Balances::new(config.balances),
            airdrop: Airdrop::new(),
            soulbound: SoulBound::new(config.soulbound),
        }
    }

    /// Apply one call for an authenticated sender.
    ///
    /// Returns the new store root on success. On failure the store is exactly
    /// what it was before the call and the error carries the reason string
    /// surfaced to the sequencer.
    pub fn execute(
        &mut self,
        sender: Address,
        call: MethodCall,
    ) -> Result<Digest, RuntimeError> {
        let snapshot = self.store.clone();
        match self.apply(sender, call) {
            Ok(()) => Ok(self.store.root()),
            Err(error) => {
                debug!(sender = %hex::encode(sender), %error, "call aborted");
                self.store = snapshot;
                Err(error)
            }
        }
    }

    fn apply(&mut self, sender: Address, call: MethodCall) -> Result<(), RuntimeError> {
        match call {
            MethodCall::Credit { address, amount } => {
                self.balances.credit(&mut self.store, address, amount)
            }
            MethodCall::Transfer { recipient, amount } => {
                self.balances
                    .transfer(&mut self.store, sender, recipient, amount)
            }
            MethodCall::SetCommitment { root } => {
                self.airdrop.set_commitment(&mut self.store, root);
                Ok(())
            }
            MethodCall::Claim { witness, amount } => self.airdrop.claim(
                &mut self.store,
                sender,
                &witness,
                amount,
                &self.balances,
            ),
            MethodCall::Issue { address, properties } => {
                self.soulbound
                    .issue(&mut self.store, sender, address, properties)
            }
        }
    }

    /// The store as of the last committed call.
    pub fn store(&self) -> &AuthenticatedStore {
        &self.store
    }

    /// Root digest of the current state.
    pub fn root(&self) -> Digest {
        self.store.root()
    }

    // Query surface, mirroring what an indexer would read off the store.

    pub fn balance_of(&self, address: &Address) -> u64 {
        self.balances.balance_of(&self.store, address)
    }

    pub fn circulating_supply(&self) -> u64 {
        self.balances.circulating_supply(&self.store)
    }

    pub fn commitment(&self) -> Digest {
        self.airdrop.commitment(&self.store)
    }

    pub fn is_claimed(&self, address: &Address) -> bool {
        self.airdrop.is_claimed(&self.store, address)
    }

    pub fn certificate_of(&self, address: &Address) -> Option<CertificateProperties> {
        self.soulbound.certificate_of(&self.store, address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MerkleMap;
    use crate::types::{hash_address, hash_amount};

    const ALICE: Address = [0xA1; 32];
    const BOB: Address = [0xB0; 32];
    const CONTROLLER: Address = [0xC0; 32];

    fn runtime(cap: u64) -> Runtime {
        Runtime::new(RuntimeConfig {
            balances: BalancesConfig { total_supply_cap: cap },
            soulbound: SoulBoundConfig { controller: CONTROLLER },
        })
    }

    #[test]
    fn test_full_scenario() {
        let mut runtime = runtime(10_000);

        // Credit alice 1000.
        runtime
            .execute(ALICE, MethodCall::Credit { address: ALICE, amount: 1000 })
            .unwrap();
        assert_eq!(runtime.balance_of(&ALICE), 1000);
        assert_eq!(runtime.circulating_supply(), 1000);

        // Alice sends bob 100. The select-then-subtract update resolves to
        // plain subtraction once the guard has passed, so alice holds 900.
        runtime
            .execute(ALICE, MethodCall::Transfer { recipient: BOB, amount: 100 })
            .unwrap();
        assert_eq!(runtime.balance_of(&ALICE), 900);
        assert_eq!(runtime.balance_of(&BOB), 100);

        // Publish the rewards commitment: alice is owed 100.
        let mut tree = MerkleMap::new();
        tree.set(hash_address(&ALICE), hash_amount(100));
        runtime
            .execute(ALICE, MethodCall::SetCommitment { root: tree.root() })
            .unwrap();
        assert_eq!(runtime.commitment(), tree.root());

        // Alice claims; the claim credits her balance.
        let witness = tree.witness(hash_address(&ALICE));
        runtime
            .execute(ALICE, MethodCall::Claim { witness: witness.clone(), amount: 100 })
            .unwrap();
        assert!(runtime.is_claimed(&ALICE));
        assert_eq!(runtime.balance_of(&ALICE), 1000);
        assert_eq!(runtime.circulating_supply(), 1100);

        // A repeat claim is rejected.
        let result = runtime.execute(ALICE, MethodCall::Claim { witness, amount: 100 });
        assert!(matches!(result, Err(RuntimeError::AlreadyClaimed { .. })));
        assert_eq!(runtime.balance_of(&ALICE), 1000);
    }

    #[test]
    fn test_failed_call_restores_the_store() {
        let mut runtime = runtime(1000);
        runtime
            .execute(ALICE, MethodCall::Credit { address: ALICE, amount: 900 })
            .unwrap();
        let root = runtime.root();

        let result =
            runtime.execute(ALICE, MethodCall::Credit { address: BOB, amount: 200 });
        assert!(matches!(result, Err(RuntimeError::SupplyExceeded { .. })));
        assert_eq!(runtime.root(), root);
        assert_eq!(runtime.circulating_supply(), 900);
    }

    #[test]
    fn test_successful_call_returns_new_root() {
        let mut runtime = runtime(10_000);
        let genesis = runtime.root();

        let root = runtime
            .execute(ALICE, MethodCall::Credit { address: ALICE, amount: 1 })
            .unwrap();
        assert_ne!(root, genesis);
        assert_eq!(root, runtime.root());
    }

    #[test]
    fn test_issue_goes_through_dispatch() {
        let mut runtime = runtime(10_000);

        let result = runtime.execute(
            ALICE,
            MethodCall::Issue { address: ALICE, properties: CertificateProperties { id: 1 } },
        );
        assert!(matches!(result, Err(RuntimeError::NotController { .. })));

        runtime
            .execute(
                CONTROLLER,
                MethodCall::Issue { address: ALICE, properties: CertificateProperties { id: 1 } },
            )
            .unwrap();
        assert_eq!(
            runtime.certificate_of(&ALICE),
            Some(CertificateProperties { id: 1 })
        );
    }

    #[test]
    fn test_default_on_miss_queries() {
        let runtime = runtime(10_000);
        assert_eq!(runtime.balance_of(&ALICE), 0);
        assert_eq!(runtime.circulating_supply(), 0);
        assert_eq!(runtime.commitment(), [0u8; 32]);
        assert!(!runtime.is_claimed(&ALICE));
        assert_eq!(runtime.certificate_of(&ALICE), None);
    }

    #[test]
    fn test_config_parses_from_json() {
        let raw = r#"{
            "balances": { "total_supply_cap": 10000 },
            "soulbound": { "controller": [
                192, 192, 192, 192, 192, 192, 192, 192,
                192, 192, 192, 192, 192, 192, 192, 192,
                192, 192, 192, 192, 192, 192, 192, 192,
                192, 192, 192, 192, 192, 192, 192, 192
            ] }
        }"#;
        let config: RuntimeConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.balances.total_supply_cap, 10_000);
        assert_eq!(config.soulbound.controller, CONTROLLER);
    }
}
