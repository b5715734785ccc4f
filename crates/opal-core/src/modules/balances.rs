use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::runtime::error::RuntimeError;
use crate::store::{AuthenticatedStore, StateCell, StateMap};
use crate::types::Address;

/// Balances module configuration, fixed at construction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BalancesConfig {
    /// Hard cap on the circulating supply. Immutable for the ledger's
    /// lifetime; no sequence of calls may push the supply past it.
    pub total_supply_cap: u64,
}

/// The capability a module needs to create new tokens.
///
/// Cross-module crediting (the airdrop paying out a claim) goes through this
/// narrow seam, injected explicitly at the call site — never through
/// inheritance or a hidden global.
pub trait Mintable {
    fn mint(
        &self,
        store: &mut AuthenticatedStore,
        address: Address,
        amount: u64,
    ) -> Result<(), RuntimeError>;
}

/// The capped-supply token ledger: per-address balances plus a circulating
/// supply scalar, both living in the authenticated store.
///
/// Invariant after every successful call:
/// `circulating_supply == sum(balances) <= total_supply_cap`.
#[derive(Clone, Debug)]
pub struct Balances {
    config: BalancesConfig,
    balances: StateMap<Address, u64>,
    circulating_supply: StateCell<u64>,
}

impl Balances {
    pub fn new(config: BalancesConfig) -> Self {
        Self {
            config,
            balances: StateMap::new("balances", "balances"),
            circulating_supply: StateCell::new("balances", "circulating_supply"),
        }
    }

    /// Read an address's balance; unwritten addresses hold zero.
    pub fn balance_of(&self, store: &AuthenticatedStore, address: &Address) -> u64 {
        self.balances.get(store, address).0
    }

    /// Read the circulating supply.
    pub fn circulating_supply(&self, store: &AuthenticatedStore) -> u64 {
        self.circulating_supply.get(store).0
    }

    /// Mint `amount` new tokens to `address`.
    ///
    /// Additive: the address's balance grows by `amount`, it is never
    /// overwritten to `amount`. Fails with
    /// `SupplyExceeded` when the new circulating supply would pass the cap,
    /// leaving all state untouched.
    pub fn credit(
        &self,
        store: &mut AuthenticatedStore,
        address: Address,
        amount: u64,
    ) -> Result<(), RuntimeError> {
        let (supply, _) = self.circulating_supply.get(store);

        // Widen before adding so the cap check itself cannot overflow.
        let new_supply = u128::from(supply) + u128::from(amount);
        if new_supply > u128::from(self.config.total_supply_cap) {
            return Err(RuntimeError::SupplyExceeded {
                requested: new_supply,
                cap: self.config.total_supply_cap,
            });
        }

        self.circulating_supply.set(store, &(new_supply as u64));

        // balance <= supply, so this sum is bounded by the cap check above.
        let (balance, _) = self.balances.get(store, &address);
        self.balances.set(store, &address, &(balance + amount));

        debug!(
            address = %hex::encode(address),
            amount,
            supply = new_supply as u64,
            "credited balance"
        );
        Ok(())
    }

    /// Move `amount` from the authenticated caller to `recipient`.
    ///
    /// The sender is always the transaction sender, never a parameter. Fails
    /// with `InsufficientBalance` when the sender holds less than `amount`,
    /// leaving all state untouched.
    pub fn transfer(
        &self,
        store: &mut AuthenticatedStore,
        sender: Address,
        recipient: Address,
        amount: u64,
    ) -> Result<(), RuntimeError> {
        let (sender_balance, _) = self.balances.get(store, &sender);

        if sender_balance < amount {
            return Err(RuntimeError::InsufficientBalance {
                balance: sender_balance,
                required: amount,
            });
        }

        // Select-then-subtract keeps this update expressible without a
        // data-dependent branch in a provable form. Under abort-on-assert
        // semantics the insufficient arm is unreachable, so the result always
        // equals `sender_balance - amount`.
        let selected = if sender_balance >= amount {
            sender_balance
        } else {
            sender_balance + amount
        };
        self.balances.set(store, &sender, &(selected - amount));

        // Recipient is read after the sender write, so a self-transfer nets
        // out to a no-op instead of minting.
        let (recipient_balance, _) = self.balances.get(store, &recipient);
        self.balances.set(store, &recipient, &(recipient_balance + amount));

        debug!(
            sender = %hex::encode(sender),
            recipient = %hex::encode(recipient),
            amount,
            "transferred balance"
        );
        Ok(())
    }
}

impl Mintable for Balances {
    fn mint(
        &self,
        store: &mut AuthenticatedStore,
        address: Address,
        amount: u64,
    ) -> Result<(), RuntimeError> {
        self.credit(store, address, amount)
    }
}
