//! The three ledger modules. Each is a stateless handle — configuration plus
//! typed store accessors — whose methods assert every precondition before
//! writing anything.

pub mod airdrop;
pub mod balances;
pub mod soulbound;

pub use airdrop::Airdrop;
pub use balances::{Balances, BalancesConfig, Mintable};
pub use soulbound::{SoulBound, SoulBoundConfig};
