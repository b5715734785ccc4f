use thiserror::Error;

/// Every way a call into the core can fail.
///
/// Each variant is a failed precondition assertion: the call aborts as a
/// whole, the store snapshot is discarded unchanged, and the message is the
/// human-readable reason surfaced to the sequencer. Nothing here is
/// recoverable within the core — retry policy, if any, lives upstream.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Circulating supply would exceed the total supply cap: {requested} > {cap}")]
    SupplyExceeded { requested: u128, cap: u64 },

    #[error("Sender does not have enough balance: {balance} < {required}")]
    InsufficientBalance { balance: u64, required: u64 },

    #[error("Address {address} has already claimed the airdrop")]
    AlreadyClaimed { address: String },

    #[error("Computed key from witness {computed} does not match the required key {expected}")]
    ProofKeyMismatch { computed: String, expected: String },

    #[error("Airdrop proof commitment {computed} does not match the published commitment {expected}")]
    ProofRootMismatch { computed: String, expected: String },

    #[error("Address {address} already holds a certificate")]
    AlreadyIssued { address: String },

    #[error("Caller {caller} is not the certificate controller")]
    NotController { caller: String },
}
