use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

/// A 32-byte hash digest — Merkle roots, node hashes, and hashed state keys.
pub type Digest = [u8; 32];

/// An opaque 32-byte account identity.
/// Stands in for a chain public key; the core never inspects its structure.
pub type Address = [u8; 32];

/// The properties carried by a soulbound certificate.
/// At minimum an identifier; extend with further fields as the record grows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateProperties {
    /// Certificate identifier.
    pub id: u64,
}

/// Compute a domain-separated SHA256 digest.
/// Every hash in the system carries a distinct domain prefix so that a
/// collision in one role can never be replayed in another.
pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash an address into an airdrop-tree leaf key.
pub fn hash_address(address: &Address) -> Digest {
    hash_with_domain(b"opal/address", address)
}

/// Hash an amount into an airdrop-tree leaf value.
pub fn hash_amount(amount: u64) -> Digest {
    hash_with_domain(b"opal/amount", &amount.to_be_bytes())
}
