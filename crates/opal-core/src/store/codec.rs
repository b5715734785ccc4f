use crate::types::CertificateProperties;

/// Deterministic fixed-layout byte encoding for everything the authenticated
/// store holds. Two equal values always encode identically — the encoding is
/// hashed into leaf digests, so any ambiguity would split the commitment.
pub trait StateValue: Sized {
    /// Encode into the store's canonical byte layout.
    fn encode(&self) -> Vec<u8>;

    /// Decode from the canonical layout. Returns `None` on any length or
    /// content mismatch; the store only feeds this bytes it wrote itself.
    fn decode(bytes: &[u8]) -> Option<Self>;
}

impl StateValue for u64 {
    fn encode(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; 8] = bytes.try_into().ok()?;
        Some(u64::from_be_bytes(arr))
    }
}

impl StateValue for bool {
    fn encode(&self) -> Vec<u8> {
        vec![u8::from(*self)]
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0] => Some(false),
            [1] => Some(true),
            _ => None,
        }
    }
}

impl StateValue for [u8; 32] {
    fn encode(&self) -> Vec<u8> {
        self.to_vec()
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok()
    }
}

impl StateValue for CertificateProperties {
    fn encode(&self) -> Vec<u8> {
        self.id.to_be_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        Some(Self {
            id: u64::decode(bytes)?,
        })
    }
}
