use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::runtime::error::RuntimeError;
use crate::store::{AuthenticatedStore, StateMap};
use crate::types::{Address, CertificateProperties};

/// Soulbound module configuration, fixed at construction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SoulBoundConfig {
    /// The only identity allowed to issue certificates.
    pub controller: Address,
}

/// The certificate registry: non-transferable records bound permanently to
/// one address. At most one certificate per address, ever — there is no
/// update, revoke, or transfer operation.
#[derive(Clone, Debug)]
pub struct SoulBound {
    config: SoulBoundConfig,
    certificates: StateMap<Address, CertificateProperties>,
}

impl SoulBound {
    pub fn new(config: SoulBoundConfig) -> Self {
        Self {
            config,
            certificates: StateMap::new("soulbound", "certificates"),
        }
    }

    /// Read the certificate held by an address, if any.
    pub fn certificate_of(
        &self,
        store: &AuthenticatedStore,
        address: &Address,
    ) -> Option<CertificateProperties> {
        self.certificates.get_option(store, address)
    }

    /// Issue a certificate to an address.
    ///
    /// Existence is checked before authorization: a second issuance fails
    /// `AlreadyIssued` regardless of who calls, and only then does a
    /// non-controller caller fail `NotController`.
    pub fn issue(
        &self,
        store: &mut AuthenticatedStore,
        caller: Address,
        address: Address,
        properties: CertificateProperties,
    ) -> Result<(), RuntimeError> {
        if self.certificates.get_option(store, &address).is_some() {
            return Err(RuntimeError::AlreadyIssued {
                address: hex::encode(address),
            });
        }

        if caller != self.config.controller {
            return Err(RuntimeError::NotController {
                caller: hex::encode(caller),
            });
        }

        self.certificates.set(store, &address, &properties);
        debug!(
            address = %hex::encode(address),
            id = properties.id,
            "issued certificate"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROLLER: Address = [0xC0; 32];
    const ALICE: Address = [0xA1; 32];
    const BOB: Address = [0xB0; 32];

    fn registry() -> (SoulBound, AuthenticatedStore) {
        let registry = SoulBound::new(SoulBoundConfig { controller: CONTROLLER });
        (registry, AuthenticatedStore::new())
    }

    #[test]
    fn test_issue_stores_certificate() {
        let (registry, mut store) = registry();
        registry
            .issue(&mut store, CONTROLLER, ALICE, CertificateProperties { id: 1 })
            .unwrap();

        assert_eq!(
            registry.certificate_of(&store, &ALICE),
            Some(CertificateProperties { id: 1 })
        );
        assert_eq!(registry.certificate_of(&store, &BOB), None);
    }

    #[test]
    fn test_second_issue_fails_regardless_of_caller() {
        let (registry, mut store) = registry();
        registry
            .issue(&mut store, CONTROLLER, ALICE, CertificateProperties { id: 1 })
            .unwrap();
        let root = store.root();

        // Controller retrying.
        let result =
            registry.issue(&mut store, CONTROLLER, ALICE, CertificateProperties { id: 2 });
        assert!(matches!(result, Err(RuntimeError::AlreadyIssued { .. })));

        // Non-controller retrying hits the existence check first.
        let result = registry.issue(&mut store, BOB, ALICE, CertificateProperties { id: 2 });
        assert!(matches!(result, Err(RuntimeError::AlreadyIssued { .. })));

        assert_eq!(store.root(), root);
        assert_eq!(
            registry.certificate_of(&store, &ALICE),
            Some(CertificateProperties { id: 1 })
        );
    }

    #[test]
    fn test_non_controller_cannot_issue() {
        let (registry, mut store) = registry();
        let root = store.root();

        let result = registry.issue(&mut store, BOB, ALICE, CertificateProperties { id: 1 });
        assert!(matches!(result, Err(RuntimeError::NotController { .. })));
        assert_eq!(store.root(), root);
        assert_eq!(registry.certificate_of(&store, &ALICE), None);
    }
}
