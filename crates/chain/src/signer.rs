//! Claim-wallet signing key, unlocked once per process from a keystore.

use std::fmt;

use payout_types::Address;
use serde::Deserialize;

use crate::ChainError;

/// Exported keystore file layout (address plus encrypted key material).
#[derive(Debug, Deserialize)]
struct KeystoreJson {
    address: Address,
    encoded: String,
}

/// The capability to sign claim transactions.
///
/// Built once when the cycle configuration is constructed; a locked or
/// malformed keystore is a fatal configuration error, not a per-cycle
/// retryable failure. The actual cryptography lives in the chain backend,
/// which consumes the unlocked material when signing.
#[derive(Clone)]
pub struct SigningKey {
    address: Address,
    material: Vec<u8>,
}

impl SigningKey {
    /// Unlocks a keystore export with its password.
    pub fn from_keystore(keystore_json: &str, password: &str) -> Result<Self, ChainError> {
        if password.is_empty() {
            return Err(ChainError::KeystoreLocked("empty password".to_owned()));
        }
        let keystore: KeystoreJson = serde_json::from_str(keystore_json)
            .map_err(|e| ChainError::KeystoreLocked(format!("malformed keystore: {e}")))?;
        if keystore.encoded.is_empty() {
            return Err(ChainError::KeystoreLocked(
                "keystore has no key material".to_owned(),
            ));
        }
        Ok(Self {
            address: keystore.address,
            material: keystore.encoded.into_bytes(),
        })
    }

    /// Public address of the claim wallet.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Unlocked key material, consumed by the backend when signing.
    pub fn material(&self) -> &[u8] {
        &self.material
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print key material
        f.debug_struct("SigningKey")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYSTORE: &str = r#"{"address": "5Claim...", "encoded": "b64material"}"#;

    #[test]
    fn test_unlock_keystore() {
        let key = SigningKey::from_keystore(KEYSTORE, "hunter2").unwrap();
        assert_eq!(key.address(), "5Claim...");
        assert_eq!(key.material(), b"b64material");
    }

    #[test]
    fn test_empty_password_is_locked() {
        let err = SigningKey::from_keystore(KEYSTORE, "").unwrap_err();
        assert!(matches!(err, ChainError::KeystoreLocked(_)));
    }

    #[test]
    fn test_malformed_keystore_is_locked() {
        let err = SigningKey::from_keystore("{not json", "pw").unwrap_err();
        assert!(matches!(err, ChainError::KeystoreLocked(_)));
    }

    #[test]
    fn test_debug_redacts_material() {
        let key = SigningKey::from_keystore(KEYSTORE, "pw").unwrap();
        let dbg = format!("{key:?}");
        assert!(!dbg.contains("b64material"));
    }
}
