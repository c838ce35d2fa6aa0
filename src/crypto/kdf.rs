//! Record-key derivation using HKDF-SHA256.
//!
//! The vault key is derived deterministically from the OTP shared secret,
//! so the same secret always unlocks the same records.  HKDF (RFC 5869)
//! runs a full extract + expand with a fixed application salt and a
//! context string (`info`) binding the output to record encryption.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::errors::{Result, VaultError};

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Application salt for the HKDF extract step.
const HKDF_SALT: &[u8] = b"otpvault-v1-salt";

/// Context string for the HKDF expand step.
const HKDF_INFO: &[u8] = b"otpvault-record-key";

/// A 32-byte record key that zeroes its memory when dropped.
///
/// Only ever lives inside an unlocked `VaultSession`.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Access the raw key bytes (e.g. to build a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl PartialEq for DerivedKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for DerivedKey {}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive the 32-byte record key from raw secret bytes.
///
/// The same input always produces the same key.  Fails with
/// `InvalidSecret` on empty input.
pub fn derive_key(secret: &[u8]) -> Result<DerivedKey> {
    if secret.is_empty() {
        return Err(VaultError::InvalidSecret("secret is empty".into()));
    }

    let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), secret);

    let mut bytes = [0u8; KEY_LEN];
    hk.expand(HKDF_INFO, &mut bytes)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    let key = DerivedKey { bytes };
    bytes.zeroize();
    Ok(key)
}
