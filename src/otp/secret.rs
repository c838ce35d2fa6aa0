//! The shared OTP secret.
//!
//! One secret exists per vault lifetime.  It is shared with the user's
//! authenticator app (base32 text) and is also the input keying
//! material for the record key, so it is never stored in the record
//! table.

use data_encoding::BASE32_NOPAD;
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::kdf::{self, DerivedKey};
use crate::errors::{Result, VaultError};

/// Number of random bytes in a generated secret (160 bits).
const GENERATED_LEN: usize = 20;

/// Minimum decoded length accepted for a user-supplied secret (128 bits).
const MIN_LEN: usize = 16;

/// A decoded OTP secret.  Zeroized on drop; `Debug` is redacted.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SharedSecret {
    bytes: Vec<u8>,
}

impl SharedSecret {
    /// Generate a fresh random secret.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; GENERATED_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Parse a base32 secret as shown by `to_base32` or an authenticator app.
    ///
    /// Whitespace and `=` padding are ignored and lowercase is accepted.
    pub fn from_base32(text: &str) -> Result<Self> {
        let normalized: Zeroizing<String> = Zeroizing::new(
            text.chars()
                .filter(|ch| !ch.is_ascii_whitespace() && *ch != '=')
                .map(|ch| ch.to_ascii_uppercase())
                .collect(),
        );

        if normalized.is_empty() {
            return Err(VaultError::InvalidSecret("secret is empty".into()));
        }

        let bytes = BASE32_NOPAD
            .decode(normalized.as_bytes())
            .map_err(|_| VaultError::InvalidSecret("secret is not valid base32".into()))?;

        Self::from_bytes(bytes)
    }

    /// Wrap raw secret bytes, enforcing the minimum entropy length.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() < MIN_LEN {
            let len = bytes.len();
            let mut bytes = bytes;
            bytes.zeroize();
            return Err(VaultError::InvalidSecret(format!(
                "secret must be at least {} bits, got {}",
                MIN_LEN * 8,
                len * 8
            )));
        }
        Ok(Self { bytes })
    }

    /// Encode the secret as unpadded base32 for display or storage.
    pub fn to_base32(&self) -> Zeroizing<String> {
        Zeroizing::new(BASE32_NOPAD.encode(&self.bytes))
    }

    /// Raw secret bytes (HMAC key for TOTP).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Derive the record key for this secret.
    pub fn derive_key(&self) -> Result<DerivedKey> {
        kdf::derive_key(&self.bytes)
    }

    /// Build an `otpauth://` provisioning URI for authenticator apps.
    pub fn provisioning_uri(&self, account: &str, digits: u32, period_secs: u64) -> Zeroizing<String> {
        Zeroizing::new(format!(
            "otpauth://totp/otpvault:{account}?secret={}&issuer=otpvault&algorithm=SHA1&digits={digits}&period={period_secs}",
            self.to_base32().as_str()
        ))
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_secret_roundtrips_through_base32() {
        let secret = SharedSecret::generate();
        assert_eq!(secret.as_bytes().len(), GENERATED_LEN);

        let text = secret.to_base32();
        assert_eq!(text.len(), 32);

        let parsed = SharedSecret::from_base32(&text).unwrap();
        assert_eq!(parsed.as_bytes(), secret.as_bytes());
    }

    #[test]
    fn parse_accepts_lowercase_spaces_and_padding() {
        let secret = SharedSecret::from_base32("gezd gnbv gy3t qojq gezd gnbv gy3t qojq====").unwrap();
        assert_eq!(secret.as_bytes(), b"12345678901234567890");
    }

    #[test]
    fn parse_rejects_empty_and_invalid() {
        assert!(matches!(
            SharedSecret::from_base32("   "),
            Err(VaultError::InvalidSecret(_))
        ));
        assert!(matches!(
            SharedSecret::from_base32("not*base32!"),
            Err(VaultError::InvalidSecret(_))
        ));
    }

    #[test]
    fn parse_rejects_short_secret() {
        // 10 bytes = 80 bits
        let short = BASE32_NOPAD.encode(&[7u8; 10]);
        assert!(matches!(
            SharedSecret::from_base32(&short),
            Err(VaultError::InvalidSecret(_))
        ));
    }

    #[test]
    fn debug_is_redacted() {
        let secret = SharedSecret::generate();
        assert_eq!(format!("{secret:?}"), "SharedSecret([REDACTED])");
    }

    #[test]
    fn provisioning_uri_contains_secret() {
        let secret = SharedSecret::from_bytes(b"12345678901234567890".to_vec()).unwrap();
        let uri = secret.provisioning_uri("alice", 6, 30);
        assert!(uri.starts_with("otpauth://totp/otpvault:alice?"));
        assert!(uri.contains("secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"));
        assert!(uri.contains("period=30"));
    }
}
