//! Cryptographic primitives for OtpVault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - HKDF-SHA256 record-key derivation (`kdf`)
//! - Random password generation (`password`)

pub mod encryption;
pub mod kdf;
pub mod password;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_key, DerivedKey, KEY_LEN};
pub use password::{generate_password, GENERATED_PASSWORD_LEN, PASSWORD_CHARSET};
