use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in OtpVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Secret / key errors ---
    #[error("Invalid OTP secret: {0}")]
    InvalidSecret(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Secret file error: {0}")]
    SecretFileError(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed: wrong key or tampered ciphertext")]
    AuthenticationFailure,

    // --- Session errors ---
    #[error("Session locked: one-time passcode was not accepted")]
    SessionLocked,

    // --- Storage errors ---
    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Backup not found at {0}")]
    BackupNotFound(PathBuf),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Vault file is corrupted: {0}")]
    CorruptedStore(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for OtpVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
