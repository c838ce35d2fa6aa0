//! Vault module: encrypted credential records.
//!
//! This module provides:
//! - Record types (`record`)
//! - The persistence interface (`storage`) and its SQLite implementation (`sqlite`)
//! - `RecordStore` for add/list/search/delete (`store`)
//! - `VaultSession` for unlock, backup, restore and recovery (`session`)

pub mod record;
pub mod session;
pub mod sqlite;
pub mod storage;
pub mod store;

// Re-export the most commonly used items.
pub use record::{
    CredentialRecord, DecryptedRecord, Listing, RecordId, RecordWarning, StoredRecord, StoredRow,
};
pub use session::{BackupSnapshot, Recovery, SessionOptions, VaultSession};
pub use sqlite::SqliteStorage;
pub use storage::{RecordFilter, Storage};
pub use store::{check_expiry, check_expiry_with, AddOutcome, PasswordSource, RecordStore};
