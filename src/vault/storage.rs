//! The raw persistence interface the record store and session rely on.
//!
//! Implementations only move already-encrypted records and files around;
//! they never see plaintext passwords or key material.

use std::path::Path;

use super::record::{CredentialRecord, RecordId, StoredRow};
use crate::errors::Result;

/// Row selection for `select_where` / `delete_where`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter {
    /// Exact, case-sensitive match on the site.
    SiteEquals(String),
    /// Case-insensitive substring match on the site OR the username.
    Matches(String),
}

/// Persistence collaborator for the vault.
pub trait Storage {
    /// Path of the primary vault file.
    fn vault_path(&self) -> &Path;

    /// Check that the vault file is structurally readable.
    ///
    /// Returns `CorruptedStore` when the file is damaged or has an
    /// unexpected layout, `StorageUnavailable` for any other failure.
    fn probe(&self) -> Result<()>;

    /// Create the vault file and record table if they do not exist.
    fn ensure_schema(&self) -> Result<()>;

    fn insert(&self, record: &CredentialRecord) -> Result<RecordId>;

    /// All rows in insertion order.  A damaged row is returned as
    /// `StoredRow::Unreadable`, never as an error for the whole read.
    fn select_all(&self) -> Result<Vec<StoredRow>>;

    fn select_where(&self, filter: &RecordFilter) -> Result<Vec<StoredRow>>;

    /// Delete matching records and return how many were removed.
    fn delete_where(&self, filter: &RecordFilter) -> Result<usize>;

    /// Copy `src` over `dst` atomically (readers see the old or the new
    /// file, never a partial one).  Returns the number of bytes copied.
    fn copy_file(&self, src: &Path, dst: &Path) -> Result<u64>;

    fn file_exists(&self, path: &Path) -> bool;

    /// Remove a file; a missing file is not an error.
    fn remove_file(&self, path: &Path) -> Result<()>;
}
