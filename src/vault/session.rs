//! One unlocked use of the vault.
//!
//! A `VaultSession` owns the shared secret, runs the OTP gate, and only
//! after a successful verification derives the record key.  Every record,
//! backup and recovery operation goes through `key()`, so a session that
//! was never unlocked (or was denied) can do nothing but fail with
//! `SessionLocked`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::crypto::DerivedKey;
use crate::errors::{Result, VaultError};
use crate::otp::{GateState, OtpCode, OtpGate, SharedSecret, TotpParams};

use super::record::{DecryptedRecord, Listing};
use super::storage::Storage;
use super::store::{check_expiry_with, AddOutcome, PasswordSource, RecordStore, DEFAULT_MAX_AGE_DAYS};

/// Per-session knobs, usually built from `Settings`.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub totp: TotpParams,
    /// Location of the single backup generation.
    pub backup_path: PathBuf,
    /// Age after which a password is reported as expired.
    pub max_age: Duration,
}

impl SessionOptions {
    pub fn new(backup_path: impl Into<PathBuf>) -> Self {
        Self {
            totp: TotpParams::default(),
            backup_path: backup_path.into(),
            max_age: Duration::days(DEFAULT_MAX_AGE_DAYS),
        }
    }
}

/// What `recover_if_corrupted` found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// The vault file was readable.
    Healthy,
    /// No vault file existed; an empty one was created.
    Created,
    /// The vault file was unreadable and has been replaced by an empty
    /// one.  All previously stored records are gone.
    Reinitialized { reason: String },
}

/// A point-in-time copy of the vault file.
#[derive(Debug, Clone)]
pub struct BackupSnapshot {
    pub path: PathBuf,
    pub taken_at: DateTime<Utc>,
    pub size: u64,
}

/// The unlock-then-operate lifecycle over one vault file.
pub struct VaultSession<S> {
    secret: SharedSecret,
    gate: OtpGate,
    key: Option<DerivedKey>,
    store: RecordStore<S>,
    backup_path: PathBuf,
    max_age: Duration,
}

impl<S: Storage> VaultSession<S> {
    pub fn new(storage: S, secret: SharedSecret, options: SessionOptions) -> Self {
        Self {
            secret,
            gate: OtpGate::new(options.totp),
            key: None,
            store: RecordStore::new(storage),
            backup_path: options.backup_path,
            max_age: options.max_age,
        }
    }

    // ------------------------------------------------------------------
    // Unlock
    // ------------------------------------------------------------------

    /// Issue the OTP challenge for the window containing `at`.
    pub fn challenge(&mut self, at: DateTime<Utc>) -> OtpCode {
        self.gate.issue_challenge(&self.secret, at)
    }

    /// Verify the submitted code and, on success, derive the record key.
    ///
    /// A rejected code locks the session for good.
    pub fn unlock(&mut self, submitted: &str, at: DateTime<Utc>) -> Result<()> {
        if self.key.is_some() {
            return Ok(());
        }

        if !self.gate.verify(&self.secret, submitted, at) {
            warn!("one-time passcode rejected, session locked");
            return Err(VaultError::SessionLocked);
        }

        self.key = Some(self.secret.derive_key()?);
        info!("vault unlocked");
        Ok(())
    }

    pub fn is_unlocked(&self) -> bool {
        self.key.is_some()
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    fn key(&self) -> Result<&DerivedKey> {
        self.key.as_ref().ok_or(VaultError::SessionLocked)
    }

    // ------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------

    /// Make sure the vault file exists and is readable.
    ///
    /// A corrupted file is discarded and replaced by an empty vault; the
    /// returned `Recovery::Reinitialized` must be shown to the user.
    pub fn recover_if_corrupted(&self) -> Result<Recovery> {
        self.key()?;
        let storage = self.store.storage();
        let path = storage.vault_path().to_path_buf();

        if !storage.file_exists(&path) {
            storage.ensure_schema()?;
            info!(path = %path.display(), "created empty vault");
            return Ok(Recovery::Created);
        }

        match storage.probe() {
            Ok(()) => {
                storage.ensure_schema()?;
                Ok(Recovery::Healthy)
            }
            Err(VaultError::CorruptedStore(reason)) => {
                warn!(
                    path = %path.display(),
                    %reason,
                    "vault file is corrupted; discarding it and starting an empty vault, stored credentials are lost"
                );
                storage.remove_file(&path)?;
                storage.ensure_schema()?;
                Ok(Recovery::Reinitialized { reason })
            }
            Err(e) => Err(e),
        }
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    pub fn add(
        &self,
        site: &str,
        username: &str,
        source: PasswordSource,
        now: DateTime<Utc>,
    ) -> Result<AddOutcome> {
        self.store.add(self.key()?, site, username, source, now)
    }

    pub fn list(&self) -> Result<Listing> {
        self.store.list_all(self.key()?)
    }

    pub fn search(&self, query: &str) -> Result<Listing> {
        self.store.search(self.key()?, query)
    }

    pub fn delete_by_site(&self, site: &str) -> Result<usize> {
        self.key()?;
        self.store.delete_by_site(site)
    }

    /// Whether `record` is older than the configured maximum age at `at`.
    pub fn is_expired(&self, record: &DecryptedRecord, at: DateTime<Utc>) -> bool {
        check_expiry_with(record.created_at, at, self.max_age)
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    // ------------------------------------------------------------------
    // Backup / restore
    // ------------------------------------------------------------------

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Copy the vault file to the backup location, replacing any
    /// previous backup.
    pub fn backup(&self) -> Result<BackupSnapshot> {
        self.key()?;
        let storage = self.store.storage();
        let vault_path = storage.vault_path();

        if !storage.file_exists(vault_path) {
            return Err(VaultError::StorageUnavailable(format!(
                "vault file {} does not exist",
                vault_path.display()
            )));
        }

        let size = storage.copy_file(vault_path, &self.backup_path)?;

        info!(backup = %self.backup_path.display(), size, "vault backed up");
        Ok(BackupSnapshot {
            path: self.backup_path.clone(),
            taken_at: Utc::now(),
            size,
        })
    }

    /// Replace the vault file with the latest backup.
    pub fn restore(&self) -> Result<()> {
        self.key()?;
        let storage = self.store.storage();

        if !storage.file_exists(&self.backup_path) {
            return Err(VaultError::BackupNotFound(self.backup_path.clone()));
        }

        storage.copy_file(&self.backup_path, storage.vault_path())?;
        info!(backup = %self.backup_path.display(), "vault restored from backup");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// End the session, wiping the record key.
    pub fn close(mut self) {
        if self.key.take().is_some() {
            info!("session closed");
        }
    }
}
