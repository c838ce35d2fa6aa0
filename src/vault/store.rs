//! CRUD over credential records.
//!
//! `RecordStore` sits between the session and the storage collaborator:
//! it encrypts passwords on the way in, decrypts them on the way out, and
//! keeps per-record decryption failures from aborting bulk reads.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::crypto::{decrypt, encrypt, generate_password, DerivedKey};
use crate::errors::{Result, VaultError};

use super::record::{
    CredentialRecord, DecryptedRecord, Listing, RecordId, RecordWarning, StoredRecord, StoredRow,
};
use super::storage::{RecordFilter, Storage};

/// Age at which a stored password should be rotated.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 90;

/// Where the password for a new record comes from.
pub enum PasswordSource {
    /// Use the password typed by the user.
    Provided(Zeroizing<String>),
    /// Generate a random 16-character password.
    Generate,
}

/// Result of `add`.
#[derive(Debug)]
pub struct AddOutcome {
    pub id: RecordId,
    /// The generated password, when one was requested, so the caller
    /// can show it once.
    pub generated: Option<Zeroizing<String>>,
}

/// Returns `true` when `at - created_at` is at least 90 days.
pub fn check_expiry(created_at: DateTime<Utc>, at: DateTime<Utc>) -> bool {
    check_expiry_with(created_at, at, Duration::days(DEFAULT_MAX_AGE_DAYS))
}

/// Returns `true` when `at - created_at >= max_age`.
pub fn check_expiry_with(created_at: DateTime<Utc>, at: DateTime<Utc>, max_age: Duration) -> bool {
    at.signed_duration_since(created_at) >= max_age
}

/// Record operations over a storage collaborator.
pub struct RecordStore<S> {
    storage: S,
}

impl<S: Storage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Encrypt and persist a new record stamped with `now`.
    pub fn add(
        &self,
        key: &DerivedKey,
        site: &str,
        username: &str,
        source: PasswordSource,
        now: DateTime<Utc>,
    ) -> Result<AddOutcome> {
        let site = site.trim();
        if site.is_empty() {
            return Err(VaultError::CommandFailed("site cannot be empty".into()));
        }

        let (password, generated) = match source {
            PasswordSource::Provided(pw) => (pw, false),
            PasswordSource::Generate => (generate_password(), true),
        };

        let record = CredentialRecord {
            site: site.to_string(),
            username: username.trim().to_string(),
            secret_ciphertext: encrypt(key, &password)?,
            created_at: now.trunc_subsecs(0),
        };

        let id = self.storage.insert(&record)?;
        info!(record_id = id, site = %record.site, generated, "added record");

        Ok(AddOutcome {
            id,
            generated: generated.then_some(password),
        })
    }

    /// Decrypt every record.  Records that are unreadable or fail
    /// authentication are skipped and reported in `Listing::warnings`.
    pub fn list_all(&self, key: &DerivedKey) -> Result<Listing> {
        let stored = self.storage.select_all()?;
        Ok(decrypt_all(key, stored))
    }

    /// Records whose site or username contains `query`, ignoring case.
    pub fn search(&self, key: &DerivedKey, query: &str) -> Result<Listing> {
        let stored = self
            .storage
            .select_where(&RecordFilter::Matches(query.to_string()))?;
        Ok(decrypt_all(key, stored))
    }

    /// Delete every record for `site`.  Zero removed is not an error.
    pub fn delete_by_site(&self, site: &str) -> Result<usize> {
        let removed = self
            .storage
            .delete_where(&RecordFilter::SiteEquals(site.trim().to_string()))?;
        info!(site = %site.trim(), removed, "deleted records");
        Ok(removed)
    }
}

fn decrypt_all(key: &DerivedKey, stored: Vec<StoredRow>) -> Listing {
    let mut listing = Listing::default();

    for row in stored {
        let StoredRecord { id, record } = match row {
            StoredRow::Record(stored) => stored,
            StoredRow::Unreadable(warning) => {
                warn!(record_id = warning.id, site = %warning.site, "skipping unreadable record");
                listing.warnings.push(warning);
                continue;
            }
        };

        match decrypt(key, &record.secret_ciphertext) {
            Ok(password) => listing.records.push(DecryptedRecord {
                id,
                site: record.site,
                username: record.username,
                password: Zeroizing::new(password),
                created_at: record.created_at,
            }),
            Err(e) => {
                warn!(record_id = id, site = %record.site, "skipping record that failed decryption");
                listing.warnings.push(RecordWarning {
                    id,
                    site: record.site,
                    reason: e.to_string(),
                });
            }
        }
    }

    listing
}
