//! Credential record types.
//!
//! A `CredentialRecord` is what lives on disk: site and username in the
//! clear, the password only as an AES-GCM blob.  `DecryptedRecord` is the
//! transient view handed to callers by `list`/`search`; it is never
//! written back.

use chrono::{DateTime, NaiveDateTime, Utc};
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

/// Row identifier assigned by the storage layer.
pub type RecordId = i64;

/// Fixed on-disk timestamp format (UTC, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A credential as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub site: String,
    pub username: String,
    /// Nonce || ciphertext || tag, produced by `crypto::encrypt`.
    pub secret_ciphertext: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// A persisted credential together with its row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub record: CredentialRecord,
}

/// One row read back from storage.
///
/// A row whose columns cannot be read (wrong value type, unparseable
/// timestamp) comes back as `Unreadable` so bulk reads can skip it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredRow {
    Record(StoredRecord),
    Unreadable(RecordWarning),
}

/// A credential with its password decrypted.
#[derive(Clone)]
pub struct DecryptedRecord {
    pub id: RecordId,
    pub site: String,
    pub username: String,
    pub password: Zeroizing<String>,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for DecryptedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptedRecord")
            .field("id", &self.id)
            .field("site", &self.site)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// A record that could not be decrypted during a bulk read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordWarning {
    pub id: RecordId,
    pub site: String,
    pub reason: String,
}

impl std::fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not read password for '{}' (record #{}): {}",
            self.site, self.id, self.reason
        )
    }
}

/// Result of `list`/`search`: every readable record plus one warning
/// per record that failed authentication.
#[derive(Debug, Default)]
pub struct Listing {
    pub records: Vec<DecryptedRecord>,
    pub warnings: Vec<RecordWarning>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.warnings.is_empty()
    }
}

/// Format a timestamp for storage.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| VaultError::CorruptedStore(format!("unreadable timestamp '{text}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_roundtrip_is_second_precise() {
        let ts = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 58).unwrap();
        let text = format_timestamp(&ts);
        assert_eq!(text, "2024-02-29T23:59:58Z");
        assert_eq!(parse_timestamp(&text).unwrap(), ts);
    }

    #[test]
    fn bad_timestamp_is_corruption() {
        assert!(matches!(
            parse_timestamp("Tue Mar  5 10:00:00 2024"),
            Err(VaultError::CorruptedStore(_))
        ));
    }

    #[test]
    fn debug_hides_password() {
        let record = DecryptedRecord {
            id: 1,
            site: "example.com".into(),
            username: "alice".into(),
            password: Zeroizing::new("hunter2hunter2".into()),
            created_at: Utc::now(),
        };
        let dbg = format!("{record:?}");
        assert!(dbg.contains("example.com"));
        assert!(!dbg.contains("hunter2"));
    }
}
