//! SQLite-backed vault file.
//!
//! Records live in a single `passwords` table:
//!
//! ```text
//! passwords(site TEXT, username TEXT, secret BLOB, created_at TEXT)
//! ```
//!
//! A connection is opened per operation and closed before returning, so
//! no handle is ever held while the file is copied or replaced.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, ErrorCode, Row};
use tracing::debug;

use super::record::{
    format_timestamp, parse_timestamp, CredentialRecord, RecordId, RecordWarning, StoredRecord,
    StoredRow,
};
use super::storage::{RecordFilter, Storage};
use crate::errors::{Result, VaultError};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS passwords (
    site        TEXT NOT NULL,
    username    TEXT NOT NULL,
    secret      BLOB NOT NULL,
    created_at  TEXT NOT NULL
);";

const SELECT_COLUMNS: &str = "SELECT rowid, site, username, secret, created_at FROM passwords";

/// Vault storage in a single SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    path: PathBuf,
}

impl SqliteStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.path).map_err(storage_error)
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<StoredRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql).map_err(storage_error)?;

        let rows = stmt
            .query_map(params, read_row)
            .map_err(storage_error)?
            .collect::<rusqlite::Result<Vec<StoredRow>>>()
            .map_err(storage_error)?;

        Ok(rows)
    }
}

impl Storage for SqliteStorage {
    fn vault_path(&self) -> &Path {
        &self.path
    }

    fn probe(&self) -> Result<()> {
        let conn = self.connect()?;

        let tables: Vec<String> = {
            let mut stmt = conn
                .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")
                .map_err(storage_error)?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(storage_error)?;
            let names = rows
                .collect::<rusqlite::Result<Vec<String>>>()
                .map_err(storage_error)?;
            names
        };

        let check: String = conn
            .query_row("PRAGMA quick_check", [], |row| row.get(0))
            .map_err(storage_error)?;
        if check != "ok" {
            return Err(VaultError::CorruptedStore(format!(
                "integrity check failed: {check}"
            )));
        }

        if tables.iter().any(|t| t == "passwords") {
            conn.prepare("SELECT site, username, secret, created_at FROM passwords LIMIT 0")
                .map_err(|e| {
                    VaultError::CorruptedStore(format!("passwords table has unexpected layout: {e}"))
                })?;
        }

        Ok(())
    }

    fn ensure_schema(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    VaultError::StorageUnavailable(format!("cannot create vault directory: {e}"))
                })?;
            }
        }

        let conn = self.connect()?;
        conn.execute_batch(CREATE_TABLE).map_err(storage_error)?;
        drop(conn);

        restrict_permissions(&self.path);
        Ok(())
    }

    fn insert(&self, record: &CredentialRecord) -> Result<RecordId> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO passwords (site, username, secret, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.site,
                record.username,
                record.secret_ciphertext,
                format_timestamp(&record.created_at)
            ],
        )
        .map_err(storage_error)?;

        let id = conn.last_insert_rowid();
        debug!(record_id = id, "inserted record");
        Ok(id)
    }

    fn select_all(&self) -> Result<Vec<StoredRow>> {
        self.query(&format!("{SELECT_COLUMNS} ORDER BY rowid"), [])
    }

    fn select_where(&self, filter: &RecordFilter) -> Result<Vec<StoredRow>> {
        match filter {
            RecordFilter::SiteEquals(site) => self.query(
                &format!("{SELECT_COLUMNS} WHERE site = ?1 ORDER BY rowid"),
                params![site],
            ),
            RecordFilter::Matches(query) => {
                let pattern = like_pattern(query);
                self.query(
                    &format!(
                        "{SELECT_COLUMNS} WHERE site LIKE ?1 ESCAPE '\\' OR username LIKE ?1 ESCAPE '\\' ORDER BY rowid"
                    ),
                    params![pattern],
                )
            }
        }
    }

    fn delete_where(&self, filter: &RecordFilter) -> Result<usize> {
        let conn = self.connect()?;
        let removed = match filter {
            RecordFilter::SiteEquals(site) => conn
                .execute("DELETE FROM passwords WHERE site = ?1", params![site])
                .map_err(storage_error)?,
            RecordFilter::Matches(query) => conn
                .execute(
                    "DELETE FROM passwords WHERE site LIKE ?1 ESCAPE '\\' OR username LIKE ?1 ESCAPE '\\'",
                    params![like_pattern(query)],
                )
                .map_err(storage_error)?,
        };
        Ok(removed)
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> Result<u64> {
        // The temp file is in the destination directory so the rename
        // stays on one filesystem and is atomic.
        let parent = dst.parent().unwrap_or(Path::new("."));
        let tmp_path = parent.join(format!(
            ".{}.tmp",
            dst.file_name().unwrap_or_default().to_string_lossy()
        ));

        let copied = fs::copy(src, &tmp_path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            VaultError::StorageUnavailable(format!(
                "copy {} -> {}: {e}",
                src.display(),
                tmp_path.display()
            ))
        })?;
        restrict_permissions(&tmp_path);

        fs::rename(&tmp_path, dst).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            VaultError::StorageUnavailable(format!("replace {}: {e}", dst.display()))
        })?;

        Ok(copied)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VaultError::StorageUnavailable(format!(
                "remove {}: {e}",
                path.display()
            ))),
        }
    }
}

/// Decode one `passwords` row.
///
/// Only the rowid has to be readable.  A secret that is not a BLOB or a
/// timestamp that does not parse turns the row into
/// `StoredRow::Unreadable` instead of failing the whole query.
fn read_row(row: &Row<'_>) -> rusqlite::Result<StoredRow> {
    let id: RecordId = row.get(0)?;
    let site = lossy_text(row.get_ref(1)?);
    let username = lossy_text(row.get_ref(2)?);

    let unreadable =
        |site: String, reason: String| StoredRow::Unreadable(RecordWarning { id, site, reason });

    let secret_ciphertext = match row.get_ref(3)? {
        ValueRef::Blob(bytes) => bytes.to_vec(),
        other => {
            return Ok(unreadable(
                site,
                format!("stored secret is {}, not binary data", other.data_type()),
            ))
        }
    };

    let created_at = match row.get_ref(4)? {
        ValueRef::Text(bytes) => match parse_timestamp(&String::from_utf8_lossy(bytes)) {
            Ok(ts) => ts,
            Err(VaultError::CorruptedStore(reason)) => return Ok(unreadable(site, reason)),
            Err(e) => return Ok(unreadable(site, e.to_string())),
        },
        other => {
            return Ok(unreadable(
                site,
                format!("stored timestamp is {}, not text", other.data_type()),
            ))
        }
    };

    Ok(StoredRow::Record(StoredRecord {
        id,
        record: CredentialRecord {
            site,
            username,
            secret_ciphertext,
            created_at,
        },
    }))
}

/// Site and username are shown to the user as-is, whatever their type.
fn lossy_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Null => String::new(),
    }
}

/// Classify a SQLite error: damaged files are `CorruptedStore`, anything
/// else is `StorageUnavailable`.
fn storage_error(e: rusqlite::Error) -> VaultError {
    match e {
        rusqlite::Error::SqliteFailure(ref err, _)
            if matches!(err.code, ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt) =>
        {
            VaultError::CorruptedStore(e.to_string())
        }
        other => VaultError::StorageUnavailable(other.to_string()),
    }
}

/// Build a `LIKE` pattern matching `query` anywhere, with wildcards escaped.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Owner-only permissions on Unix; best effort.
fn restrict_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    #[cfg(not(unix))]
    let _ = path;
}
