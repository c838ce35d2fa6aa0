//! On-disk storage of the shared OTP secret.
//!
//! The secret lives in its own owner-only file next to (never inside)
//! the vault database, as a single line of base32 text.

use std::fs;
use std::path::Path;

use zeroize::Zeroizing;

use super::secret::SharedSecret;
use crate::errors::{Result, VaultError};

/// Write `secret` to a new file at `path`.
///
/// Refuses to overwrite an existing file: replacing the secret would make
/// every stored record undecryptable.
pub fn write_secret_file(path: &Path, secret: &SharedSecret) -> Result<()> {
    if path.exists() {
        return Err(VaultError::SecretFileError(format!(
            "secret file already exists at {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                VaultError::SecretFileError(format!("cannot create secret directory: {e}"))
            })?;
        }
    }

    let mut contents = secret.to_base32();
    contents.push('\n');

    fs::write(path, contents.as_bytes())
        .map_err(|e| VaultError::SecretFileError(format!("failed to write secret file: {e}")))?;

    // On Unix, restrict permissions to owner-only read/write.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, perms).map_err(|e| {
            VaultError::SecretFileError(format!("failed to set secret file permissions: {e}"))
        })?;
    }

    Ok(())
}

/// Load and parse the secret stored at `path`.
pub fn load_secret_file(path: &Path) -> Result<SharedSecret> {
    if !path.exists() {
        return Err(VaultError::SecretFileError(format!(
            "secret file not found at {}",
            path.display()
        )));
    }

    let contents = Zeroizing::new(
        fs::read_to_string(path)
            .map_err(|e| VaultError::SecretFileError(format!("failed to read secret file: {e}")))?,
    );

    SharedSecret::from_base32(&contents)
}
