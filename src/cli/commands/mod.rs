//! One module per subcommand.
//!
//! Each exposes `execute`, which builds and unlocks a session, and most
//! expose `run`, which works on an already-unlocked session so the
//! interactive shell can reuse it.

pub mod add;
pub mod backup;
pub mod delete;
pub mod init;
pub mod list;
pub mod restore;
pub mod search;
pub mod shell;
