//! Time-based one-time passcodes gating vault unlock.
//!
//! This module provides:
//! - The `SharedSecret` type (`secret`) and its on-disk file (`secret_file`)
//! - RFC 6238 code computation and constant-time checking (`totp`)
//! - The one-shot `OtpGate` state machine (`gate`)

pub mod gate;
pub mod secret;
pub mod secret_file;
pub mod totp;

pub use gate::{GateState, OtpGate};
pub use secret::SharedSecret;
pub use secret_file::{load_secret_file, write_secret_file};
pub use totp::{code_at, verify_code, OtpCode, TotpParams};
