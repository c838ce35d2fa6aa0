//! Configuration loaded from `.otpvault.toml`.

pub mod settings;

pub use settings::Settings;
