//! Error types shared across the configuration, storage and web layers.

pub mod types;

pub use types::{ConfigError, RegistrationError, StorageError};
