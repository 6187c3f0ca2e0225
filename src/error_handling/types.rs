use std::fmt;

use warp::http::StatusCode;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    BadIPFormatting(String),
    NotInRange(String),
    UnsupportedDatabase(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::BadIPFormatting(e) => write!(f, "IP formatting error: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
            ConfigError::UnsupportedDatabase(e) => write!(f, "Unsupported database: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum StorageError {
    ConnectionFailed,
    WriteFailed,
    ReadFailed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionFailed => write!(f, "Storage connection failed"),
            StorageError::WriteFailed => write!(f, "Storage write failed"),
            StorageError::ReadFailed => write!(f, "Storage read failed"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Reasons a signup or unregistration request is turned down.
///
/// Apart from `Storage`, a rejected request leaves the store untouched.
#[derive(Debug, PartialEq, Eq)]
pub enum RegistrationError {
    ActivityNotFound,
    UserNotFound,
    ActivityFull,
    AlreadySignedUp,
    NotSignedUp,
    Storage(StorageError),
}

impl RegistrationError {
    /// HTTP status surfaced to the caller for this rejection.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistrationError::ActivityNotFound | RegistrationError::UserNotFound => {
                StatusCode::NOT_FOUND
            }
            RegistrationError::ActivityFull
            | RegistrationError::AlreadySignedUp
            | RegistrationError::NotSignedUp => StatusCode::BAD_REQUEST,
            RegistrationError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human readable message placed in the `detail` field of error bodies.
    pub fn detail(&self) -> &'static str {
        match self {
            RegistrationError::ActivityNotFound => "Activity not found",
            RegistrationError::UserNotFound => "User not found",
            RegistrationError::ActivityFull => "Activity is full",
            RegistrationError::AlreadySignedUp => "Student is already signed up",
            RegistrationError::NotSignedUp => "Student is not signed up for this activity",
            RegistrationError::Storage(_) => "Internal storage error",
        }
    }
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::Storage(e) => write!(f, "Registration storage error: {}", e),
            other => write!(f, "{}", other.detail()),
        }
    }
}

impl std::error::Error for RegistrationError {}

impl From<StorageError> for RegistrationError {
    fn from(err: StorageError) -> Self {
        RegistrationError::Storage(err)
    }
}
