use serde::Deserialize;

/// Default SQLite database, created next to the working directory on first start.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://mergington_activities.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Shape of the optional TOML configuration file.
///
/// Every key is optional; a missing key falls back to the command line (or its
/// environment variable / default).
///
/// ```toml
/// database_url = "sqlite:///var/lib/mergington/activities.db?mode=rwc"
/// bind_address = "127.0.0.1"
/// port = 8080
/// max_connections = 4
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub database_url: Option<String>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub max_connections: Option<u32>,
}
