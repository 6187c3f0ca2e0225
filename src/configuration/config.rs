use super::types::*;
use crate::error_handling::types::ConfigError;
use clap::Parser;
use log::info;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

/// Command-line arguments of the `mergington` binary.
///
/// Every value can also be provided through an environment variable, which is
/// how deployments usually point the service at its database (`DATABASE_URL`).
///
/// # Fields Overview
///
/// - `config_file`: optional TOML file whose keys take precedence over the flags
/// - `database_url`: SQLite connection string
/// - `bind_address`: IP address the HTTP server listens on
/// - `port`: TCP port of the HTTP server
/// - `max_connections`: size of the database connection pool
#[derive(Parser, Debug, Clone)]
#[command(name = "mergington")]
#[command(version)]
#[command(about = "API for viewing and signing up for extracurricular activities at Mergington High School")]
pub struct Args {
    /// Path to a TOML configuration file
    ///
    /// # Command Line
    /// Use `--config-file <PATH>` to set this value from the CLI
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Connection string of the relational store.
    ///
    /// Only SQLite is supported. Append `?mode=rwc` to have the file created when
    /// missing.
    ///
    /// # Command Line
    /// Use `--database-url <URL>` or the `DATABASE_URL` environment variable
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Network address to bind the server to.
    ///
    /// # Command Line
    /// Use `--bind-address <ADDRESS>` or `MERGINGTON_BIND_ADDRESS`
    #[arg(long, env = "MERGINGTON_BIND_ADDRESS", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind_address: String,

    /// Port number for the HTTP API and the static front-end.
    ///
    /// # Command Line
    /// Use `--port <PORT>` or `PORT`
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Maximum number of pooled database connections
    #[arg(long, env = "MERGINGTON_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub bind_address: IpAddr,
    pub port: u16,
    pub max_connections: u32,
}

impl Config {
    /// Builds the configuration from parsed arguments, reading `config_file`
    /// first when one was given.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        match &args.config_file {
            Some(path) => Self::from_file(path, args),
            None => Self::from_args(args),
        }
    }

    /// Validates the command-line (or environment) values as they are.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        Self::build(
            args.database_url.clone(),
            &args.bind_address,
            args.port,
            args.max_connections,
        )
    }

    /// Reads a TOML file and fills the keys it leaves out from `fallback`.
    pub fn from_file(path: &Path, fallback: &Args) -> Result<Self, ConfigError> {
        info!("Reading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        let file: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::TomlError(e.to_string()))?;

        Self::build(
            file.database_url.unwrap_or_else(|| fallback.database_url.clone()),
            file.bind_address.as_deref().unwrap_or(&fallback.bind_address),
            file.port.unwrap_or(fallback.port),
            file.max_connections.unwrap_or(fallback.max_connections),
        )
    }

    fn build(
        database_url: String,
        bind_address: &str,
        port: u16,
        max_connections: u32,
    ) -> Result<Self, ConfigError> {
        let bind_address: IpAddr = bind_address
            .trim()
            .parse()
            .map_err(|_| ConfigError::BadIPFormatting(bind_address.to_string()))?;

        if port == 0 {
            return Err(ConfigError::NotInRange(
                "port must be between 1 and 65535".to_string(),
            ));
        }
        if max_connections == 0 {
            return Err(ConfigError::NotInRange(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if !database_url.starts_with("sqlite:") {
            return Err(ConfigError::UnsupportedDatabase(database_url));
        }

        Ok(Self {
            database_url,
            bind_address,
            port,
            max_connections,
        })
    }

    /// Socket address the web server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}
