//! Server configuration from command line and environment

use clap::{Parser, ValueEnum};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the database inside whichever directory is selected
pub const DATABASE_FILE_NAME: &str = "database.sqlite";

/// Persistent disk mount checked at startup
pub const DEFAULT_DATA_MOUNT: &str = "/var/data";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address '{0}': {1}")]
    InvalidBindAddress(String, std::net::AddrParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How `/api/login` treats an unknown email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AccountMode {
    /// Accounts come only from `/api/register`; login never creates one
    #[default]
    Strict,
    /// Login creates the account on first use; `/api/register` is not mounted
    AutoRegister,
}

/// Blog backend server
#[derive(Parser, Debug)]
#[command(name = "blog-server", version, about, long_about = None)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Database file (overrides mount detection)
    #[arg(long, env = "DATABASE_PATH")]
    pub database_path: Option<PathBuf>,

    /// Persistent disk mount; used for the database when it exists
    #[arg(long, env = "DATA_MOUNT", default_value = DEFAULT_DATA_MOUNT)]
    pub data_mount: PathBuf,

    /// Login behavior for unknown emails
    #[arg(long, env = "ACCOUNT_MODE", value_enum, default_value = "strict")]
    pub account_mode: AccountMode,

    /// Directory of static site files to serve next to the API
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

/// Where the database file was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageLocation {
    /// Given explicitly
    Explicit,
    /// Persistent disk mount
    Mount,
    /// Process working directory
    Local,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_path: PathBuf,
    pub storage_location: StorageLocation,
    pub account_mode: AccountMode,
    pub static_dir: Option<PathBuf>,
}

impl Cli {
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let ip: IpAddr = self
            .bind
            .parse()
            .map_err(|e| ConfigError::InvalidBindAddress(self.bind.clone(), e))?;
        let bind_address = SocketAddr::new(ip, self.port);

        let cwd = std::env::current_dir()?;
        let (database_path, storage_location) =
            resolve_database_path(self.database_path, &self.data_mount, &cwd);

        Ok(Config {
            bind_address,
            database_path,
            storage_location,
            account_mode: self.account_mode,
            static_dir: self.static_dir,
        })
    }
}

/// Pick the database file: explicit path, else the mount if it exists, else `cwd`.
pub fn resolve_database_path(
    explicit: Option<PathBuf>,
    data_mount: &Path,
    cwd: &Path,
) -> (PathBuf, StorageLocation) {
    if let Some(path) = explicit {
        return (path, StorageLocation::Explicit);
    }
    if data_mount.is_dir() {
        return (data_mount.join(DATABASE_FILE_NAME), StorageLocation::Mount);
    }
    (cwd.join(DATABASE_FILE_NAME), StorageLocation::Local)
}
