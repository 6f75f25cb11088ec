//! Server configuration.
//!
//! The storage location is explicit configuration rather than a process-wide
//! assumption: it is resolved once at startup, validated, and handed to the
//! record store constructor.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "USER_DATA_DIR";
/// Environment variable overriding the users file name.
pub const USERS_FILE_ENV: &str = "USER_DATA_FILE";

/// Identity advertised to MCP clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: "UserDataServer".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Stores, retrieves and analyzes user records kept in a local JSON file"
                .to_string(),
        }
    }
}

/// Configuration for a [`crate::UserDataService`] and its MCP front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Directory holding the users file. Created on startup if missing.
    pub data_dir: PathBuf,
    /// File name of the JSON document inside `data_dir`.
    pub users_file: String,
    pub server_info: ServerInfo,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            users_file: "users.json".to_string(),
            server_info: ServerInfo::default(),
        }
    }
}

/// Configuration problems detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Data directory must not be empty")]
    EmptyDataDir,

    #[error("Users file name must be a plain file name, got '{0}'")]
    InvalidUsersFile(String),
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Defaults overridden by `USER_DATA_DIR` and `USER_DATA_FILE` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Ok(dir) = env::var(DATA_DIR_ENV) {
            builder = builder.data_dir(dir);
        }
        if let Ok(file) = env::var(USERS_FILE_ENV) {
            builder = builder.users_file(file);
        }
        builder.build()
    }

    /// Full path of the users file.
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        let file = self.users_file.as_str();
        if file.is_empty() || file == "." || file == ".." || file.contains(['/', '\\']) {
            return Err(ConfigError::InvalidUsersFile(self.users_file.clone()));
        }
        Ok(())
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = dir.into();
        self
    }

    pub fn users_file(mut self, file: impl Into<String>) -> Self {
        self.config.users_file = file.into();
        self
    }

    pub fn server_info(mut self, info: ServerInfo) -> Self {
        self.config.server_info = info;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
