//! # Application Configuration
//!
//! Configuration loaded from environment variables and validated on startup
//! to fail fast if misconfigured.
//!
//! Use [`core_config()`] to access the global instance after a single
//! [`init_config()`] call at application startup.

use lib_utils::envs::get_env_or;
use std::sync::OnceLock;

/// Where the account directory lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectoryMode {
    /// Resolve identities against a remote directory service over HTTP.
    Http,
    /// In-process static directory, for local development and tests.
    Static,
}

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Account directory mode (`DIRECTORY_MODE`: `http` | `static`)
    pub directory_mode: DirectoryMode,

    /// Base URL of the account directory service; required in HTTP mode
    pub directory_url: Option<String>,

    /// Whether typing broadcasts echo back to the originating connection
    ///
    /// Defaults to `false`, mirroring the sender exclusion applied to
    /// `new message` fan-out.
    pub typing_include_sender: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = get_env_or("DATABASE_URL", "sqlite:data/chat.db");

        let directory_mode = match get_env_or("DIRECTORY_MODE", "http").to_lowercase().as_str() {
            "http" => DirectoryMode::Http,
            "static" => DirectoryMode::Static,
            other => return Err(format!("DIRECTORY_MODE must be 'http' or 'static', got '{}'", other)),
        };

        let directory_url = std::env::var("DIRECTORY_URL").ok();

        let typing_include_sender = get_env_or("TYPING_INCLUDE_SENDER", "false")
            .parse()
            .map_err(|e| format!("TYPING_INCLUDE_SENDER must be a boolean: {}", e))?;

        Ok(Self {
            database_url,
            directory_mode,
            directory_url,
            typing_include_sender,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.directory_mode == DirectoryMode::Http {
            match self.directory_url.as_deref() {
                Some(url) if url.starts_with("http://") || url.starts_with("https://") => {}
                Some(_) => return Err("DIRECTORY_URL must be an http(s) URL".to_string()),
                None => return Err("DIRECTORY_URL must be set when DIRECTORY_MODE=http".to_string()),
            }
        }

        Ok(())
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// # Errors
///
/// Returns an error if environment variables are invalid, validation fails,
/// or the config has already been initialized.
pub fn init_config() -> Result<(), String> {
    let config = Config::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| "Config has already been initialized".to_string())
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn core_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Config must be initialized with init_config() before use")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_mode_requires_directory_url() {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            directory_mode: DirectoryMode::Http,
            directory_url: None,
            typing_include_sender: false,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn static_mode_needs_no_url() {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            directory_mode: DirectoryMode::Static,
            directory_url: None,
            typing_include_sender: true,
        };
        assert!(config.validate().is_ok());
    }
}
