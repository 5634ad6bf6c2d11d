// ABOUTME: Configuration loading and validation for the slidecast service.
// ABOUTME: Everything comes from SLIDECAST_* environment variables with local-first defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SLIDECAST_BIND is not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("{0} is not a positive integer: {1}")]
    InvalidInterval(&'static str, String),
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SlidecastConfig {
    pub home: PathBuf,
    pub bind: SocketAddr,
    pub sink_name: Option<String>,
    pub sink_dir: PathBuf,
    pub autosave_interval: Duration,
    pub sink_check_interval: Duration,
}

impl SlidecastConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - SLIDECAST_HOME: data directory (default: ~/.slidecast)
    /// - SLIDECAST_BIND: socket address to bind (default: 127.0.0.1:7411)
    /// - SLIDECAST_SINK: initial output sink name (optional)
    /// - SLIDECAST_SINK_DIR: directory the sink files live in (default: <home>/sinks)
    /// - SLIDECAST_AUTOSAVE_SECS: autosave period in seconds (default: 30)
    /// - SLIDECAST_SINK_CHECK_SECS: sink liveness poll period in seconds (default: 1)
    pub fn from_env() -> Result<Self, ConfigError> {
        let home = std::env::var("SLIDECAST_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                std::env::var("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("/tmp"))
                    .join(".slidecast")
            });

        let bind_str =
            std::env::var("SLIDECAST_BIND").unwrap_or_else(|_| "127.0.0.1:7411".to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        let sink_name = std::env::var("SLIDECAST_SINK").ok().filter(|s| !s.is_empty());

        let sink_dir = std::env::var("SLIDECAST_SINK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join("sinks"));

        let autosave_interval = interval_from_env("SLIDECAST_AUTOSAVE_SECS", 30)?;
        let sink_check_interval = interval_from_env("SLIDECAST_SINK_CHECK_SECS", 1)?;

        Ok(Self {
            home,
            bind,
            sink_name,
            sink_dir,
            autosave_interval,
            sink_check_interval,
        })
    }
}

fn interval_from_env(var: &'static str, default_secs: u64) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => {
            let secs: u64 = raw
                .parse()
                .ok()
                .filter(|&s| s > 0)
                .ok_or_else(|| ConfigError::InvalidInterval(var, raw))?;
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(Duration::from_secs(default_secs)),
    }
}
