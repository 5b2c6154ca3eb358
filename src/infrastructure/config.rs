//! Application configuration

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::application::services::SyncMode;
use crate::domain::services::{DEFAULT_BYPASS_ZOOM, DEFAULT_CELL_CONSTANT};
use crate::domain::value_objects::ZoomLevel;

/// Smallest accepted clustering constant, keeping cell indices well inside `i64`
const MIN_CELL_CONSTANT: f64 = 1e-6;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// REST server port
    pub server_port: u16,
    /// Directory holding the server's collection file
    pub data_dir: PathBuf,

    /// SQLite URL of the local keyed store
    pub local_db_url: String,
    /// Base URL of the remote store, including the `/api` prefix
    pub remote_base_url: String,
    /// Backend used by viewing contexts
    pub sync_mode: SyncMode,
    pub local_poll_interval: Duration,
    pub remote_poll_interval: Duration,
    pub request_timeout: Duration,

    /// Clustering constant `K`, in degrees at zoom 0
    pub cell_constant: f64,
    pub cluster_bypass_zoom: ZoomLevel,
    /// Zoom the headless viewer reports markers at
    pub view_zoom: ZoomLevel,

    /// Mock events generated into an empty store at startup
    pub seed_count: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3001,
            data_dir: PathBuf::from("data"),
            local_db_url: "sqlite://emodus.db?mode=rwc".to_string(),
            remote_base_url: "http://localhost:3001/api".to_string(),
            sync_mode: SyncMode::Local,
            local_poll_interval: Duration::from_millis(2000),
            remote_poll_interval: Duration::from_millis(5000),
            request_timeout: Duration::from_secs(10),
            cell_constant: DEFAULT_CELL_CONSTANT,
            cluster_bypass_zoom: DEFAULT_BYPASS_ZOOM,
            view_zoom: ZoomLevel::new(6),
            seed_count: 0,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to [`AppConfig::default`]
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            server_port: parse_var("EMODUS_SERVER_PORT", defaults.server_port)
                .context("EMODUS_SERVER_PORT must be a valid port number")?,
            data_dir: env::var("EMODUS_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),

            local_db_url: env::var("EMODUS_LOCAL_DB").unwrap_or(defaults.local_db_url),
            remote_base_url: env::var("EMODUS_REMOTE_URL").unwrap_or(defaults.remote_base_url),
            sync_mode: match env::var("EMODUS_SYNC_MODE") {
                Ok(raw) => parse_sync_mode(&raw)?,
                Err(_) => defaults.sync_mode,
            },
            local_poll_interval: Duration::from_millis(
                parse_var("EMODUS_LOCAL_POLL_MS", 2000)
                    .context("EMODUS_LOCAL_POLL_MS must be a number of milliseconds")?,
            ),
            remote_poll_interval: Duration::from_millis(
                parse_var("EMODUS_REMOTE_POLL_MS", 5000)
                    .context("EMODUS_REMOTE_POLL_MS must be a number of milliseconds")?,
            ),
            request_timeout: Duration::from_secs(
                parse_var("EMODUS_REQUEST_TIMEOUT_SECS", 10)
                    .context("EMODUS_REQUEST_TIMEOUT_SECS must be a number of seconds")?,
            ),

            cell_constant: parse_var("EMODUS_CELL_CONSTANT", defaults.cell_constant)
                .context("EMODUS_CELL_CONSTANT must be a number")?,
            cluster_bypass_zoom: ZoomLevel::new(
                parse_var("EMODUS_CLUSTER_BYPASS_ZOOM", defaults.cluster_bypass_zoom.value())
                    .context("EMODUS_CLUSTER_BYPASS_ZOOM must be a zoom level")?,
            ),
            view_zoom: ZoomLevel::new(
                parse_var("EMODUS_VIEW_ZOOM", defaults.view_zoom.value())
                    .context("EMODUS_VIEW_ZOOM must be a zoom level")?,
            ),

            seed_count: parse_var("EMODUS_SEED_COUNT", defaults.seed_count)
                .context("EMODUS_SEED_COUNT must be a non-negative number")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Poll interval for the configured sync mode
    pub fn poll_interval(&self) -> Duration {
        match self.sync_mode {
            SyncMode::Local => self.local_poll_interval,
            SyncMode::Remote => self.remote_poll_interval,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.cell_constant.is_finite() || self.cell_constant < MIN_CELL_CONSTANT {
            bail!(
                "EMODUS_CELL_CONSTANT must be at least {}, got {}",
                MIN_CELL_CONSTANT,
                self.cell_constant
            );
        }
        if self.local_poll_interval.is_zero() || self.remote_poll_interval.is_zero() {
            bail!("Poll intervals must be greater than zero");
        }
        if self.request_timeout.is_zero() {
            bail!("EMODUS_REQUEST_TIMEOUT_SECS must be greater than zero");
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => Ok(raw.trim().parse()?),
        Err(_) => Ok(default),
    }
}

fn parse_sync_mode(raw: &str) -> Result<SyncMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "local" => Ok(SyncMode::Local),
        "remote" => Ok(SyncMode::Remote),
        other => bail!("EMODUS_SYNC_MODE must be `local` or `remote`, got `{other}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_mode() {
        assert_eq!(parse_sync_mode("local").unwrap(), SyncMode::Local);
        assert_eq!(parse_sync_mode(" Remote ").unwrap(), SyncMode::Remote);
        assert!(parse_sync_mode("cloud").is_err());
    }

    #[test]
    fn test_parse_var_falls_back_to_default() {
        let value: u64 = parse_var("EMODUS_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_validate_rejects_bad_cell_constant() {
        let config = AppConfig {
            cell_constant: 0.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            cell_constant: 1e-15,
            ..config
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            cell_constant: DEFAULT_CELL_CONSTANT,
            ..config
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval(), Duration::from_millis(2000));
    }
}
