use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Time-related constants
// =============================================================================

/// Minimum accepted recurrence interval (4 hours)
pub const MIN_INTERVAL_SECS: u64 = 14_400;

/// Timeout for fetch operations (30 seconds)
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration problems that must stop the scheduler from starting.
///
/// These are detected once at startup; failing fast here beats failing every
/// cycle.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("recurrence interval {0}s is below the minimum of {MIN_INTERVAL_SECS}s")]
    IntervalTooShort(u64),

    #[error("private server channel selected but privateServerUrl is not set")]
    MissingServerUrl,

    #[error("runningVersion must not be empty")]
    MissingRunningVersion,
}

/// When recurring checks run.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Recurrence {
    /// No recurring checks.
    #[default]
    Disabled,
    /// Once per day, anchored to local midnight.
    Daily,
    /// A fixed number of seconds after each completed check.
    EveryNSeconds(u64),
}

/// Which backend release metadata is fetched from.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SourceChannel {
    #[default]
    Registry,
    PrivateServer,
}

/// Host-supplied configuration for the check engine.
///
/// The engine consumes this surface but does not own it; the host decides
/// where the values come from.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateConfig {
    /// Run one check during startup even when recurrence is disabled.
    pub check_at_startup: bool,
    pub recurrence: Recurrence,
    pub source_channel: SourceChannel,
    /// Required when `source_channel` is `PrivateServer`.
    pub private_server_url: Option<String>,
    /// Whether a detected update is surfaced in the shared notification
    /// state, or only returned to the immediate caller.
    pub force_banner: bool,
    /// Identity of the host application on the registry, e.g. "acme/wiki".
    pub project_identifier: String,
    /// Branch a qualifying release must target.
    pub stable_branch_name: String,
    /// Version the host is currently running.
    pub running_version: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            check_at_startup: true,
            recurrence: Recurrence::Disabled,
            source_channel: SourceChannel::Registry,
            private_server_url: None,
            force_banner: false,
            project_identifier: String::new(),
            stable_branch_name: "master".to_string(),
            running_version: String::new(),
        }
    }
}

impl UpdateConfig {
    /// Validates the invariants that must hold before any schedule starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Recurrence::EveryNSeconds(secs) = self.recurrence
            && secs < MIN_INTERVAL_SECS
        {
            return Err(ConfigError::IntervalTooShort(secs));
        }

        if self.source_channel == SourceChannel::PrivateServer
            && self.private_server_url.as_deref().unwrap_or("").is_empty()
        {
            return Err(ConfigError::MissingServerUrl);
        }

        if self.running_version.is_empty() {
            return Err(ConfigError::MissingRunningVersion);
        }

        Ok(())
    }
}

/// Returns the path to the data directory for upgrade-notify.
/// Uses $XDG_DATA_HOME/upgrade-notify if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/upgrade-notify,
/// or ./upgrade-notify if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file written in watch mode.
pub fn log_path() -> PathBuf {
    data_dir().join(LOG_FILE_NAME)
}

/// File name of the watch-mode log inside [`data_dir`].
pub const LOG_FILE_NAME: &str = "upgrade-notify.log";

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("upgrade-notify")
}
