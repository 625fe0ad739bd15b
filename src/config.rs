//! Configuration management for keywarden.
//!
//! Handles loading settings from `data/config.json` and the CouchDB
//! credentials from the environment.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Default location of the configuration file, relative to the working
/// directory.
pub const CONFIG_PATH: &str = "data/config.json";

const DEFAULT_UPDATE_INTERVAL_SECONDS: u64 = 21_600;

/// Application configuration settings.
///
/// The JSON key names are fixed by the deployed config file format; unknown
/// keys are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    /// Seconds between two synchronization ticks. Defaults to 6 hours.
    #[serde(
        rename = "UpdateIntervalSeconds",
        default = "default_update_interval"
    )]
    pub update_interval_seconds: u64,
    /// Base URLs of the OpenID Connect providers to pull signing keys from
    /// (no trailing slash).
    #[serde(rename = "IdPs", default)]
    pub idps: Vec<String>,
    /// Base URLs of the CouchDB servers whose clusters receive the keys.
    #[serde(rename = "CouchDBservers", default)]
    pub couchdb_servers: Vec<String>,
    /// HTTP Basic credentials for every CouchDB endpoint. Filled from the
    /// environment, never from the config file.
    #[serde(skip)]
    pub credentials: Option<Credentials>,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// CouchDB HTTP Basic credentials.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl Credentials {
    /// Reads `COUCHDB_USER` and `COUCHDB_PWD` from the environment.
    /// `COUCHDB_PASSWORD` is accepted as an alias since some deployments
    /// document that name. Returns `None` when either half is missing;
    /// CouchDB calls then fail as unauthorized instead of blocking startup.
    pub fn from_env() -> Option<Self> {
        let user = std::env::var("COUCHDB_USER").ok()?;
        let password = std::env::var("COUCHDB_PWD")
            .or_else(|_| std::env::var("COUCHDB_PASSWORD"))
            .ok()?;
        Some(Self { user, password })
    }
}

fn default_update_interval() -> u64 {
    DEFAULT_UPDATE_INTERVAL_SECONDS
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFormat {
    /// JSON format - structured logging suitable for log aggregation
    /// systems.
    ///
    /// Default.
    #[default]
    Json,
    /// Pretty format - human-readable output for development.
    Pretty,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Debug,
    Trace,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Output format for log messages
    #[serde(default)]
    pub format: LoggingFormat,

    /// Global log level for the application
    #[serde(default)]
    pub level: LogLevel,

    /// Log level for the axum web framework
    #[serde(default)]
    pub axum_level: LogLevel,

    /// Service name to attach to logs and spans
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Whether to enable OpenTelemetry (OTLP) exporting
    #[serde(default)]
    pub otlp_enabled: bool,
}

fn default_service_name() -> String {
    "keywarden".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: Default::default(),
            level: LogLevel::Info,
            axum_level: LogLevel::Info,
            service_name: default_service_name(),
            otlp_enabled: false,
        }
    }
}

/// Loads the settings from `path` and merges in the environment
/// credentials.
///
/// A missing or unparsable file is fatal; missing credentials are not.
pub fn load(path: &str) -> Result<Settings> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| SyncError::Config(format!("{path}: {e}")))?;
    let mut settings: Settings =
        serde_json::from_str(&raw).map_err(|e| SyncError::Config(format!("{path}: {e}")))?;
    settings.credentials = Credentials::from_env();
    Ok(settings)
}
