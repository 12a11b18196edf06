//! Credential loading. The key is read once at startup; any problem here is
//! fatal for the process.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use config::{Config, File, FileFormat};
use directories::BaseDirs;
use thiserror::Error;
use tracing::debug;

pub const SETTINGS_PATH_ENV: &str = "FOURSQUARE_BOT_CONFIG";
const DEFAULT_RELATIVE_PATH: &str = "zulip/contrib_bots/bots/foursquare/FourSquareBot/settings.ini";
const SECTION: &str = "Foursquare";
const KEY: &str = "api_key";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unable to resolve the home directory for the default settings path")]
    NoHome,
    #[error("settings file not found at {0}")]
    Missing(PathBuf),
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },
    #[error("settings file {0} has no [Foursquare] api_key entry")]
    MissingKey(PathBuf),
}

/// Foursquare OAuth token. Immutable once loaded and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// `~/zulip/contrib_bots/bots/foursquare/FourSquareBot/settings.ini`.
pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_RELATIVE_PATH))
        .ok_or(SettingsError::NoHome)
}

/// Explicit path first, then `FOURSQUARE_BOT_CONFIG`, then the default.
pub fn resolve_settings_path(explicit: Option<&Path>) -> Result<PathBuf, SettingsError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    match std::env::var_os(SETTINGS_PATH_ENV) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => default_settings_path(),
    }
}

pub fn load_api_key(path: &Path) -> Result<ApiKey, SettingsError> {
    if !path.is_file() {
        return Err(SettingsError::Missing(path.to_path_buf()));
    }

    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Ini).required(true))
        .build()
        .map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    // Section names may or may not be lowercased depending on the parser.
    let value = [SECTION.to_string(), SECTION.to_lowercase()]
        .iter()
        .find_map(|section| settings.get_string(&format!("{section}.{KEY}")).ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| SettingsError::MissingKey(path.to_path_buf()))?;

    debug!(target: "foursquare_bot", path = %path.display(), "Loaded API key");
    Ok(ApiKey(value))
}
