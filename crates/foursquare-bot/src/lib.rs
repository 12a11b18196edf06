use std::path::PathBuf;

use anyhow::{Context, Result};
use foursquare_client::{ClientConfig, FoursquareClient};
use tracing::info;

pub mod extract;
pub mod format;
pub mod handler;
pub mod message;
pub mod settings;
pub mod transport;
pub mod triage;

pub use handler::{FoursquareHandler, HandleOutcome, HandlerError};
pub use message::{ChatClient, DisplayRecipient, InboundMessage, MessageType, OutboundReply};
pub use settings::{ApiKey, SettingsError};

/// Inputs required to build a ready-to-use handler.
#[derive(Debug, Clone, Default)]
pub struct BotConfig {
    /// Settings file holding the API key; see [`settings::resolve_settings_path`].
    pub settings_path: Option<PathBuf>,
    pub client: ClientConfig,
}

/// Loads the API key once and wires it into a handler backed by the real API.
pub fn bootstrap(config: BotConfig) -> Result<FoursquareHandler> {
    let path = settings::resolve_settings_path(config.settings_path.as_deref())?;
    let api_key = settings::load_api_key(&path)
        .with_context(|| format!("failed to load API key from {}", path.display()))?;
    let client = FoursquareClient::with_config(config.client)?;

    info!(
        target: "foursquare_bot",
        settings = %path.display(),
        base_url = client.base_url(),
        "Foursquare handler ready"
    );
    Ok(FoursquareHandler::new(client, api_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn bootstrap_loads_key_from_explicit_path() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("settings.ini");
        std::fs::write(&path, "[Foursquare]\napi_key = abcdefghijksm\n").expect("write");

        let handler = bootstrap(BotConfig {
            settings_path: Some(path),
            ..BotConfig::default()
        })
        .expect("bootstrap succeeds");
        assert_eq!(handler.search().base_url(), foursquare_client::DEFAULT_BASE_URL);
    }

    #[test]
    fn bootstrap_fails_without_settings() {
        let dir = tempdir().expect("tempdir");
        let result = bootstrap(BotConfig {
            settings_path: Some(dir.path().join("missing.ini")),
            ..BotConfig::default()
        });
        let error = result.expect_err("missing settings are fatal");
        assert!(error.downcast_ref::<SettingsError>().is_some());
    }
}
