use std::{fs, path::Path, time::Duration};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "segview.toml";
pub const CONTROL_CHANNEL_PATH: &str = "/ws";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Origin of the segmentation backend, e.g. `http://127.0.0.1:8000`.
    pub server_url: String,
    pub reconnect_delay_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            reconnect_delay_ms: 2000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    reconnect_delay_ms: Option<u64>,
}

impl ClientSettings {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Control channel endpoint on the configured host. Secure origins map to
    /// `wss`, plain ones to `ws`.
    pub fn control_endpoint(&self) -> anyhow::Result<Url> {
        let mut url = Url::parse(self.server_url.trim())
            .with_context(|| format!("invalid server_url '{}'", self.server_url))?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            "http" | "ws" => "ws",
            other => {
                return Err(anyhow!(
                    "server_url must start with http://, https://, ws:// or wss:// (got {other}://)"
                ))
            }
        };
        url.set_scheme(scheme)
            .map_err(|_| anyhow!("cannot use scheme {scheme} for '{}'", self.server_url))?;
        url.set_path(CONTROL_CHANNEL_PATH);
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }
}

/// Defaults, then `segview.toml` (or `path`), then environment.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
            apply_file_overrides(&mut settings, &raw)
                .with_context(|| format!("invalid settings file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_SETTINGS_FILE) {
                if let Err(err) = apply_file_overrides(&mut settings, &raw) {
                    tracing::warn!(
                        file = DEFAULT_SETTINGS_FILE,
                        "ignoring unreadable settings file: {err:#}"
                    );
                }
            }
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

pub fn apply_file_overrides(settings: &mut ClientSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.reconnect_delay_ms {
        settings.reconnect_delay_ms = v;
    }
    Ok(())
}

pub fn apply_env_overrides<F>(settings: &mut ClientSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("SEGVIEW_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__RECONNECT_DELAY_MS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.reconnect_delay_ms = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring non-numeric APP__RECONNECT_DELAY_MS"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
