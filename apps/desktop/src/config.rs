use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context};
use client_core::transport::DEFAULT_BACKEND_URL;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "desktop.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            log_filter: "info".into(),
        }
    }
}

/// Defaults, then `config_path` (flat string table), then environment.
/// Command-line overrides are applied by the caller.
pub fn load_settings(config_path: &Path) -> anyhow::Result<Settings> {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        let file_cfg = toml::from_str::<HashMap<String, String>>(&raw)
            .with_context(|| format!("failed to parse config file '{}'", config_path.display()))?;
        if let Some(v) = file_cfg.get("backend_url") {
            settings.backend_url = v.clone();
        }
        if let Some(v) = file_cfg.get("log_filter") {
            settings.log_filter = v.clone();
        }
    }

    if let Some(v) = env("BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = env("APP__BACKEND_URL") {
        settings.backend_url = v;
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings.backend_url = normalize_backend_url(&settings.backend_url)?;
    Ok(settings)
}

pub fn normalize_backend_url(raw_backend_url: &str) -> anyhow::Result<String> {
    let raw_backend_url = raw_backend_url.trim();

    if raw_backend_url.is_empty() {
        return Ok(Settings::default().backend_url);
    }

    let parsed = Url::parse(raw_backend_url)
        .with_context(|| format!("invalid backend url '{raw_backend_url}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "backend url '{raw_backend_url}' must use http or https, got '{}'",
            parsed.scheme()
        );
    }

    Ok(raw_backend_url.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
