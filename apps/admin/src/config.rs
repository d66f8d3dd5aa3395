use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSettings {
    pub api_url: String,
    pub token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080".into(),
            token: None,
            request_timeout_secs: 30,
        }
    }
}

impl AdminSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    token: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `config_path` when it exists, then the variables `lookup`
/// resolves.
pub fn load_settings(
    config_path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> AdminSettings {
    let mut settings = AdminSettings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, lookup);

    settings
}

fn apply_file(settings: &mut AdminSettings, raw: &str) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!(error = %err, "ignoring malformed settings file");
            return;
        }
    };

    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.token {
        settings.token = Some(v);
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
}

fn apply_env(settings: &mut AdminSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("FORUM_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = lookup("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = lookup("FORUM_API_TOKEN") {
        settings.token = Some(v);
    }
    if let Some(v) = lookup("APP__API_TOKEN") {
        settings.token = Some(v);
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
