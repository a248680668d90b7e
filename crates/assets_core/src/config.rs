use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use tracing::warn;

pub const DEFAULT_SETTINGS_FILE: &str = "assets.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetsSettings {
    pub api_base_url: String,
    pub assets_path: String,
    pub page_size: u64,
    pub max_file_size_mb: u64,
    pub max_file_count: usize,
    /// Zero disables the client-side timeout.
    pub request_timeout_secs: u64,
}

impl Default for AssetsSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8001".into(),
            assets_path: "/assets/".into(),
            page_size: 50,
            max_file_size_mb: 10,
            max_file_count: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl AssetsSettings {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// `assets_path` with exactly one trailing slash.
    pub fn assets_root(&self) -> String {
        format!("{}/", self.assets_path.trim_end_matches('/'))
    }
}

/// Defaults, then `assets.toml` in the working directory, then the environment.
pub fn load_settings() -> anyhow::Result<AssetsSettings> {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<AssetsSettings> {
    let mut settings = AssetsSettings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        let file_cfg: HashMap<String, toml::Value> = toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        apply_file_settings(&mut settings, &file_cfg);
    }

    apply_env_settings(&mut settings, env);
    Ok(settings)
}

fn apply_file_settings(settings: &mut AssetsSettings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("api_base_url").and_then(toml::Value::as_str) {
        settings.api_base_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("assets_path").and_then(toml::Value::as_str) {
        settings.assets_path = v.to_string();
    }
    if let Some(v) = file_u64(file_cfg, "page_size") {
        settings.page_size = v;
    }
    if let Some(v) = file_u64(file_cfg, "max_file_size_mb") {
        settings.max_file_size_mb = v;
    }
    if let Some(v) = file_u64(file_cfg, "max_file_count") {
        settings.max_file_count = v as usize;
    }
    if let Some(v) = file_u64(file_cfg, "request_timeout_secs") {
        settings.request_timeout_secs = v;
    }
}

fn file_u64(file_cfg: &HashMap<String, toml::Value>, key: &str) -> Option<u64> {
    file_cfg
        .get(key)
        .and_then(toml::Value::as_integer)
        .and_then(|v| u64::try_from(v).ok())
}

fn apply_env_settings(settings: &mut AssetsSettings, env: impl Fn(&str) -> Option<String>) {
    let lookup = |key: &str| env(&format!("APP__{key}")).or_else(|| env(key));

    if let Some(v) = lookup("ASSETS_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("ASSETS_PATH") {
        settings.assets_path = v;
    }
    if let Some(v) = parse_env(&lookup, "ASSETS_PAGE_SIZE") {
        settings.page_size = v;
    }
    if let Some(v) = parse_env(&lookup, "ASSETS_MAX_FILE_SIZE_MB") {
        settings.max_file_size_mb = v;
    }
    if let Some(v) = parse_env(&lookup, "ASSETS_MAX_FILE_COUNT") {
        settings.max_file_count = v as usize;
    }
    if let Some(v) = parse_env(&lookup, "ASSETS_REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v;
    }
}

fn parse_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring non-numeric setting");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
