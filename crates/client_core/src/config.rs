use std::{fs, io, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "blog_admin.toml";
pub const DEFAULT_API_BASE_URL: &str = "https://blog-api-production-c132.up.railway.app";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub login_redirect_delay: Duration,
    pub create_redirect_delay: Duration,
    pub notification_ttl: Duration,
    pub post_placeholders: usize,
    pub comment_placeholders: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            login_redirect_delay: Duration::from_millis(1500),
            create_redirect_delay: Duration::from_millis(1000),
            notification_ttl: Duration::from_millis(6000),
            post_placeholders: 6,
            comment_placeholders: 3,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    login_redirect_ms: Option<u64>,
    create_redirect_ms: Option<u64>,
    notification_ttl_ms: Option<u64>,
    post_placeholders: Option<usize>,
    comment_placeholders: Option<usize>,
}

/// Loads settings from `blog_admin.toml` (or `config_path`) and the process
/// environment, in that order of precedence.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<ClientSettings> {
    load_settings_from(config_path, |name| std::env::var(name).ok())
}

pub fn load_settings_from(
    config_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    let file_cfg = match config_path {
        Some(path) => read_file_settings(path)?
            .with_context(|| format!("config file '{}' does not exist", path.display()))?,
        None => read_file_settings(Path::new(DEFAULT_CONFIG_FILE))?.unwrap_or_default(),
    };

    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.login_redirect_ms {
        settings.login_redirect_delay = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.create_redirect_ms {
        settings.create_redirect_delay = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.notification_ttl_ms {
        settings.notification_ttl = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.post_placeholders {
        settings.post_placeholders = v;
    }
    if let Some(v) = file_cfg.comment_placeholders {
        settings.comment_placeholders = v;
    }

    if let Some(v) = env("BLOG_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(ms) = env_millis(&env, "APP__LOGIN_REDIRECT_MS")? {
        settings.login_redirect_delay = ms;
    }
    if let Some(ms) = env_millis(&env, "APP__CREATE_REDIRECT_MS")? {
        settings.create_redirect_delay = ms;
    }
    if let Some(ms) = env_millis(&env, "APP__NOTIFICATION_TTL_MS")? {
        settings.notification_ttl = ms;
    }

    settings.api_base_url = normalize_base_url(&settings.api_base_url)?;
    Ok(settings)
}

/// Validates an API base URL and strips any trailing slash so endpoint
/// paths can be appended directly.
pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).with_context(|| format!("invalid api base url '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("api base url '{raw}' must use http or https");
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn read_file_settings(path: &Path) -> anyhow::Result<Option<FileSettings>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    let parsed = toml::from_str::<FileSettings>(&raw)
        .with_context(|| format!("failed to parse '{}'", path.display()))?;
    Ok(Some(parsed))
}

fn env_millis(
    env: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> anyhow::Result<Option<Duration>> {
    let Some(raw) = env(name) else {
        return Ok(None);
    };
    let ms = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("{name} must be a number of milliseconds, got '{raw}'"))?;
    Ok(Some(Duration::from_millis(ms)))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
