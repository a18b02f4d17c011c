use std::{collections::HashMap, fs};

use anyhow::{anyhow, Context};
use secrecy::SecretString;
use url::Url;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.kcisa.kr/openapi/API_CIA_098/request";

#[derive(Debug)]
pub struct Settings {
    pub server_bind: String,
    pub upstream_url: String,
    pub service_key: Option<String>,
    pub static_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            upstream_url: DEFAULT_UPSTREAM_URL.into(),
            service_key: None,
            static_dir: None,
        }
    }
}

impl Settings {
    /// The upstream credential; missing or blank is a startup error.
    pub fn service_key(&self) -> anyhow::Result<SecretString> {
        self.service_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| SecretString::from(key.to_string()))
            .ok_or_else(|| {
                anyhow!("SERVICE_KEY is not configured; set it in the environment or server.toml")
            })
    }

    pub fn upstream_url(&self) -> anyhow::Result<Url> {
        Url::parse(self.upstream_url.trim())
            .with_context(|| format!("invalid upstream url '{}'", self.upstream_url))
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string("server.toml").ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

pub(crate) fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("upstream_url") {
                settings.upstream_url = v.clone();
            }
            if let Some(v) = file_cfg.get("service_key") {
                settings.service_key = Some(v.clone());
            }
            if let Some(v) = file_cfg.get("static_dir") {
                settings.static_dir = Some(v.clone());
            }
        }
    }

    if let Some(port) = env("PORT").filter(|port| port.trim().parse::<u16>().is_ok()) {
        settings.server_bind = format!("0.0.0.0:{}", port.trim());
    }
    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("UPSTREAM_URL") {
        settings.upstream_url = v;
    }
    if let Some(v) = env("APP__UPSTREAM_URL") {
        settings.upstream_url = v;
    }

    if let Some(v) = env("SERVICE_KEY") {
        settings.service_key = Some(v);
    }
    if let Some(v) = env("APP__SERVICE_KEY") {
        settings.service_key = Some(v);
    }

    if let Some(v) = env("STATIC_DIR") {
        settings.static_dir = Some(v);
    }
    if let Some(v) = env("APP__STATIC_DIR") {
        settings.static_dir = Some(v);
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
