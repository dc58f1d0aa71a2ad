use crate::command::PollSettings;
use crate::paths::PathRoots;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub plex: Option<PlexConfig>,

    #[serde(default)]
    pub sonarr: Option<SonarrConfig>,

    #[serde(default)]
    pub bazarr: Option<BazarrConfig>,

    #[serde(default)]
    pub paths: PathRoots,

    #[serde(default)]
    pub commands: CommandsConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlexConfig {
    #[serde(default)]
    pub url: String,

    /// Sent as the `X-Plex-Token` query parameter
    #[serde(default)]
    pub token: String,

    /// Library section used for listings and section refreshes
    #[serde(default)]
    pub section_id: String,
}

impl PlexConfig {
    /// Apply command-line values over the file values.
    pub fn with_overrides(mut self, url: Option<String>, token: Option<String>, section_id: Option<String>) -> Self {
        if let Some(url) = url {
            self.url = trim_url(&url);
        }
        if let Some(token) = token {
            self.token = token;
        }
        if let Some(section_id) = section_id {
            self.section_id = section_id;
        }
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SonarrConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub api_key: String,
}

impl SonarrConfig {
    pub fn with_overrides(mut self, url: Option<String>, api_key: Option<String>) -> Self {
        if let Some(url) = url {
            self.url = trim_url(&url);
        }
        if let Some(api_key) = api_key {
            self.api_key = api_key;
        }
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BazarrConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub api_key: String,
}

impl BazarrConfig {
    pub fn with_overrides(mut self, url: Option<String>, api_key: Option<String>) -> Self {
        if let Some(url) = url {
            self.url = trim_url(&url);
        }
        if let Some(api_key) = api_key {
            self.api_key = api_key;
        }
        self
    }
}

pub(crate) fn trim_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandsConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Timeouts below one second fall back to the default
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_timeout_ms() -> u64 {
    600_000
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl CommandsConfig {
    pub fn poll_settings(&self) -> PollSettings {
        PollSettings::from_millis(self.poll_interval_ms, self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_http_timeout() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
