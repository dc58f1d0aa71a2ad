mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    normalize_urls(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./arrbridge.toml",
        "~/.config/arrbridge/config.toml",
        "/etc/arrbridge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

fn normalize_urls(config: &mut Config) {
    if let Some(plex) = config.plex.as_mut() {
        plex.url = trim_url(&plex.url);
    }
    if let Some(sonarr) = config.sonarr.as_mut() {
        sonarr.url = trim_url(&sonarr.url);
    }
    if let Some(bazarr) = config.bazarr.as_mut() {
        bazarr.url = trim_url(&bazarr.url);
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(plex) = &config.plex {
        validate_plex(plex)?;
    }

    if let Some(sonarr) = &config.sonarr {
        validate_sonarr(sonarr)?;
    }

    if let Some(bazarr) = &config.bazarr {
        validate_bazarr(bazarr)?;
    }

    if config.commands.poll_interval_ms == 0 {
        anyhow::bail!("commands.poll_interval_ms cannot be 0");
    }

    if config.http.timeout_secs == 0 {
        anyhow::bail!("http.timeout_secs cannot be 0");
    }

    Ok(())
}

pub fn validate_plex(plex: &PlexConfig) -> Result<()> {
    require("plex", "url", &plex.url)?;
    require("plex", "token", &plex.token)?;
    require("plex", "section_id", &plex.section_id)
}

pub fn validate_sonarr(sonarr: &SonarrConfig) -> Result<()> {
    require("sonarr", "url", &sonarr.url)?;
    require("sonarr", "api_key", &sonarr.api_key)
}

pub fn validate_bazarr(bazarr: &BazarrConfig) -> Result<()> {
    require("bazarr", "url", &bazarr.url)?;
    require("bazarr", "api_key", &bazarr.api_key)
}

fn require(section: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("[{}] {} is not set", section, field);
    }
    Ok(())
}
