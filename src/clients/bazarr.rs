//! Bazarr API client.
//!
//! Bazarr mirrors Sonarr's catalog; entities are identified by their
//! Sonarr series and episode ids.

use crate::config::BazarrConfig;
use crate::error::Result;
use crate::remote::{EntityId, RemoteEntity, SeriesCatalog, SubtitleService};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub struct BazarrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BazarrClient {
    pub fn new(config: &BazarrConfig, timeout: Duration) -> Self {
        Self {
            client: super::http_client(timeout),
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    async fn get_text(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        super::read_body(response).await
    }

    async fn get_list<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Vec<T>> {
        let body = self.get_text(endpoint, query).await?;
        let listing: Listing<T> = serde_json::from_str(&body)?;
        Ok(listing.into_vec())
    }
}

/// List payloads come either bare or wrapped in `{"data": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BazarrSeries {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    sonarr_series_id: Option<i64>,
}

impl From<BazarrSeries> for RemoteEntity {
    fn from(series: BazarrSeries) -> Self {
        RemoteEntity {
            id: series.sonarr_series_id.map(EntityId::Int),
            title: series.title.unwrap_or_default(),
            slug: None,
            path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BazarrEpisode {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    sonarr_episode_id: Option<i64>,
    #[serde(default)]
    path: Option<String>,
}

impl From<BazarrEpisode> for RemoteEntity {
    fn from(episode: BazarrEpisode) -> Self {
        RemoteEntity {
            id: episode.sonarr_episode_id.map(EntityId::Int),
            title: episode.title.unwrap_or_default(),
            slug: None,
            path: episode.path,
        }
    }
}

#[async_trait]
impl SeriesCatalog for BazarrClient {
    async fn search(&self, term: &str) -> Result<Vec<RemoteEntity>> {
        let results: Vec<BazarrSeries> = self.get_list("/api/system/searches", &[("query", term)]).await?;
        Ok(results
            .into_iter()
            // Movie hits carry no Sonarr id and are dropped by the resolver.
            .map(RemoteEntity::from)
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<RemoteEntity>> {
        let series: Vec<BazarrSeries> = self.get_list("/api/series", &[]).await?;
        Ok(series.into_iter().map(RemoteEntity::from).collect())
    }
}

#[async_trait]
impl SubtitleService for BazarrClient {
    async fn episodes(&self, series: &EntityId) -> Result<Vec<RemoteEntity>> {
        let series = series.to_string();
        let episodes: Vec<BazarrEpisode> = self
            .get_list("/api/episodes", &[("seriesid[]", series.as_str())])
            .await?;
        Ok(episodes.into_iter().map(RemoteEntity::from).collect())
    }

    async fn search_providers(&self, episode: &EntityId) -> Result<()> {
        let episode = episode.to_string();
        let body = self
            .get_text("/api/providers/episodes", &[("episodeid", episode.as_str())])
            .await?;
        tracing::debug!("Provider search response: {}", body);
        Ok(())
    }
}
