//! Sonarr v3 API client.

use crate::config::SonarrConfig;
use crate::error::Result;
use crate::remote::{
    Command, CommandApi, CommandSpec, EntityId, RemoteEntity, RenamePreview, SeriesCatalog,
    SeriesManager,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct SonarrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SonarrClient {
    pub fn new(config: &SonarrConfig, timeout: Duration) -> Self {
        Self {
            client: super::http_client(timeout),
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v3{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        tracing::debug!("GET {} {:?}", path, query);
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let body = super::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        tracing::debug!("POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let body = super::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct SonarrSeries {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

impl From<SonarrSeries> for RemoteEntity {
    fn from(series: SonarrSeries) -> Self {
        RemoteEntity {
            id: series.id.map(EntityId::Int),
            title: series.title.unwrap_or_default(),
            slug: None,
            path: series.path,
        }
    }
}

#[async_trait]
impl SeriesCatalog for SonarrClient {
    async fn search(&self, term: &str) -> Result<Vec<RemoteEntity>> {
        let results: Vec<SonarrSeries> = self.get("/series/lookup", &[("term", term)]).await?;
        Ok(results.into_iter().map(RemoteEntity::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<RemoteEntity>> {
        let results: Vec<SonarrSeries> = self.get("/series", &[]).await?;
        Ok(results.into_iter().map(RemoteEntity::from).collect())
    }
}

#[async_trait]
impl CommandApi for SonarrClient {
    async fn submit_command(&self, spec: &CommandSpec) -> Result<Command> {
        tracing::info!("[Command] {}", spec.name);
        self.post("/command", spec).await
    }

    async fn command(&self, id: i64) -> Result<Command> {
        self.get(&format!("/command/{}", id), &[]).await
    }
}

#[async_trait]
impl SeriesManager for SonarrClient {
    async fn rename_preview(&self, series: &EntityId) -> Result<Vec<RenamePreview>> {
        let series = series.to_string();
        self.get("/rename", &[("seriesId", series.as_str())]).await
    }
}
