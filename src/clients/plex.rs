//! Plex Media Server client.
//!
//! Plex answers with XML `MediaContainer` documents. They are parsed once
//! into typed structs and flattened into [`MediaNode`]s.

use crate::config::PlexConfig;
use crate::error::{ClientError, Result};
use crate::remote::{EntityId, MediaLibrary, MediaNode, NodeKind, RemoteEntity, SeriesCatalog};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const TOKEN_PARAM: &str = "X-Plex-Token";

pub struct PlexClient {
    client: Client,
    base_url: String,
    token: String,
    section_id: String,
}

impl PlexClient {
    pub fn new(config: &PlexConfig, timeout: Duration) -> Self {
        Self {
            client: super::http_client(timeout),
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            section_id: config.section_id.clone(),
        }
    }

    /// Library section this client lists.
    pub fn section_id(&self) -> &str {
        &self.section_id
    }

    async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[(TOKEN_PARAM, self.token.as_str())])
            .header(reqwest::header::ACCEPT, "application/xml")
            .send()
            .await?;

        super::read_body(response).await
    }

    async fn get_nodes(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Vec<MediaNode>> {
        let body = self.get(endpoint, query).await?;
        parse_nodes(&body)
    }

    fn top_level(nodes: Vec<MediaNode>) -> Vec<RemoteEntity> {
        nodes
            .into_iter()
            .filter(|n| n.kind.is_top_level())
            .map(|n| n.to_entity())
            .collect()
    }
}

#[async_trait]
impl SeriesCatalog for PlexClient {
    async fn search(&self, term: &str) -> Result<Vec<RemoteEntity>> {
        let nodes = self.get_nodes("/search", &[("query", term)]).await?;
        Ok(Self::top_level(nodes))
    }

    async fn list_all(&self) -> Result<Vec<RemoteEntity>> {
        let endpoint = format!("/library/sections/{}/all", self.section_id);
        let nodes = self.get_nodes(&endpoint, &[]).await?;
        Ok(Self::top_level(nodes))
    }
}

#[async_trait]
impl MediaLibrary for PlexClient {
    async fn children(&self, key: &EntityId) -> Result<Vec<MediaNode>> {
        self.get_nodes(&format!("/library/metadata/{}/children", key), &[])
            .await
    }

    async fn metadata(&self, key: &EntityId) -> Result<MediaNode> {
        self.get_nodes(&format!("/library/metadata/{}", key), &[])
            .await?
            .into_iter()
            .next()
            .ok_or(ClientError::MissingField("metadata"))
    }

    async fn refresh_item(&self, key: &EntityId) -> Result<()> {
        self.get(&format!("/library/metadata/{}/refresh", key), &[])
            .await
            .map(|_| ())
    }

    async fn refresh_path(&self, section: &str, path: &str) -> Result<()> {
        self.get(&format!("/library/sections/{}/refresh", section), &[("path", path)])
            .await
            .map(|_| ())
    }

    async fn refresh_section(&self, section: &str) -> Result<()> {
        self.get(&format!("/library/sections/{}/refresh", section), &[])
            .await
            .map(|_| ())
    }
}

/// Parse a `MediaContainer` document into nodes.
///
/// Directories come first, then videos, each in document order. Elements
/// without a rating key are dropped.
pub fn parse_nodes(xml: &str) -> Result<Vec<MediaNode>> {
    let container: MediaContainer = quick_xml::de::from_str(xml)?;

    Ok(container
        .directories
        .into_iter()
        .chain(container.videos)
        .filter_map(XmlItem::into_node)
        .collect())
}

#[derive(Debug, Default, Deserialize)]
struct MediaContainer {
    #[serde(rename = "Directory", default)]
    directories: Vec<XmlItem>,
    #[serde(rename = "Video", default)]
    videos: Vec<XmlItem>,
}

#[derive(Debug, Default, Deserialize)]
struct XmlItem {
    #[serde(rename = "@ratingKey", default)]
    rating_key: Option<String>,
    #[serde(rename = "@type", default)]
    kind: Option<String>,
    #[serde(rename = "@title", default)]
    title: Option<String>,
    #[serde(rename = "@slug", default)]
    slug: Option<String>,
    #[serde(rename = "@parentRatingKey", default)]
    parent_rating_key: Option<String>,
    #[serde(rename = "@parentKey", default)]
    parent_key: Option<String>,
    #[serde(rename = "Media", default)]
    media: Vec<XmlMedia>,
}

impl XmlItem {
    fn into_node(self) -> Option<MediaNode> {
        let key = self.rating_key.filter(|k| !k.is_empty())?;
        let parent = self
            .parent_rating_key
            .filter(|k| !k.is_empty())
            .or_else(|| self.parent_key.as_deref().and_then(key_from_path));

        let files = self
            .media
            .into_iter()
            .flat_map(|m| m.parts)
            .filter_map(|p| p.file)
            .collect();

        Some(MediaNode {
            key: EntityId::Text(key),
            kind: NodeKind::parse(self.kind.as_deref().unwrap_or_default()),
            title: self.title.unwrap_or_default(),
            slug: self.slug,
            parent_key: parent.map(EntityId::Text),
            files,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct XmlMedia {
    #[serde(rename = "Part", default)]
    parts: Vec<XmlPart>,
}

#[derive(Debug, Default, Deserialize)]
struct XmlPart {
    #[serde(rename = "@file", default)]
    file: Option<String>,
}

/// Rating key from a `/library/metadata/<n>` reference.
fn key_from_path(path: &str) -> Option<String> {
    let key = path.strip_prefix("/library/metadata/")?;
    let key = key.split('/').next()?;
    (!key.is_empty() && key.chars().all(|c| c.is_ascii_digit())).then(|| key.to_string())
}
