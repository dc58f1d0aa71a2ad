//! Typed records reported by remote media services, and the capability
//! traits the resolution and workflow layers are written against.
//!
//! Each service client in [`crate::clients`] implements the subset of
//! capabilities its API offers. Tests substitute in-memory fakes.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a remote entity.
///
/// Sonarr and Bazarr use integers, Plex uses string rating keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl EntityId {
    /// Whether the identifier refers to an actual entity.
    ///
    /// Services report `0` or an empty string for records that are not
    /// (yet) part of the library.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Int(id) => *id > 0,
            Self::Text(id) => !id.trim().is_empty(),
        }
    }

    /// Numeric form, for APIs that only accept integers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(id) => Some(*id),
            Self::Text(id) => id.trim().parse().ok(),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{}", id),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for EntityId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

/// A show, movie or episode as listed by a remote service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteEntity {
    pub id: Option<EntityId>,
    pub title: String,
    /// Alternate URL-safe title some services expose.
    pub slug: Option<String>,
    pub path: Option<String>,
}

impl RemoteEntity {
    pub fn new(id: impl Into<EntityId>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// The identifier, if it refers to an actual entity.
    pub fn present_id(&self) -> Option<&EntityId> {
        self.id.as_ref().filter(|id| id.is_present())
    }
}

/// Kind of a node in a hierarchical library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Show,
    Movie,
    Video,
    Season,
    Episode,
    Other(String),
}

impl NodeKind {
    pub fn parse(kind: &str) -> Self {
        match kind.trim().to_lowercase().as_str() {
            "show" => Self::Show,
            "movie" => Self::Movie,
            "video" => Self::Video,
            "season" => Self::Season,
            "episode" => Self::Episode,
            other => Self::Other(other.to_string()),
        }
    }

    /// Kinds that can own episodes or files and are therefore valid
    /// resolution targets for a show folder.
    pub fn is_top_level(&self) -> bool {
        matches!(self, Self::Show | Self::Movie | Self::Video)
    }
}

/// A node of a hierarchical library (show → season → episode).
#[derive(Debug, Clone, PartialEq)]
pub struct MediaNode {
    pub key: EntityId,
    pub kind: NodeKind,
    pub title: String,
    pub slug: Option<String>,
    pub parent_key: Option<EntityId>,
    /// Files backing this node; only episodes and movies carry any.
    pub files: Vec<String>,
}

impl MediaNode {
    pub fn new(key: impl Into<EntityId>, kind: NodeKind, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            title: title.into(),
            slug: None,
            parent_key: None,
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.files.push(file.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<EntityId>) -> Self {
        self.parent_key = Some(parent.into());
        self
    }

    /// Flat view of the node, for resolution.
    pub fn to_entity(&self) -> RemoteEntity {
        RemoteEntity {
            id: Some(self.key.clone()),
            title: self.title.clone(),
            slug: self.slug.clone(),
            path: self.files.first().cloned(),
        }
    }
}

/// Status of an asynchronous remote command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl CommandStatus {
    /// Map a service status string onto the four canonical states.
    ///
    /// Unknown strings count as running so the caller keeps polling until
    /// its timeout.
    pub fn parse(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "queued" => Self::Queued,
            "started" | "running" => Self::Running,
            "completed" => Self::Completed,
            "failed" | "aborted" | "cancelled" | "orphaned" => Self::Failed,
            _ => Self::Running,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl<'de> Deserialize<'de> for CommandStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// A remote command as reported by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct Command {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_status")]
    pub status: CommandStatus,
}

fn default_status() -> CommandStatus {
    CommandStatus::Queued
}

/// A command to submit: its name plus name-specific parameters.
#[derive(Debug, Clone, Serialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: serde_json::Map::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }
}

/// One entry of a rename preview: where a file is and where it would go.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamePreview {
    #[serde(default)]
    pub existing_path: Option<String>,
    #[serde(default)]
    pub new_path: Option<String>,
    #[serde(default, alias = "fileId")]
    pub episode_file_id: Option<i64>,
}

impl RenamePreview {
    /// Whether applying the rename would move the file.
    pub fn needs_rename(&self) -> bool {
        match (self.existing_path.as_deref(), self.new_path.as_deref()) {
            (Some(existing), Some(new)) => {
                !existing.is_empty() && !new.is_empty() && existing != new
            }
            _ => false,
        }
    }
}

/// Search and full listing of top-level entities.
#[async_trait]
pub trait SeriesCatalog: Send + Sync {
    /// Targeted search by term. Cheap, but may miss recent or oddly titled
    /// entries.
    async fn search(&self, term: &str) -> Result<Vec<RemoteEntity>>;

    /// Every entity in the catalog.
    async fn list_all(&self) -> Result<Vec<RemoteEntity>>;
}

/// Hierarchical library with item-level and path-level refresh.
#[async_trait]
pub trait MediaLibrary: SeriesCatalog {
    async fn children(&self, key: &EntityId) -> Result<Vec<MediaNode>>;

    async fn metadata(&self, key: &EntityId) -> Result<MediaNode>;

    async fn refresh_item(&self, key: &EntityId) -> Result<()>;

    /// Refresh everything under `path` in the given library section.
    async fn refresh_path(&self, section: &str, path: &str) -> Result<()>;

    async fn refresh_section(&self, section: &str) -> Result<()>;
}

/// Flat episode listing plus subtitle provider search.
#[async_trait]
pub trait SubtitleService: SeriesCatalog {
    async fn episodes(&self, series: &EntityId) -> Result<Vec<RemoteEntity>>;

    async fn search_providers(&self, episode: &EntityId) -> Result<()>;
}

/// Asynchronous command protocol.
#[async_trait]
pub trait CommandApi: Send + Sync {
    async fn submit_command(&self, spec: &CommandSpec) -> Result<Command>;

    async fn command(&self, id: i64) -> Result<Command>;
}

/// Series manager: catalog, commands and rename previews.
#[async_trait]
pub trait SeriesManager: SeriesCatalog + CommandApi {
    async fn rename_preview(&self, series: &EntityId) -> Result<Vec<RenamePreview>>;
}
