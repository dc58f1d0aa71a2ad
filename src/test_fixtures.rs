//! In-memory fakes of the remote capabilities, shared by unit tests.

use crate::command::Clock;
use crate::error::{ClientError, Result};
use crate::remote::{
    Command, CommandApi, CommandSpec, CommandStatus, EntityId, MediaLibrary, MediaNode,
    RemoteEntity, RenamePreview, SeriesCatalog, SeriesManager, SubtitleService,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

fn unavailable() -> ClientError {
    ClientError::status(500, "unavailable")
}

/// Catalog with canned responses; `None` makes the call fail.
#[derive(Default)]
pub struct FakeCatalog {
    pub search: Option<Vec<RemoteEntity>>,
    pub listing: Option<Vec<RemoteEntity>>,
    pub search_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn listing(entities: Vec<RemoteEntity>) -> Self {
        Self {
            search: Some(Vec::new()),
            listing: Some(entities),
            ..Default::default()
        }
    }
}

#[async_trait]
impl SeriesCatalog for FakeCatalog {
    async fn search(&self, _term: &str) -> Result<Vec<RemoteEntity>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.search.clone().ok_or_else(unavailable)
    }

    async fn list_all(&self) -> Result<Vec<RemoteEntity>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.listing.clone().ok_or_else(unavailable)
    }
}

/// Hierarchical library keyed by node key.
#[derive(Default)]
pub struct FakeLibrary {
    pub catalog: FakeCatalog,
    children: HashMap<String, Vec<MediaNode>>,
    metadata: HashMap<String, MediaNode>,
    refreshable: HashSet<String>,
    pub path_refresh_ok: bool,
    pub section_refresh_ok: bool,
    children_calls: Mutex<HashMap<String, usize>>,
    pub item_refreshes: Mutex<Vec<String>>,
    pub path_refreshes: Mutex<Vec<(String, String)>>,
    pub section_refreshes: Mutex<Vec<String>>,
}

impl FakeLibrary {
    pub fn with_catalog(mut self, catalog: FakeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_children(mut self, key: &str, nodes: Vec<MediaNode>) -> Self {
        self.children.insert(key.to_string(), nodes);
        self
    }

    pub fn with_metadata(mut self, node: MediaNode) -> Self {
        self.metadata.insert(node.key.to_string(), node);
        self
    }

    /// Let `refresh_item` succeed for `key`.
    pub fn refreshable(mut self, key: &str) -> Self {
        self.refreshable.insert(key.to_string());
        self
    }

    pub fn children_calls(&self, key: &str) -> usize {
        self.children_calls
            .lock()
            .unwrap()
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    pub fn item_refreshes(&self) -> Vec<String> {
        self.item_refreshes.lock().unwrap().clone()
    }

    pub fn path_refreshes(&self) -> Vec<(String, String)> {
        self.path_refreshes.lock().unwrap().clone()
    }

    pub fn section_refreshes(&self) -> Vec<String> {
        self.section_refreshes.lock().unwrap().clone()
    }
}

#[async_trait]
impl SeriesCatalog for FakeLibrary {
    async fn search(&self, term: &str) -> Result<Vec<RemoteEntity>> {
        self.catalog.search(term).await
    }

    async fn list_all(&self) -> Result<Vec<RemoteEntity>> {
        self.catalog.list_all().await
    }
}

#[async_trait]
impl MediaLibrary for FakeLibrary {
    async fn children(&self, key: &EntityId) -> Result<Vec<MediaNode>> {
        let key = key.to_string();
        *self
            .children_calls
            .lock()
            .unwrap()
            .entry(key.clone())
            .or_default() += 1;
        self.children.get(&key).cloned().ok_or_else(unavailable)
    }

    async fn metadata(&self, key: &EntityId) -> Result<MediaNode> {
        self.metadata
            .get(&key.to_string())
            .cloned()
            .ok_or_else(unavailable)
    }

    async fn refresh_item(&self, key: &EntityId) -> Result<()> {
        let key = key.to_string();
        self.item_refreshes.lock().unwrap().push(key.clone());
        if self.refreshable.contains(&key) {
            Ok(())
        } else {
            Err(unavailable())
        }
    }

    async fn refresh_path(&self, section: &str, path: &str) -> Result<()> {
        self.path_refreshes
            .lock()
            .unwrap()
            .push((section.to_string(), path.to_string()));
        if self.path_refresh_ok {
            Ok(())
        } else {
            Err(unavailable())
        }
    }

    async fn refresh_section(&self, section: &str) -> Result<()> {
        self.section_refreshes.lock().unwrap().push(section.to_string());
        if self.section_refresh_ok {
            Ok(())
        } else {
            Err(unavailable())
        }
    }
}

/// Subtitle service with per-series episode lists.
#[derive(Default)]
pub struct FakeSubtitles {
    pub catalog: FakeCatalog,
    pub episodes: HashMap<String, Vec<RemoteEntity>>,
    pub provider_ok: bool,
    pub provider_searches: Mutex<Vec<EntityId>>,
}

#[async_trait]
impl SeriesCatalog for FakeSubtitles {
    async fn search(&self, term: &str) -> Result<Vec<RemoteEntity>> {
        self.catalog.search(term).await
    }

    async fn list_all(&self) -> Result<Vec<RemoteEntity>> {
        self.catalog.list_all().await
    }
}

#[async_trait]
impl SubtitleService for FakeSubtitles {
    async fn episodes(&self, series: &EntityId) -> Result<Vec<RemoteEntity>> {
        self.episodes
            .get(&series.to_string())
            .cloned()
            .ok_or_else(unavailable)
    }

    async fn search_providers(&self, episode: &EntityId) -> Result<()> {
        self.provider_searches.lock().unwrap().push(episode.clone());
        if self.provider_ok {
            Ok(())
        } else {
            Err(unavailable())
        }
    }
}

/// Command API replaying scripted status sequences.
///
/// The n-th submitted command follows the n-th script (the last script is
/// reused once exhausted), and each script repeats its final status.
#[derive(Default)]
pub struct FakeCommands {
    scripts: Vec<Vec<CommandStatus>>,
    omit_ids: bool,
    reject: bool,
    submitted: Mutex<Vec<CommandSpec>>,
    positions: Mutex<HashMap<i64, usize>>,
    status_calls: AtomicUsize,
}

impl FakeCommands {
    pub fn with_statuses(statuses: &[&str]) -> Self {
        Self::with_scripts(&[statuses])
    }

    pub fn with_scripts(scripts: &[&[&str]]) -> Self {
        Self {
            scripts: scripts
                .iter()
                .map(|s| s.iter().map(|status| CommandStatus::parse(status)).collect())
                .collect(),
            ..Default::default()
        }
    }

    pub fn without_ids(mut self) -> Self {
        self.omit_ids = true;
        self
    }

    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    pub fn submitted(&self) -> Vec<CommandSpec> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandApi for FakeCommands {
    async fn submit_command(&self, spec: &CommandSpec) -> Result<Command> {
        if self.reject {
            return Err(unavailable());
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(spec.clone());
        let id = submitted.len() as i64;
        Ok(Command {
            id: (!self.omit_ids).then_some(id),
            name: Some(spec.name.clone()),
            status: CommandStatus::Queued,
        })
    }

    async fn command(&self, id: i64) -> Result<Command> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let script_idx = (id as usize - 1).min(self.scripts.len().saturating_sub(1));
        let script = self.scripts.get(script_idx).ok_or_else(unavailable)?;

        let mut positions = self.positions.lock().unwrap();
        let pos = positions.entry(id).or_default();
        let status = script
            .get(*pos)
            .or_else(|| script.last())
            .copied()
            .ok_or_else(unavailable)?;
        *pos += 1;

        Ok(Command {
            id: Some(id),
            name: None,
            status,
        })
    }
}

/// Series manager built from a catalog, a command script and a preview.
#[derive(Default)]
pub struct FakeSonarr {
    pub catalog: FakeCatalog,
    pub commands: FakeCommands,
    pub preview: Option<Vec<RenamePreview>>,
}

#[async_trait]
impl SeriesCatalog for FakeSonarr {
    async fn search(&self, term: &str) -> Result<Vec<RemoteEntity>> {
        self.catalog.search(term).await
    }

    async fn list_all(&self) -> Result<Vec<RemoteEntity>> {
        self.catalog.list_all().await
    }
}

#[async_trait]
impl CommandApi for FakeSonarr {
    async fn submit_command(&self, spec: &CommandSpec) -> Result<Command> {
        self.commands.submit_command(spec).await
    }

    async fn command(&self, id: i64) -> Result<Command> {
        self.commands.command(id).await
    }
}

#[async_trait]
impl SeriesManager for FakeSonarr {
    async fn rename_preview(&self, _series: &EntityId) -> Result<Vec<RenamePreview>> {
        self.preview.clone().ok_or_else(unavailable)
    }
}

/// Clock that only moves when slept on.
pub struct ManualClock {
    start: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        *self.offset.lock().unwrap() += duration;
    }
}

pub fn preview(existing: &str, new: &str, file_id: i64) -> RenamePreview {
    RenamePreview {
        existing_path: Some(existing.to_string()),
        new_path: Some(new.to_string()),
        episode_file_id: Some(file_id),
    }
}
