use super::{Outcome, RefreshTier};
use crate::matcher::match_in_tree;
use crate::paths::{containing_folder, file_name, show_folder_for_file, to_forward_slashes, PathRoots};
use crate::remote::{EntityId, MediaLibrary};
use crate::resolver::resolve_series;

/// Refresh the library entry behind `file`, path-first.
///
/// Tiers, in order: refresh the resolved episode, refresh its parent
/// season, refresh the folder containing the file. Without a file the whole
/// section is refreshed. Resolution misses never fail the workflow; they
/// only skip the tiers that need an id.
pub async fn refresh_file<L>(library: &L, section: &str, file: Option<&str>, roots: &PathRoots) -> Outcome
where
    L: MediaLibrary + ?Sized,
{
    let Some(file) = file.filter(|f| !f.trim().is_empty()) else {
        tracing::info!("No working file set, refreshing entire section {}", section);
        return match library.refresh_section(section).await {
            Ok(()) => Outcome::Success,
            Err(e) => {
                tracing::warn!("Section {} refresh failed: {}", section, e);
                Outcome::Failed
            }
        };
    };

    let remapped = to_forward_slashes(&roots.remap(file));
    tracing::info!("Resolving item for file: {} -> {}", file, remapped);

    let key = find_episode_key(library, &remapped).await;
    match &key {
        Some(key) => tracing::info!("Refreshing via path-first strategy (key={})", key),
        None => tracing::info!("Refreshing via path-first strategy (no key resolved)"),
    }

    if let Some(key) = &key {
        match library.refresh_item(key).await {
            Ok(()) => {
                tracing::info!("Item refresh accepted for key={}", key);
                return Outcome::Success;
            }
            Err(e) => tracing::warn!("Item refresh failed for key={}: {}", key, e),
        }

        if let Some(parent) = parent_key(library, key).await {
            tracing::info!("Refreshing parent key={}", parent);
            match library.refresh_item(&parent).await {
                Ok(()) => return Outcome::Degraded(RefreshTier::Parent),
                Err(e) => tracing::warn!("Parent refresh failed for key={}: {}", parent, e),
            }
        }
    }

    let folder = containing_folder(&remapped);
    tracing::info!("Section path refresh: section={} path={}", section, folder);
    match library.refresh_path(section, folder).await {
        Ok(()) => Outcome::Degraded(RefreshTier::Path),
        Err(e) => {
            tracing::warn!("Path refresh failed for {}: {}", folder, e);
            Outcome::Failed
        }
    }
}

async fn find_episode_key<L>(library: &L, remapped: &str) -> Option<EntityId>
where
    L: MediaLibrary + ?Sized,
{
    let file = file_name(remapped);
    let Some(show) = show_folder_for_file(remapped) else {
        tracing::warn!("No show folder in path {}", remapped);
        return None;
    };
    tracing::info!("Resolving show=\"{}\" filename=\"{}\"", show, file);

    let resolution = resolve_series(library, show).await?;
    let show_key = resolution.entity.present_id()?.clone();

    let key = match_in_tree(library, &show_key, file).await;
    if key.is_none() {
        tracing::warn!("No episode of show {} has file {}", show_key, file);
    }
    key
}

async fn parent_key<L>(library: &L, key: &EntityId) -> Option<EntityId>
where
    L: MediaLibrary + ?Sized,
{
    match library.metadata(key).await {
        Ok(node) => node.parent_key.filter(|p| p.is_present()),
        Err(e) => {
            tracing::warn!("Failed to fetch metadata for key={}: {}", key, e);
            None
        }
    }
}
