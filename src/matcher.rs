//! Locate the episode entity behind a local file.
//!
//! Two shapes: a flat listing where each entity already carries its path,
//! and a show → season → episode tree fetched lazily level by level.

use crate::paths::{comparison_form, file_name};
use crate::remote::{EntityId, MediaLibrary, NodeKind, RemoteEntity};

/// First entity whose path identifies `target_path`.
///
/// Paths are compared in [`comparison_form`]. An entity matches when its
/// file name equals the target's, or when either full path is a suffix of
/// the other. The suffix rule can pair unrelated files that share a tail
/// across shows with identical layouts; the first match in listing order
/// wins.
pub fn match_by_path<'a>(entities: &'a [RemoteEntity], target_path: &str) -> Option<&'a RemoteEntity> {
    let target = comparison_form(target_path);
    if target.is_empty() {
        return None;
    }
    let target_file = file_name(&target);

    for (i, entity) in entities.iter().enumerate() {
        let Some(path) = entity.path.as_deref().filter(|p| !p.is_empty()) else {
            tracing::debug!("Entity[{}] \"{}\" has no path", i, entity.title);
            continue;
        };

        let candidate = comparison_form(path);
        let candidate_file = file_name(&candidate);
        tracing::debug!(
            "Entity[{}] file=\"{}\" vs target file=\"{}\"",
            i,
            candidate_file,
            target_file
        );

        if candidate_file == target_file || target.ends_with(&candidate) || candidate.ends_with(&target) {
            tracing::info!("Matched \"{}\" by path {}", entity.title, path);
            return Some(entity);
        }
    }

    None
}

/// Find the episode under `root` backed by a file named `target_file_name`.
///
/// Seasons are walked in listing order and each season's episodes are only
/// fetched when the previous seasons did not match. A season whose children
/// cannot be fetched is skipped.
pub async fn match_in_tree<L>(library: &L, root: &EntityId, target_file_name: &str) -> Option<EntityId>
where
    L: MediaLibrary + ?Sized,
{
    let target = target_file_name.to_lowercase();
    if target.is_empty() {
        return None;
    }

    let seasons = match library.children(root).await {
        Ok(children) => children
            .into_iter()
            .filter(|c| c.kind == NodeKind::Season)
            .collect::<Vec<_>>(),
        Err(e) => {
            tracing::warn!("Failed to list children of {}: {}", root, e);
            return None;
        }
    };
    tracing::debug!("Show {} has {} season(s)", root, seasons.len());

    for season in seasons {
        let episodes = match library.children(&season.key).await {
            Ok(children) => children,
            Err(e) => {
                tracing::warn!("Failed to list episodes of season {}: {}", season.key, e);
                continue;
            }
        };

        for episode in episodes.iter().filter(|c| c.kind == NodeKind::Episode) {
            let hit = episode
                .files
                .iter()
                .any(|file| file_name(file).to_lowercase() == target);
            if hit {
                tracing::info!(
                    "Matched episode \"{}\" by filename {} (key={})",
                    episode.title,
                    target_file_name,
                    episode.key
                );
                return Some(episode.key.clone());
            }
        }
    }

    None
}
