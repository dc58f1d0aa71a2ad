use super::Outcome;
use crate::matcher::match_by_path;
use crate::paths::{show_folder_for_file, to_forward_slashes, PathRoots};
use crate::remote::SubtitleService;
use crate::resolver::resolve_series;
use crate::title::strip_year;

/// Trigger a subtitle provider search for the episode behind `file`.
pub async fn search_subtitles<S>(service: &S, file: Option<&str>, roots: &PathRoots) -> Outcome
where
    S: SubtitleService + ?Sized,
{
    let Some(file) = file.filter(|f| !f.trim().is_empty()) else {
        tracing::warn!("No working file set, skipping provider search");
        return Outcome::NotFound;
    };

    let remapped = to_forward_slashes(&roots.remap(file));
    tracing::info!("Looking for episode with path={}", remapped);

    let Some(show) = show_folder_for_file(&remapped) else {
        tracing::warn!("No show folder in path {}", remapped);
        return Outcome::NotFound;
    };
    let search_name = strip_year(show);

    let Some(series) = resolve_series(service, &search_name).await else {
        return Outcome::NotFound;
    };
    let Some(series_id) = series.entity.present_id() else {
        return Outcome::NotFound;
    };

    let episodes = match service.episodes(series_id).await {
        Ok(episodes) => episodes,
        Err(e) => {
            tracing::warn!("Failed to list episodes for series {}: {}", series_id, e);
            return Outcome::Failed;
        }
    };
    tracing::debug!("Series {} has {} episode(s)", series_id, episodes.len());

    let Some(episode_id) = match_by_path(&episodes, &remapped).and_then(|e| e.present_id()) else {
        tracing::warn!("No episode match found for path={}", remapped);
        return Outcome::NotFound;
    };

    match service.search_providers(episode_id).await {
        Ok(()) => {
            tracing::info!("Provider search triggered for episode {}", episode_id);
            Outcome::Success
        }
        Err(e) => {
            tracing::warn!("Provider search failed for episode {}: {}", episode_id, e);
            Outcome::Failed
        }
    }
}
