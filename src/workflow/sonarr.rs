use super::Outcome;
use crate::command::{Clock, CommandOrchestrator, PollSettings};
use crate::paths::show_folder_for_dir;
use crate::remote::{CommandSpec, SeriesManager};
use crate::resolver::resolve_series;
use crate::title::strip_year;

/// `RefreshSeries` command for one series.
pub fn refresh_series_command(series_id: i64) -> CommandSpec {
    CommandSpec::new("RefreshSeries")
        .param("seriesIds", vec![series_id])
        .param("isNewSeries", false)
}

/// `RenameFiles` command for the given episode files of a series.
pub fn rename_files_command(series_id: i64, file_ids: &[i64]) -> CommandSpec {
    CommandSpec::new("RenameFiles")
        .param("seriesId", series_id)
        .param("files", file_ids.to_vec())
}

/// Refresh the series owning `folder`, then rename any files whose names
/// no longer match the naming scheme.
///
/// Each command is awaited before moving on. Zero files needing a rename is
/// a success.
pub async fn refresh_and_rename<M, C>(manager: &M, clock: &C, settings: PollSettings, folder: Option<&str>) -> Outcome
where
    M: SeriesManager + ?Sized,
    C: Clock + ?Sized,
{
    let Some(folder) = folder.filter(|f| !f.trim().is_empty()) else {
        tracing::warn!("No folder set, skipping refresh");
        return Outcome::NotFound;
    };

    let Some(series_folder) = show_folder_for_dir(folder) else {
        tracing::warn!("No series folder in path {}", folder);
        return Outcome::NotFound;
    };
    let name = strip_year(series_folder);
    tracing::info!("Looking up series by name: \"{}\"", name);

    let Some(series) = resolve_series(manager, &name).await else {
        tracing::warn!("Series not found for path: {}", folder);
        return Outcome::NotFound;
    };
    let Some(series_id) = series.entity.present_id().and_then(|id| id.as_i64()) else {
        tracing::warn!("Series \"{}\" has no numeric id", series.entity.title);
        return Outcome::NotFound;
    };
    tracing::info!("Series found: {} (id={})", series.entity.title, series_id);

    let orchestrator = CommandOrchestrator::new(manager, clock, settings);

    if !orchestrator
        .submit_and_await(&refresh_series_command(series_id))
        .await
    {
        tracing::warn!("Refresh failed for seriesId={}", series_id);
        return Outcome::Failed;
    }

    let preview = match manager.rename_preview(&series_id.into()).await {
        Ok(preview) => preview,
        Err(e) => {
            tracing::warn!("Rename preview failed for seriesId={}: {}", series_id, e);
            Vec::new()
        }
    };

    let file_ids: Vec<i64> = preview
        .iter()
        .filter(|entry| entry.needs_rename())
        .filter_map(|entry| entry.episode_file_id)
        .collect();
    tracing::info!(
        "Found {} file(s) needing rename for seriesId={}",
        file_ids.len(),
        series_id
    );

    if file_ids.is_empty() {
        tracing::info!("No episode files need renaming");
        return Outcome::Success;
    }

    if !orchestrator
        .submit_and_await(&rename_files_command(series_id, &file_ids))
        .await
    {
        tracing::warn!("RenameFiles command failed or timed out");
        return Outcome::Failed;
    }

    tracing::info!("Renamed {} file(s) for seriesId={}", file_ids.len(), series_id);
    Outcome::Success
}
