//! End-to-end workflows.
//!
//! Each entry point composes remapping, resolution, matching and commands
//! into a single [`Outcome`]. No error escapes a workflow: every failure is
//! logged and either falls through to the next tier or becomes the outcome.

mod bazarr;
mod plex;
mod sonarr;

pub use bazarr::search_subtitles;
pub use plex::refresh_file;
pub use sonarr::{refresh_and_rename, refresh_series_command, rename_files_command};

use std::fmt;

/// Fallback tier that carried a degraded refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTier {
    /// The episode's parent (season) was refreshed instead of the episode.
    Parent,
    /// The folder containing the file was refreshed.
    Path,
}

impl fmt::Display for RefreshTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => f.write_str("parent refresh"),
            Self::Path => f.write_str("path refresh"),
        }
    }
}

/// Terminal result of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The preferred operation succeeded.
    Success,
    /// A lower-priority fallback succeeded after preferred tiers failed.
    Degraded(RefreshTier),
    /// Nothing to act on: no input, or no matching entity.
    NotFound,
    /// Every applicable tier failed.
    Failed,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success | Self::Degraded(_))
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success | Self::Degraded(_) => 0,
            Self::Failed => 1,
            Self::NotFound => 2,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Degraded(tier) => write!(f, "success via {}", tier),
            Self::NotFound => f.write_str("not found"),
            Self::Failed => f.write_str("failed"),
        }
    }
}
