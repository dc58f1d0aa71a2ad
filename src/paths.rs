//! Path-string helpers.
//!
//! Paths here are plain strings reported by (or sent to) remote services,
//! which may live on a different OS than this process. They are never
//! touched on the local filesystem, so `std::path` is deliberately avoided
//! in favour of splitting on both separator styles.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SEASON_FOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:season|series)\s*\d+|specials|s\d{1,4})$").expect("valid regex")
});

/// Filesystem roots for translating host paths into service paths.
///
/// Either root left empty disables remapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathRoots {
    /// Root as seen by the process that triggered us (e.g. `D:\Media`).
    #[serde(default)]
    pub source_root: String,

    /// Same location as seen by the remote service (e.g. `/media`).
    #[serde(default)]
    pub target_root: String,
}

impl PathRoots {
    pub fn new(source_root: impl Into<String>, target_root: impl Into<String>) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
        }
    }

    pub fn remap(&self, path: &str) -> String {
        remap(path, &self.source_root, &self.target_root)
    }
}

/// Translate `path` from under `source_root` to under `target_root`.
///
/// Root and path are compared in forward-slash form, case-insensitively.
/// On a match the prefix is replaced and the remainder is kept verbatim.
/// Any empty argument, or a path outside `source_root`, returns the input
/// unchanged.
///
/// # Examples
///
/// ```
/// use arrbridge::paths::remap;
///
/// assert_eq!(
///     remap(r"D:\TV\Show\ep1.mkv", "d:/tv", "/media"),
///     r"/media\Show\ep1.mkv"
/// );
/// assert_eq!(remap("/other/ep1.mkv", "/mnt", "/media"), "/other/ep1.mkv");
/// ```
pub fn remap(path: &str, source_root: &str, target_root: &str) -> String {
    if path.is_empty() || source_root.is_empty() || target_root.is_empty() {
        return path.to_string();
    }

    let root = to_forward_slashes(source_root);
    let file = to_forward_slashes(path);

    // Separator replacement is byte-for-byte, so offsets into `file` are
    // valid offsets into `path`.
    let matches = file
        .get(..root.len())
        .is_some_and(|prefix| prefix.to_lowercase() == root.to_lowercase());

    if matches {
        let remapped = format!("{}{}", target_root, &path[root.len()..]);
        tracing::debug!("Remapped {} -> {}", path, remapped);
        remapped
    } else {
        tracing::debug!("No remap applied for {}", path);
        path.to_string()
    }
}

/// Replace backslashes with forward slashes.
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Comparison form of a path: forward slashes, lower-cased.
pub fn comparison_form(path: &str) -> String {
    to_forward_slashes(path).to_lowercase()
}

/// Last segment of a path, accepting either separator style.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Folder containing `path`, split on `/` only.
///
/// Returns the path itself when it has no parent segment, so the result is
/// always usable as a refresh target.
pub fn containing_folder(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) if idx > 0 => &path[..idx],
        _ => path,
    }
}

/// Whether a folder name looks like a season folder (`Season 01`, `S02`,
/// `Specials`, ...).
pub fn is_season_folder(name: &str) -> bool {
    SEASON_FOLDER_RE.is_match(name.trim())
}

/// Name of the show folder owning a media file.
///
/// This is the file's parent folder, or the grandparent when the parent is
/// a season folder.
pub fn show_folder_for_file(path: &str) -> Option<&str> {
    let segments = segments(path);
    let (_, folders) = segments.split_last()?;
    show_folder_in(folders)
}

/// Name of the show folder for a directory path.
///
/// This is the directory's own name, or its parent's when the directory is
/// a season folder.
pub fn show_folder_for_dir(path: &str) -> Option<&str> {
    show_folder_in(&segments(path))
}

fn show_folder_in<'a>(folders: &[&'a str]) -> Option<&'a str> {
    let (last, rest) = folders.split_last()?;
    if is_season_folder(last) {
        if let Some(parent) = rest.last() {
            return Some(parent);
        }
    }
    Some(last)
}

fn segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty()).collect()
}
