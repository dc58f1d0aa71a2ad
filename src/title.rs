//! Title normalization for comparing local folder names with remote titles.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\d{4}\)").expect("valid regex"));

/// A title in canonical comparison form.
///
/// Year annotations such as `(2019)` are removed, whitespace is trimmed and
/// collapsed, and the result is lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName(String);

impl NormalizedName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a title for comparison.
///
/// # Examples
///
/// ```
/// use arrbridge::title::normalize;
///
/// assert_eq!(normalize("  The   Show (2020) ").as_str(), "the show");
/// ```
pub fn normalize(title: &str) -> NormalizedName {
    let stripped = YEAR_RE.replace_all(title, "");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    NormalizedName(collapsed.to_lowercase())
}

/// Normalize an optional title; an absent title normalizes to empty.
pub fn normalize_opt(title: Option<&str>) -> NormalizedName {
    normalize(title.unwrap_or_default())
}

/// Remove year annotations and trim, keeping the original casing.
///
/// Used to build outbound search terms from folder names.
pub fn strip_year(title: &str) -> String {
    YEAR_RE.replace_all(title, "").trim().to_string()
}

/// Whether two titles refer to the same entity.
///
/// Year annotations are already stripped by [`normalize`], so a title
/// carrying a year matches the same title without one.
pub fn titles_match(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
