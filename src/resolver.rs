//! Tiered series resolution: targeted search first, full listing on miss.

use crate::remote::{RemoteEntity, SeriesCatalog};
use crate::title::{normalize, normalize_opt, NormalizedName};
use std::fmt;

/// Which lookup produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Search,
    FullListing,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => f.write_str("search"),
            Self::FullListing => f.write_str("full listing"),
        }
    }
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub entity: RemoteEntity,
    pub matched_via: MatchTier,
}

/// Resolve `name` to an entity of `catalog`.
///
/// The search endpoint is queried with `name` as given; candidates from it,
/// and from the full listing if the search misses or fails, are accepted
/// when their normalized title (or slug) equals the normalized `name` and
/// they carry an identifier. `None` means neither tier matched and is an
/// expected outcome.
pub async fn resolve_series<C>(catalog: &C, name: &str) -> Option<Resolution>
where
    C: SeriesCatalog + ?Sized,
{
    let target = normalize(name);
    if target.is_empty() {
        tracing::warn!("Cannot resolve an empty series name");
        return None;
    }

    tracing::info!("Resolving series \"{}\"", name);

    match catalog.search(name).await {
        Ok(candidates) => {
            tracing::debug!("Search returned {} candidate(s)", candidates.len());
            if let Some(entity) = find_match(candidates, &target) {
                return Some(matched(entity, MatchTier::Search));
            }
            tracing::debug!("No search candidate matched \"{}\"", target);
        }
        Err(e) => tracing::warn!("Series search failed for \"{}\": {}", name, e),
    }

    match catalog.list_all().await {
        Ok(all) => {
            tracing::debug!("Full listing returned {} entries", all.len());
            if let Some(entity) = find_match(all, &target) {
                return Some(matched(entity, MatchTier::FullListing));
            }
        }
        Err(e) => tracing::warn!("Full listing failed: {}", e),
    }

    tracing::warn!("Unable to resolve series \"{}\"", name);
    None
}

fn matched(entity: RemoteEntity, tier: MatchTier) -> Resolution {
    if let Some(id) = &entity.id {
        tracing::info!("Matched \"{}\" (id={}) via {}", entity.title, id, tier);
    }
    Resolution {
        entity,
        matched_via: tier,
    }
}

/// First candidate whose title or slug normalizes to `target` and whose id
/// is present.
pub fn find_match(candidates: Vec<RemoteEntity>, target: &NormalizedName) -> Option<RemoteEntity> {
    candidates.into_iter().find(|candidate| {
        let title_matches = normalize(&candidate.title) == *target
            || normalize_opt(candidate.slug.as_deref()) == *target;
        tracing::trace!(
            "Candidate \"{}\" id={:?} matches={}",
            candidate.title,
            candidate.id,
            title_matches
        );
        title_matches && candidate.present_id().is_some()
    })
}
