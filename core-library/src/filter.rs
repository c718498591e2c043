//! Catalog filtering
//!
//! Reduces a track list by free-text query, track type and language. All
//! functions here are pure and preserve the input order.

use serde::{Deserialize, Serialize};

use crate::models::{Track, TrackKind};

/// Sentinel value meaning "no constraint" for type and language filters
pub const ALL: &str = "all";

/// Track-type constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KindFilter {
    #[default]
    All,
    Only(TrackKind),
}

impl KindFilter {
    /// Parse a raw UI value. Anything other than `"Song"` or `"BGM"` means
    /// no constraint.
    pub fn parse(raw: &str) -> Self {
        raw.parse::<TrackKind>()
            .map(KindFilter::Only)
            .unwrap_or(KindFilter::All)
    }

    pub fn matches(&self, kind: TrackKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(wanted) => *wanted == kind,
        }
    }
}

/// Language constraint, compared case-sensitively
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LanguageFilter {
    #[default]
    All,
    Only(String),
}

impl LanguageFilter {
    /// Parse a raw UI value. `"all"` and the empty string mean no constraint.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw == ALL {
            LanguageFilter::All
        } else {
            LanguageFilter::Only(raw.to_string())
        }
    }

    pub fn matches(&self, language: &str) -> bool {
        match self {
            LanguageFilter::All => true,
            LanguageFilter::Only(wanted) => wanted == language,
        }
    }
}

/// Combined catalog filter.
///
/// # Example
///
/// ```
/// use core_library::filter::{CatalogFilter, KindFilter};
/// use core_library::models::TrackKind;
///
/// let filter = CatalogFilter::default()
///     .with_query("anirudh")
///     .with_kind(KindFilter::Only(TrackKind::Song));
/// assert!(!filter.is_unconstrained());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Case-insensitive substring matched against title, artist and
    /// movie/album. Empty matches everything.
    pub query: String,
    pub kind: KindFilter,
    pub language: LanguageFilter,
}

impl CatalogFilter {
    /// Build a filter from the raw values a UI holds
    pub fn from_raw(query: &str, type_filter: &str, language_filter: &str) -> Self {
        Self {
            query: query.to_string(),
            kind: KindFilter::parse(type_filter),
            language: LanguageFilter::parse(language_filter),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_kind(mut self, kind: KindFilter) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_language(mut self, language: LanguageFilter) -> Self {
        self.language = language;
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.query.is_empty() && self.kind == KindFilter::All && self.language == LanguageFilter::All
    }

    pub fn matches(&self, track: &Track) -> bool {
        self.kind.matches(track.kind)
            && self.language.matches(&track.language)
            && matches_query(track, &self.query.to_lowercase())
    }

    pub fn apply(&self, tracks: &[Track]) -> Vec<Track> {
        let needle = self.query.to_lowercase();
        tracks
            .iter()
            .filter(|track| {
                self.kind.matches(track.kind)
                    && self.language.matches(&track.language)
                    && matches_query(track, &needle)
            })
            .cloned()
            .collect()
    }
}

fn matches_query(track: &Track, needle: &str) -> bool {
    needle.is_empty()
        || [&track.title, &track.artist, &track.movie_or_album]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

/// Filter `tracks` by raw query, type and language values.
pub fn filter_tracks(
    tracks: &[Track],
    query: &str,
    type_filter: &str,
    language_filter: &str,
) -> Vec<Track> {
    CatalogFilter::from_raw(query, type_filter, language_filter).apply(tracks)
}
