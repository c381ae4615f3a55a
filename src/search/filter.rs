use std::collections::BTreeSet;
use std::fmt;

use crate::catalog::{Track, UNKNOWN_FIELD};

/// The three independent filter dimensions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Author,
    Year,
    Genre,
}

impl FilterKind {
    pub const ALL: [FilterKind; 3] = [FilterKind::Author, FilterKind::Year, FilterKind::Genre];

    pub fn label(self) -> &'static str {
        match self {
            FilterKind::Author => "author",
            FilterKind::Year => "year",
            FilterKind::Genre => "genre",
        }
    }
}

/// A concrete value picked from one of the filter lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Author(String),
    Year(i32),
    Genre(String),
}

impl FilterValue {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterValue::Author(_) => FilterKind::Author,
            FilterValue::Year(_) => FilterKind::Year,
            FilterValue::Genre(_) => FilterKind::Genre,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Author(a) => f.write_str(a),
            FilterValue::Year(y) => write!(f, "{y}"),
            FilterValue::Genre(g) => f.write_str(g),
        }
    }
}

/// At most one selected value per filter kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    pub author: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
}

impl ActiveFilters {
    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.year.is_none() && self.genre.is_none()
    }

    pub fn get(&self, kind: FilterKind) -> Option<FilterValue> {
        match kind {
            FilterKind::Author => self.author.clone().map(FilterValue::Author),
            FilterKind::Year => self.year.map(FilterValue::Year),
            FilterKind::Genre => self.genre.clone().map(FilterValue::Genre),
        }
    }

    /// Select `value`; selecting the value that is already active clears it.
    pub fn toggle(&mut self, value: FilterValue) {
        if self.get(value.kind()).as_ref() == Some(&value) {
            self.clear(value.kind());
            return;
        }
        match value {
            FilterValue::Author(a) => self.author = Some(a),
            FilterValue::Year(y) => self.year = Some(y),
            FilterValue::Genre(g) => self.genre = Some(g),
        }
    }

    pub fn clear(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::Author => self.author = None,
            FilterKind::Year => self.year = None,
            FilterKind::Genre => self.genre = None,
        }
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, track: &Track) -> bool {
        if let Some(author) = &self.author {
            if &track.author != author {
                return false;
            }
        }
        if let Some(year) = self.year {
            if track.release_year() != Some(year) {
                return false;
            }
        }
        if let Some(genre) = &self.genre {
            if !track.genres.contains(genre) {
                return false;
            }
        }
        true
    }
}

/// Keep the tracks accepted by every active filter, in their original order.
pub fn apply_filters(tracks: &[Track], filters: &ActiveFilters) -> Vec<Track> {
    tracks
        .iter()
        .filter(|t| filters.matches(t))
        .cloned()
        .collect()
}

/// Distinct values offered by each filter dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Ascending; placeholder authors are left out.
    pub authors: Vec<String>,
    /// Newest first.
    pub years: Vec<i32>,
    /// Ascending.
    pub genres: Vec<String>,
}

impl FilterOptions {
    pub fn from_tracks(tracks: &[Track]) -> Self {
        let mut authors = BTreeSet::new();
        let mut years = BTreeSet::new();
        let mut genres = BTreeSet::new();

        for track in tracks {
            let author = track.author.trim();
            if !author.is_empty() && author != UNKNOWN_FIELD {
                authors.insert(track.author.clone());
            }
            if let Some(year) = track.release_year() {
                years.insert(year);
            }
            genres.extend(track.genres.iter().cloned());
        }

        Self {
            authors: authors.into_iter().collect(),
            years: years.into_iter().rev().collect(),
            genres: genres.into_iter().collect(),
        }
    }

    pub fn values(&self, kind: FilterKind) -> Vec<FilterValue> {
        match kind {
            FilterKind::Author => self.authors.iter().cloned().map(FilterValue::Author).collect(),
            FilterKind::Year => self.years.iter().copied().map(FilterValue::Year).collect(),
            FilterKind::Genre => self.genres.iter().cloned().map(FilterValue::Genre).collect(),
        }
    }
}
