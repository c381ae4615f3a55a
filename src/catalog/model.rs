use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::Deserialize;

use crate::error::CatalogError;

/// Stable identifier of a catalog entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable catalog entry.
///
/// Field names in catalog files follow the `[[track]]` table layout:
/// `id`, `name`, `author`, `album`, `duration_in_seconds`, `track_file`,
/// `release_date` and `genre`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    #[serde(alias = "_id")]
    pub id: TrackId,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub album: String,
    /// Nominal length declared by the catalog; may be wrong.
    #[serde(rename = "duration_in_seconds", default)]
    pub duration_secs: u32,
    /// Opaque locator handed to the media backend.
    #[serde(rename = "track_file")]
    pub file_ref: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(rename = "genre", default)]
    pub genres: BTreeSet<String>,
}

impl Track {
    /// Year of `release_date`, read from its leading `YYYY` component.
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?.trim();
        let year: String = date.chars().take_while(|c| c.is_ascii_digit()).collect();
        if year.len() != 4 {
            return None;
        }
        year.parse().ok()
    }
}

/// The fixed, ordered set of tracks available for the whole session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    by_id: HashMap<TrackId, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids. Order is preserved.
    pub fn new(tracks: Vec<Track>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(tracks.len());
        for (pos, track) in tracks.iter().enumerate() {
            if by_id.insert(track.id, pos).is_some() {
                return Err(CatalogError::DuplicateId(track.id));
            }
        }
        Ok(Self { tracks, by_id })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.by_id.get(&id).map(|&pos| &self.tracks[pos])
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
