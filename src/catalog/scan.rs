use std::collections::BTreeSet;
use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::Accessor;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::CatalogSettings;
use crate::error::CatalogError;

use super::model::{Catalog, Track, TrackId};

/// Placeholder used for a missing author or album.
pub const UNKNOWN_FIELD: &str = "-";

fn is_audio_file(path: &Path, settings: &CatalogSettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn non_empty(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_genres(raw: &str) -> BTreeSet<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// A scanned file before ids are assigned.
struct Scanned {
    name: String,
    author: Option<String>,
    album: Option<String>,
    duration_secs: u32,
    file_ref: String,
    genres: BTreeSet<String>,
}

impl Scanned {
    fn sort_key(&self) -> String {
        match &self.author {
            Some(a) => format!("{} - {}", a, self.name).to_lowercase(),
            None => self.name.to_lowercase(),
        }
    }
}

fn read_file(path: &Path) -> Scanned {
    let mut scanned = Scanned {
        name: path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string(),
        author: None,
        album: None,
        duration_secs: 0,
        file_ref: path.display().to_string(),
        genres: BTreeSet::new(),
    };

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            scanned.duration_secs = tagged.properties().duration().as_secs() as u32;

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(title) = non_empty(tag.title()) {
                    scanned.name = title;
                }
                scanned.author = non_empty(tag.artist());
                scanned.album = non_empty(tag.album());
                if let Some(genre) = non_empty(tag.genre()) {
                    scanned.genres = split_genres(&genre);
                }
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "no readable tags"),
    }

    scanned
}

/// Build a catalog from the audio files found under `dir`.
///
/// Ids are assigned `1..=N` after sorting by "author - name", case-insensitive.
pub fn scan(dir: &Path, settings: &CatalogSettings) -> Result<Catalog, CatalogError> {
    let mut found: Vec<Scanned> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            found.push(read_file(path));
        }
    }

    found.sort_by_key(Scanned::sort_key);

    let tracks: Vec<Track> = found
        .into_iter()
        .zip(1u32..)
        .map(|(s, id)| Track {
            id: TrackId(id),
            name: s.name,
            author: s.author.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            album: s.album.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            duration_secs: s.duration_secs,
            file_ref: s.file_ref,
            release_date: None,
            genres: s.genres,
        })
        .collect();

    info!(dir = %dir.display(), tracks = tracks.len(), "music directory scanned");
    Catalog::new(tracks)
}
