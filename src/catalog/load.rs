use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::CatalogError;

use super::model::{Catalog, Track};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "track", default)]
    tracks: Vec<Track>,
}

impl Catalog {
    /// Parse a TOML catalog. Relative `track_file` entries are resolved
    /// against `base_dir` when one is given.
    pub fn from_toml_str(text: &str, base_dir: Option<&Path>) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;

        let tracks = file
            .tracks
            .into_iter()
            .map(|mut track| {
                if let Some(dir) = base_dir {
                    track.file_ref = resolve_file_ref(dir, &track.file_ref);
                }
                track
            })
            .collect();

        Catalog::new(tracks)
    }

    /// Load a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_toml_str(&text, path.parent())?;
        info!(path = %path.display(), tracks = catalog.len(), "catalog loaded");
        Ok(catalog)
    }
}

/// Join relative paths onto `dir`; URLs and absolute paths pass through.
fn resolve_file_ref(dir: &Path, file_ref: &str) -> String {
    if file_ref.contains("://") || Path::new(file_ref).is_absolute() {
        return file_ref.to_string();
    }
    dir.join(file_ref).display().to_string()
}
