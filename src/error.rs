//! Error types shared across the player.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::TrackId;

/// Failures while building the track catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate track id {0}")]
    DuplicateId(TrackId),
}

/// Failures reported by a media backend.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The current source has not signalled it can play yet.
    #[error("media is not ready to play")]
    NotReady,

    #[error("no source loaded")]
    NoSource,

    #[error("audio backend is gone")]
    Disconnected,

    #[error("no audio output device: {0}")]
    Output(String),

    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// Failures while probing a track's real duration.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to read metadata: {0}")]
    Metadata(#[from] lofty::error::LoftyError),

    #[error("track reports a zero length")]
    Empty,

    #[error("probe cancelled")]
    Cancelled,
}
