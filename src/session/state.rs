use std::collections::HashSet;

use crate::catalog::{Track, TrackId};
use crate::search::ActiveFilters;

use super::likes::LikedTracks;

/// Snapshot of the player session. Only `Session` mutates it.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub current_track: Option<Track>,
    /// Never true without a current track.
    pub is_playing: bool,
    /// Seconds into the active track.
    pub current_time: f64,
    /// Length of the active track as reported by the media backend; 0 until known.
    pub duration: f64,
    /// Catalog order, narrowed by filters and the search query.
    pub playlist: Vec<Track>,
    pub is_shuffled: bool,
    /// Repeat the current track; the media backend loops it by itself.
    pub is_looping: bool,
    /// Ids surfaced in the current shuffle round. Always a subset of `playlist`.
    pub played_track_ids: HashSet<TrackId>,
    pub liked: LikedTracks,
    pub query: String,
    pub filters: ActiveFilters,
    pub volume: f32,
}

impl SessionState {
    pub fn current_id(&self) -> Option<TrackId> {
        self.current_track.as_ref().map(|t| t.id)
    }

    pub fn is_current(&self, id: TrackId) -> bool {
        self.current_id() == Some(id)
    }

    pub fn is_liked(&self, id: TrackId) -> bool {
        self.liked.contains(id)
    }

    pub fn playlist_position(&self, id: TrackId) -> Option<usize> {
        self.playlist.iter().position(|t| t.id == id)
    }

    pub fn in_playlist(&self, id: TrackId) -> bool {
        self.playlist_position(id).is_some()
    }

    /// Fraction of the active track already played, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
