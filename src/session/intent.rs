use crate::catalog::TrackId;
use crate::search::{FilterKind, FilterValue};

/// Every way the session can change.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Pick a track; picking the current one toggles play/pause.
    Select(TrackId),
    PlayPause,
    Next,
    Prev,
    ToggleShuffle,
    ToggleLoop,
    ToggleLike(TrackId),
    /// Replace the search query and re-derive the playlist.
    Search(String),
    /// Select a filter value; selecting the active one clears it.
    SelectFilter(FilterValue),
    ClearFilter(FilterKind),
    ClearFilters,
    SetVolume(f32),
    /// Transport position, from a media time update or an optimistic seek.
    SetCurrentTime(f64),
    /// Track length reported by the media backend.
    SetDuration(f64),
    /// The media backend reached the end of the track.
    Ended,
}
