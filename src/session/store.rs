use rand::rngs::StdRng;
use tracing::debug;

use crate::catalog::{Catalog, Track, TrackId};
use crate::search::{FilterKind, derive_playlist};

use super::intent::Intent;
use super::sequencer;
use super::state::SessionState;

/// Owner of the session state and the only writer to it.
pub struct Session {
    catalog: Catalog,
    state: SessionState,
    rng: StdRng,
    version: u64,
}

/// Non-finite or negative transport values collapse to zero.
fn sanitize_secs(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 { secs } else { 0.0 }
}

impl Session {
    /// Start a session over `catalog`. The playlist starts as the full catalog.
    ///
    /// `rng` drives shuffle picks; seed it for reproducible sequences.
    pub fn new(catalog: Catalog, rng: StdRng) -> Self {
        let mut session = Self {
            catalog,
            state: SessionState::default(),
            rng,
            version: 0,
        };
        session.refresh_playlist();
        session
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Bumped by every intent that changed something.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply `intent`. Returns true when the state changed.
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        let changed = match intent {
            Intent::Select(id) => self.select(id),
            Intent::PlayPause => self.play_pause(),
            Intent::Next => self.next(),
            Intent::Prev => self.prev(),
            Intent::ToggleShuffle => self.toggle_shuffle(),
            Intent::ToggleLoop => {
                self.state.is_looping = !self.state.is_looping;
                true
            }
            Intent::ToggleLike(id) => {
                let liked = self.state.liked.toggle(id);
                debug!(%id, liked, "like toggled");
                true
            }
            Intent::Search(query) => {
                self.state.query = query;
                self.refresh_playlist();
                true
            }
            Intent::SelectFilter(value) => {
                self.state.filters.toggle(value);
                self.refresh_playlist();
                true
            }
            Intent::ClearFilter(kind) => self.clear_filter(kind),
            Intent::ClearFilters => {
                if self.state.filters.is_empty() {
                    return false;
                }
                self.state.filters.clear_all();
                self.refresh_playlist();
                true
            }
            Intent::SetVolume(volume) => self.set_volume(volume),
            Intent::SetCurrentTime(secs) => self.set_current_time(secs),
            Intent::SetDuration(secs) => self.set_duration(secs),
            Intent::Ended => self.ended(),
        };

        if changed {
            self.version += 1;
        }
        changed
    }

    fn select(&mut self, id: TrackId) -> bool {
        if self.state.is_current(id) {
            return self.play_pause();
        }
        let Some(track) = self.catalog.get(id).cloned() else {
            debug!(%id, "select ignored: unknown track");
            return false;
        };

        if self.state.is_shuffled {
            self.state.played_track_ids.clear();
            self.mark_played(id);
        }
        self.switch_to(track);
        true
    }

    fn play_pause(&mut self) -> bool {
        if self.state.current_track.is_none() {
            return false;
        }
        self.state.is_playing = !self.state.is_playing;
        true
    }

    fn next(&mut self) -> bool {
        let Some(current) = self.state.current_id() else {
            return false;
        };

        let next = if self.state.is_shuffled {
            sequencer::next_shuffled(
                &self.state.playlist,
                current,
                &mut self.state.played_track_ids,
                &mut self.rng,
            )
            .cloned()
        } else {
            sequencer::next_in_order(&self.state.playlist, current).cloned()
        };

        let Some(next) = next else {
            debug!(%current, "no next track");
            return false;
        };

        if self.state.is_shuffled {
            self.mark_played(current);
        }
        debug!(from = %current, to = %next.id, shuffled = self.state.is_shuffled, "advance");
        self.switch_to(next);
        true
    }

    fn prev(&mut self) -> bool {
        let Some(current) = self.state.current_id() else {
            return false;
        };
        let Some(prev) = sequencer::prev_in_order(&self.state.playlist, current).cloned() else {
            return false;
        };
        self.switch_to(prev);
        true
    }

    fn toggle_shuffle(&mut self) -> bool {
        self.state.is_shuffled = !self.state.is_shuffled;
        self.state.played_track_ids.clear();
        if let Some(id) = self.state.current_id() {
            self.mark_played(id);
        }
        true
    }

    fn clear_filter(&mut self, kind: FilterKind) -> bool {
        if self.state.filters.get(kind).is_none() {
            return false;
        }
        self.state.filters.clear(kind);
        self.refresh_playlist();
        true
    }

    fn set_volume(&mut self, volume: f32) -> bool {
        if !volume.is_finite() {
            return false;
        }
        let volume = volume.clamp(0.0, 1.0);
        if volume == self.state.volume {
            return false;
        }
        self.state.volume = volume;
        true
    }

    fn set_current_time(&mut self, secs: f64) -> bool {
        if self.state.current_track.is_none() {
            return false;
        }
        let mut secs = sanitize_secs(secs);
        if self.state.duration > 0.0 {
            secs = secs.min(self.state.duration);
        }
        if secs == self.state.current_time {
            return false;
        }
        self.state.current_time = secs;
        true
    }

    fn set_duration(&mut self, secs: f64) -> bool {
        if self.state.current_track.is_none() {
            return false;
        }
        self.state.duration = sanitize_secs(secs);
        if self.state.duration > 0.0 {
            self.state.current_time = self.state.current_time.min(self.state.duration);
        }
        true
    }

    fn ended(&mut self) -> bool {
        if self.state.is_looping || self.state.current_track.is_none() {
            return false;
        }
        if self.next() {
            return true;
        }
        // Nothing left to play: reflect that the backend has stopped.
        if self.state.is_playing {
            self.state.is_playing = false;
            return true;
        }
        false
    }

    fn switch_to(&mut self, track: Track) {
        self.state.current_track = Some(track);
        self.state.is_playing = true;
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
    }

    /// Record `id` as played, but only while it is part of the playlist.
    fn mark_played(&mut self, id: TrackId) {
        if self.state.in_playlist(id) {
            self.state.played_track_ids.insert(id);
        }
    }

    fn refresh_playlist(&mut self) {
        self.state.playlist = derive_playlist(
            self.catalog.tracks(),
            &self.state.filters,
            &self.state.query,
        );
        let playlist = &self.state.playlist;
        self.state
            .played_track_ids
            .retain(|id| playlist.iter().any(|t| t.id == *id));
        debug!(
            query = %self.state.query,
            tracks = self.state.playlist.len(),
            "playlist derived"
        );
    }
}
