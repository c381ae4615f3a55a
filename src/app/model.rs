//! View model types: `App` and `PlaybackState`.
//!
//! The `App` struct holds what only the terminal view cares about: the list
//! cursor, the search prompt and which filter dropdown is open. Playback
//! state lives in the session.

use crate::catalog::{Track, TrackId};
use crate::search::{FilterKind, FilterOptions, FilterValue};
use crate::session::SessionState;

/// The playback state as shown to the user and to MPRIS.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn of(state: &SessionState) -> Self {
        match (&state.current_track, state.is_playing) {
            (None, _) => Self::Stopped,
            (Some(_), true) => Self::Playing,
            (Some(_), false) => Self::Paused,
        }
    }
}

/// The terminal view model.
pub struct App {
    /// Index into the session playlist.
    pub cursor: usize,
    pub follow_playback: bool,

    pub search_mode: bool,
    pub search_input: String,

    /// Dropdown currently open, if any.
    pub open_filter: Option<FilterKind>,
    pub filter_cursor: usize,
    pub options: FilterOptions,

    /// Where the catalog came from, shown in the status box.
    pub source_label: Option<String>,
}

impl App {
    /// Create a new `App` over the filter values found in the catalog.
    pub fn new(options: FilterOptions, follow_playback: bool) -> Self {
        Self {
            cursor: 0,
            follow_playback,
            search_mode: false,
            search_input: String::new(),
            open_filter: None,
            filter_cursor: 0,
            options,
            source_label: None,
        }
    }

    pub fn set_source_label(&mut self, label: String) {
        self.source_label = Some(label);
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Move the cursor down, stopping at the last row.
    pub fn next(&mut self, len: usize) {
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn top(&mut self) {
        self.cursor = 0;
    }

    pub fn bottom(&mut self, len: usize) {
        self.cursor = len.saturating_sub(1);
    }

    /// Keep the cursor inside a playlist of `len` rows.
    pub fn clamp_cursor(&mut self, len: usize) {
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    /// Put the cursor on the playing track when following playback and it is listed.
    pub fn follow(&mut self, state: &SessionState) {
        if !self.follow_playback {
            return;
        }
        if let Some(pos) = state.current_id().and_then(|id| state.playlist_position(id)) {
            self.cursor = pos;
        }
    }

    pub fn cursor_track<'a>(&self, state: &'a SessionState) -> Option<&'a Track> {
        state.playlist.get(self.cursor)
    }

    pub fn cursor_id(&self, state: &SessionState) -> Option<TrackId> {
        self.cursor_track(state).map(|t| t.id)
    }

    /// Start editing the search query, seeded with the active one.
    pub fn enter_search_mode(&mut self, current_query: &str) {
        self.search_mode = true;
        self.open_filter = None;
        self.search_input = current_query.to_string();
    }

    pub fn exit_search_mode(&mut self) {
        self.search_mode = false;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
        self.cursor = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
        self.cursor = 0;
    }

    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.search_mode = false;
        self.cursor = 0;
    }

    /// Open the dropdown for `kind`, or close it when it is already open.
    pub fn toggle_filter_menu(&mut self, kind: FilterKind) {
        if self.open_filter == Some(kind) {
            self.open_filter = None;
        } else {
            self.open_filter = Some(kind);
            self.filter_cursor = 0;
        }
    }

    pub fn close_filter_menu(&mut self) {
        self.open_filter = None;
    }

    pub fn filter_next(&mut self) {
        let len = self.open_filter_values().len();
        if self.filter_cursor + 1 < len {
            self.filter_cursor += 1;
        }
    }

    pub fn filter_prev(&mut self) {
        self.filter_cursor = self.filter_cursor.saturating_sub(1);
    }

    /// Values listed in the open dropdown.
    pub fn open_filter_values(&self) -> Vec<FilterValue> {
        self.open_filter
            .map(|kind| self.options.values(kind))
            .unwrap_or_default()
    }

    /// The value under the dropdown cursor.
    pub fn selected_filter_value(&self) -> Option<FilterValue> {
        self.open_filter_values().into_iter().nth(self.filter_cursor)
    }
}
