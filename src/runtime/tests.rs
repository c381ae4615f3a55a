use std::fs;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::event_loop::{EventLoopState, Player, handle_control_cmd, handle_key_event};
use super::*;
use crate::catalog::TrackId;
use crate::error::MediaError;
use crate::mpris::ControlCmd;
use crate::search::{FilterKind, FilterValue};
use crate::test_support::{catalog_of, dated, track};
use crate::transport::{MediaElement, MediaEvent};

/// Always ready, never raises events.
struct StubMedia;

impl MediaElement for StubMedia {
    fn set_source(&mut self, _source: &str) {}
    fn load(&mut self) {}
    fn play(&mut self) -> Result<(), MediaError> {
        Ok(())
    }
    fn pause(&mut self) {}
    fn seek(&mut self, _secs: f64) {}
    fn set_loop(&mut self, _looping: bool) {}
    fn set_volume(&mut self, _volume: f32) {}
    fn is_ready(&self) -> bool {
        true
    }
    fn poll_events(&mut self) -> Vec<MediaEvent> {
        Vec::new()
    }
}

struct Harness {
    settings: Settings,
    app: App,
    session: Session,
    bridge: TransportBridge<StubMedia>,
    state: EventLoopState,
}

impl Harness {
    fn new(catalog: Catalog) -> Self {
        let settings = Settings::default();
        let app = App::new(FilterOptions::from_tracks(catalog.tracks()), true);
        let session = start_session(catalog, &settings);
        let bridge = TransportBridge::new(StubMedia, &settings.playback);
        Self {
            settings,
            app,
            session,
            bridge,
            state: EventLoopState::new(),
        }
    }

    fn press(&mut self, code: KeyCode) -> bool {
        let mut player = Player {
            settings: &self.settings,
            app: &mut self.app,
            session: &mut self.session,
            bridge: &mut self.bridge,
        };
        handle_key_event(
            KeyEvent::new(code, KeyModifiers::NONE),
            &mut player,
            &mut self.state,
            Instant::now(),
        )
    }

    fn control(&mut self, cmd: ControlCmd) -> bool {
        let mut player = Player {
            settings: &self.settings,
            app: &mut self.app,
            session: &mut self.session,
            bridge: &mut self.bridge,
        };
        handle_control_cmd(cmd, &mut player, Instant::now())
    }

    fn current(&self) -> Option<TrackId> {
        self.session.state().current_id()
    }
}

#[test]
fn catalog_source_prefers_argument_then_settings() {
    let mut settings = CatalogSettings {
        music_dir: Some(PathBuf::from("/music")),
        ..CatalogSettings::default()
    };
    assert_eq!(
        catalog_source(Some("/x/catalog.toml".into()), &settings),
        PathBuf::from("/x/catalog.toml")
    );
    assert_eq!(catalog_source(None, &settings), PathBuf::from("/music"));

    settings.path = Some(PathBuf::from("/etc/tracks.toml"));
    assert_eq!(
        catalog_source(None, &settings),
        PathBuf::from("/etc/tracks.toml")
    );
}

#[test]
fn load_catalog_reads_toml_files_and_scans_directories() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("tracks.toml");
    fs::write(
        &file,
        r#"
[[track]]
id = 3
name = "Intro"
author = "Band"
album = "First"
duration_in_seconds = 61
track_file = "intro.mp3"
"#,
    )
    .unwrap();

    let catalog = load_catalog(&file, &CatalogSettings::default()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert!(catalog.get(TrackId(3)).is_some());

    // No audio files in the directory: an empty catalog, not an error.
    let scanned = load_catalog(dir.path(), &CatalogSettings::default()).unwrap();
    assert!(scanned.is_empty());
}

#[test]
fn start_session_applies_playback_defaults() {
    let mut settings = Settings::default();
    settings.audio.volume = 0.4;
    settings.playback.shuffle = true;
    settings.playback.looping = true;
    settings.playback.shuffle_seed = Some(9);

    let session = start_session(catalog_of(3), &settings);
    let state = session.state();
    assert_eq!(state.volume, 0.4);
    assert!(state.is_shuffled);
    assert!(state.is_looping);
    assert!(state.current_track.is_none());
}

#[test]
fn navigation_and_enter_select_the_cursor_track() {
    let mut h = Harness::new(catalog_of(4));
    h.press(KeyCode::Char('j'));
    h.press(KeyCode::Char('j'));
    assert!(!h.app.follow_playback);
    h.press(KeyCode::Enter);
    assert_eq!(h.current(), Some(TrackId(3)));
    assert!(h.app.follow_playback);

    h.press(KeyCode::Char('G'));
    assert_eq!(h.app.cursor, 3);
    h.press(KeyCode::Char('g'));
    assert_eq!(h.app.cursor, 3);
    h.press(KeyCode::Char('g'));
    assert_eq!(h.app.cursor, 0);
}

#[test]
fn gg_prefix_is_reset_by_other_keys() {
    let mut h = Harness::new(catalog_of(4));
    h.press(KeyCode::Char('G'));
    h.press(KeyCode::Char('g'));
    h.press(KeyCode::Char('k'));
    h.press(KeyCode::Char('g'));
    assert_eq!(h.app.cursor, 2);
}

#[test]
fn play_pause_starts_from_cursor_when_nothing_is_loaded() {
    let mut h = Harness::new(catalog_of(3));
    h.press(KeyCode::Char('j'));
    h.press(KeyCode::Char(' '));
    assert_eq!(h.current(), Some(TrackId(2)));
    assert!(h.session.state().is_playing);

    h.press(KeyCode::Char('p'));
    assert!(!h.session.state().is_playing);
}

#[test]
fn next_and_smart_previous_keys() {
    let mut h = Harness::new(catalog_of(3));
    h.press(KeyCode::Enter);
    h.press(KeyCode::Char('l'));
    assert_eq!(h.current(), Some(TrackId(2)));

    // Deep into the track: rewind first, then go back.
    h.session.dispatch(Intent::SetCurrentTime(60.0));
    h.press(KeyCode::Char('h'));
    assert_eq!(h.current(), Some(TrackId(2)));
    assert_eq!(h.session.state().current_time, 0.0);
    h.press(KeyCode::Char('h'));
    assert_eq!(h.current(), Some(TrackId(1)));
}

#[test]
fn seek_keys_move_by_the_configured_step() {
    let mut h = Harness::new(catalog_of(1));
    h.press(KeyCode::Enter);
    h.session.dispatch(Intent::SetCurrentTime(90.0));

    h.press(KeyCode::Char('L'));
    assert!((h.session.state().current_time - 99.0).abs() < 1e-9);
    h.press(KeyCode::Char('H'));
    h.press(KeyCode::Char('H'));
    assert!((h.session.state().current_time - 81.0).abs() < 1e-9);
}

#[test]
fn search_prompt_filters_live_and_escape_clears() {
    let mut h = Harness::new(catalog_of(12));
    h.press(KeyCode::Char('/'));
    assert!(h.app.search_mode);
    h.press(KeyCode::Char('1'));
    h.press(KeyCode::Char('1'));
    assert_eq!(h.session.state().query, "11");
    assert_eq!(h.session.state().playlist.len(), 1);

    h.press(KeyCode::Backspace);
    assert_eq!(h.session.state().query, "1");
    assert_eq!(h.session.state().playlist.len(), 4);

    h.press(KeyCode::Enter);
    assert!(!h.app.search_mode);
    assert_eq!(h.session.state().query, "1");

    h.press(KeyCode::Esc);
    assert!(h.session.state().query.is_empty());
    assert_eq!(h.session.state().playlist.len(), 12);
}

#[test]
fn filter_menu_selects_a_value_and_zero_clears() {
    let tracks = vec![
        dated(track(1, "A", "Ann", "X"), "1999-01-01", &["Rock"]),
        dated(track(2, "B", "Bob", "Y"), "2004-01-01", &["Jazz"]),
    ];
    let mut h = Harness::new(Catalog::new(tracks).unwrap());

    h.press(KeyCode::Char('1'));
    assert_eq!(h.app.open_filter, Some(FilterKind::Author));
    h.press(KeyCode::Char('j'));
    h.press(KeyCode::Enter);
    assert!(h.app.open_filter.is_none());
    assert_eq!(
        h.session.state().filters.get(FilterKind::Author),
        Some(FilterValue::Author("Bob".into()))
    );
    assert_eq!(h.session.state().playlist.len(), 1);

    h.press(KeyCode::Char('0'));
    assert_eq!(h.session.state().playlist.len(), 2);
}

#[test]
fn like_keys_target_cursor_and_current_track() {
    let mut h = Harness::new(catalog_of(3));
    h.press(KeyCode::Char('f'));
    assert!(h.session.state().is_liked(TrackId(1)));

    h.press(KeyCode::Char('j'));
    h.press(KeyCode::Enter);
    h.press(KeyCode::Char('F'));
    assert!(h.session.state().is_liked(TrackId(2)));
    h.press(KeyCode::Char('F'));
    assert!(!h.session.state().is_liked(TrackId(2)));
}

#[test]
fn volume_keys_step_and_clamp() {
    let mut h = Harness::new(catalog_of(1));
    assert_eq!(h.session.state().volume, 1.0);
    h.press(KeyCode::Char('+'));
    assert_eq!(h.session.state().volume, 1.0);
    h.press(KeyCode::Char('-'));
    assert!((h.session.state().volume - 0.95).abs() < 1e-6);
}

#[test]
fn mode_toggles_and_quit() {
    let mut h = Harness::new(catalog_of(2));
    h.press(KeyCode::Char('s'));
    h.press(KeyCode::Char('r'));
    assert!(h.session.state().is_shuffled);
    assert!(h.session.state().is_looping);
    assert!(h.press(KeyCode::Char('q')));
}

#[test]
fn media_keys_map_to_session_intents() {
    let mut h = Harness::new(catalog_of(3));
    h.control(ControlCmd::Pause);
    assert!(h.current().is_none());

    h.control(ControlCmd::Play);
    assert_eq!(h.current(), Some(TrackId(1)));
    assert!(h.session.state().is_playing);
    h.control(ControlCmd::Play);
    assert!(h.session.state().is_playing);

    h.control(ControlCmd::Pause);
    assert!(!h.session.state().is_playing);
    h.control(ControlCmd::PlayPause);
    assert!(h.session.state().is_playing);

    h.control(ControlCmd::Next);
    assert_eq!(h.current(), Some(TrackId(2)));
    h.control(ControlCmd::Prev);
    assert_eq!(h.current(), Some(TrackId(1)));

    assert!(h.control(ControlCmd::Quit));
}

#[test]
fn media_key_stop_pauses_and_rewinds() {
    let mut h = Harness::new(catalog_of(2));
    h.control(ControlCmd::Play);
    h.session.dispatch(Intent::SetCurrentTime(60.0));

    assert!(!h.control(ControlCmd::Stop));
    assert_eq!(h.current(), Some(TrackId(1)));
    assert!(!h.session.state().is_playing);
    assert_eq!(h.session.state().current_time, 0.0);

    h.control(ControlCmd::Stop);
    assert!(!h.session.state().is_playing);
}
