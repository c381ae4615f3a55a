use super::*;
use crate::catalog::{Catalog, TrackId};
use crate::search::{FilterKind, FilterOptions, FilterValue};
use crate::session::{Intent, Session};
use crate::test_support::{catalog_of, dated, track};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn session(n: u32) -> Session {
    Session::new(catalog_of(n), StdRng::seed_from_u64(0))
}

fn app_for(session: &Session) -> App {
    App::new(FilterOptions::from_tracks(session.catalog().tracks()), true)
}

#[test]
fn playback_state_follows_session() {
    let mut s = session(2);
    assert_eq!(PlaybackState::of(s.state()), PlaybackState::Stopped);
    s.dispatch(Intent::Select(TrackId(1)));
    assert_eq!(PlaybackState::of(s.state()), PlaybackState::Playing);
    s.dispatch(Intent::PlayPause);
    assert_eq!(PlaybackState::of(s.state()), PlaybackState::Paused);
}

#[test]
fn cursor_moves_within_bounds() {
    let s = session(3);
    let mut app = app_for(&s);
    let len = s.state().playlist.len();

    app.prev();
    assert_eq!(app.cursor, 0);
    app.next(len);
    app.next(len);
    app.next(len);
    assert_eq!(app.cursor, 2);
    app.top();
    assert_eq!(app.cursor, 0);
    app.bottom(len);
    assert_eq!(app.cursor_id(s.state()), Some(TrackId(3)));

    app.clamp_cursor(1);
    assert_eq!(app.cursor, 0);
    app.bottom(0);
    assert_eq!(app.cursor, 0);
}

#[test]
fn follow_tracks_playing_row_only_when_enabled() {
    let mut s = session(4);
    let mut app = app_for(&s);
    s.dispatch(Intent::Select(TrackId(3)));

    app.follow(s.state());
    assert_eq!(app.cursor, 2);

    app.follow_playback_off();
    app.top();
    app.follow(s.state());
    assert_eq!(app.cursor, 0);
}

#[test]
fn search_prompt_edits_input_and_resets_cursor() {
    let s = session(4);
    let mut app = app_for(&s);
    app.cursor = 3;

    app.enter_search_mode("ab");
    assert!(app.search_mode);
    app.push_search_char('c');
    assert_eq!(app.search_input, "abc");
    assert_eq!(app.cursor, 0);
    app.pop_search_char();
    assert_eq!(app.search_input, "ab");

    app.clear_search();
    assert!(!app.search_mode);
    assert!(app.search_input.is_empty());
}

#[test]
fn filter_menu_toggles_and_selects() {
    let tracks = vec![
        dated(track(1, "A", "Ann", "X"), "1999-01-01", &["Rock"]),
        dated(track(2, "B", "Bob", "Y"), "2004-01-01", &["Jazz"]),
    ];
    let catalog = Catalog::new(tracks).unwrap();
    let mut app = App::new(FilterOptions::from_tracks(catalog.tracks()), true);

    app.toggle_filter_menu(FilterKind::Year);
    assert_eq!(app.open_filter, Some(FilterKind::Year));
    assert_eq!(app.selected_filter_value(), Some(FilterValue::Year(2004)));
    app.filter_next();
    app.filter_next();
    assert_eq!(app.selected_filter_value(), Some(FilterValue::Year(1999)));

    app.toggle_filter_menu(FilterKind::Author);
    assert_eq!(app.filter_cursor, 0);
    assert_eq!(
        app.selected_filter_value(),
        Some(FilterValue::Author("Ann".into()))
    );

    app.toggle_filter_menu(FilterKind::Author);
    assert!(app.open_filter.is_none());
    assert!(app.selected_filter_value().is_none());
}

#[test]
fn opening_search_closes_filter_menu() {
    let s = session(1);
    let mut app = app_for(&s);
    app.toggle_filter_menu(FilterKind::Genre);
    app.enter_search_mode("");
    assert!(app.open_filter.is_none());
}
