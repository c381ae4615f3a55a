use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::app::{App, PlaybackState};
use crate::catalog::TrackId;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::search::FilterKind;
use crate::session::{Intent, Session};
use crate::transport::{MediaElement, TransportBridge};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Session version at the last redraw.
    last_version: Option<u64>,
    /// Last track, playback state and length emitted to MPRIS.
    last_mpris: Option<(Option<TrackId>, PlaybackState, f64)>,
    dirty: bool,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }
}

/// Everything a key or media-key handler may touch.
pub struct Player<'a, M: MediaElement> {
    pub settings: &'a config::Settings,
    pub app: &'a mut App,
    pub session: &'a mut Session,
    pub bridge: &'a mut TransportBridge<M>,
}

/// Main terminal event loop: handles input, UI drawing, sync with the media
/// backend and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run<M: MediaElement>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    player: &mut Player<'_, M>,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if player.bridge.sync(player.session, Instant::now()) {
            state.dirty = true;
        }

        let version = player.session.version();
        if state.last_version != Some(version) {
            let session_state = player.session.state();
            player.app.clamp_cursor(session_state.playlist.len());
            player.app.follow(session_state);
            state.last_version = Some(version);
            state.dirty = true;
        }

        // Keep MPRIS in sync even when changes come from media keys or auto-advance.
        let session_state = player.session.state();
        let snapshot = (
            session_state.current_id(),
            PlaybackState::of(session_state),
            session_state.duration,
        );
        if state.last_mpris != Some(snapshot) {
            update_mpris(mpris, session_state, player.bridge);
            state.last_mpris = Some(snapshot);
        }

        if std::mem::take(&mut state.dirty) {
            terminal.draw(|f| {
                ui::draw(f, player.app, player.session, player.bridge, player.settings)
            })?;
        }

        while let Ok(cmd) = control_rx.try_recv() {
            debug!(?cmd, "media key");
            state.dirty = true;
            if handle_control_cmd(cmd, player, Instant::now()) {
                return quit(player);
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    state.dirty = true;
                    if handle_key_event(key, player, state, Instant::now()) {
                        return quit(player);
                    }
                }
                Event::Resize(..) => state.dirty = true,
                _ => {}
            }
        }
    }
}

fn quit<M: MediaElement>(player: &mut Player<'_, M>) -> Result<(), Box<dyn std::error::Error>> {
    info!("quit requested");
    player.bridge.shutdown(Duration::from_millis(
        player.settings.audio.quit_fade_out_ms,
    ));
    Ok(())
}

/// Play the cursor track when nothing is loaded yet.
fn start_from_cursor<M: MediaElement>(player: &mut Player<'_, M>) -> bool {
    match player.app.cursor_id(player.session.state()) {
        Some(id) => player.session.dispatch(Intent::Select(id)),
        None => false,
    }
}

/// Apply a media-key command. Returns true when the app should quit.
pub fn handle_control_cmd<M: MediaElement>(
    cmd: ControlCmd,
    player: &mut Player<'_, M>,
    now: Instant,
) -> bool {
    if cmd == ControlCmd::Quit {
        return true;
    }
    player.app.follow_playback_on();

    let loaded = player.session.state().current_track.is_some();
    let playing = player.session.state().is_playing;
    match cmd {
        ControlCmd::Play | ControlCmd::PlayPause if !loaded => {
            start_from_cursor(player);
        }
        ControlCmd::Play => {
            if !playing {
                player.session.dispatch(Intent::PlayPause);
            }
        }
        ControlCmd::Pause => {
            if playing {
                player.session.dispatch(Intent::PlayPause);
            }
        }
        ControlCmd::PlayPause => {
            player.session.dispatch(Intent::PlayPause);
        }
        ControlCmd::Stop => {
            if playing {
                player.session.dispatch(Intent::PlayPause);
            }
            player.bridge.seek(player.session, 0.0);
        }
        ControlCmd::Next => {
            player.session.dispatch(Intent::Next);
        }
        ControlCmd::Prev => {
            player.bridge.previous(player.session, now);
        }
        ControlCmd::Quit => {}
    }

    false
}

/// Apply one key press. Returns true when the app should quit.
pub fn handle_key_event<M: MediaElement>(
    key: KeyEvent,
    player: &mut Player<'_, M>,
    state: &mut EventLoopState,
    now: Instant,
) -> bool {
    if player.app.search_mode {
        state.pending_gg = false;
        handle_search_key(key, player);
        return false;
    }

    if player.app.open_filter.is_some() {
        state.pending_gg = false;
        handle_filter_key(key, player);
        return false;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    let len = player.session.state().playlist.len();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => {
            let query = player.session.state().query.clone();
            player.app.enter_search_mode(&query);
        }
        KeyCode::Esc => {
            if !player.session.state().query.is_empty() {
                player.app.clear_search();
                player.session.dispatch(Intent::Search(String::new()));
            }
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                player.app.follow_playback_off();
                player.app.top();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            player.app.follow_playback_off();
            player.app.bottom(len);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            player.app.follow_playback_off();
            player.app.next(len);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            player.app.follow_playback_off();
            player.app.prev();
        }
        KeyCode::Enter => {
            if let Some(id) = player.app.cursor_id(player.session.state()) {
                player.app.follow_playback_on();
                player.session.dispatch(Intent::Select(id));
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            handle_control_cmd(ControlCmd::PlayPause, player, now);
        }
        KeyCode::Char('l') => {
            handle_control_cmd(ControlCmd::Next, player, now);
        }
        KeyCode::Char('h') => {
            handle_control_cmd(ControlCmd::Prev, player, now);
        }
        KeyCode::Char('L') => {
            let step = player.settings.controls.seek_step_percent / 100.0;
            player.bridge.seek_by(player.session, step);
        }
        KeyCode::Char('H') => {
            let step = player.settings.controls.seek_step_percent / 100.0;
            player.bridge.seek_by(player.session, -step);
        }
        KeyCode::Char('s') => {
            player.session.dispatch(Intent::ToggleShuffle);
        }
        KeyCode::Char('r') => {
            player.session.dispatch(Intent::ToggleLoop);
        }
        KeyCode::Char('f') => {
            if let Some(id) = player.app.cursor_id(player.session.state()) {
                player.session.dispatch(Intent::ToggleLike(id));
            }
        }
        KeyCode::Char('F') => {
            if let Some(id) = player.session.state().current_id() {
                player.session.dispatch(Intent::ToggleLike(id));
            }
        }
        KeyCode::Char('1') => player.app.toggle_filter_menu(FilterKind::Author),
        KeyCode::Char('2') => player.app.toggle_filter_menu(FilterKind::Year),
        KeyCode::Char('3') => player.app.toggle_filter_menu(FilterKind::Genre),
        KeyCode::Char('0') => {
            player.session.dispatch(Intent::ClearFilters);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let volume = player.session.state().volume + player.settings.controls.volume_step;
            player.session.dispatch(Intent::SetVolume(volume));
        }
        KeyCode::Char('-') => {
            let volume = player.session.state().volume - player.settings.controls.volume_step;
            player.session.dispatch(Intent::SetVolume(volume));
        }
        _ => {}
    }

    false
}

/// The search prompt re-derives the playlist on every edit.
fn handle_search_key<M: MediaElement>(key: KeyEvent, player: &mut Player<'_, M>) {
    let len = player.session.state().playlist.len();
    match key.code {
        KeyCode::Esc => {
            player.app.clear_search();
            player.session.dispatch(Intent::Search(String::new()));
        }
        KeyCode::Enter => player.app.exit_search_mode(),
        KeyCode::Backspace => {
            player.app.pop_search_char();
            player
                .session
                .dispatch(Intent::Search(player.app.search_input.clone()));
        }
        KeyCode::Down => {
            player.app.follow_playback_off();
            player.app.next(len);
        }
        KeyCode::Up => {
            player.app.follow_playback_off();
            player.app.prev();
        }
        KeyCode::Char(c) if !c.is_control() => {
            player.app.follow_playback_off();
            player.app.push_search_char(c);
            player
                .session
                .dispatch(Intent::Search(player.app.search_input.clone()));
        }
        _ => {}
    }
}

fn handle_filter_key<M: MediaElement>(key: KeyEvent, player: &mut Player<'_, M>) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => player.app.close_filter_menu(),
        KeyCode::Char('j') | KeyCode::Down => player.app.filter_next(),
        KeyCode::Char('k') | KeyCode::Up => player.app.filter_prev(),
        KeyCode::Char('1') => player.app.toggle_filter_menu(FilterKind::Author),
        KeyCode::Char('2') => player.app.toggle_filter_menu(FilterKind::Year),
        KeyCode::Char('3') => player.app.toggle_filter_menu(FilterKind::Genre),
        KeyCode::Enter => {
            if let Some(value) = player.app.selected_filter_value() {
                player.session.dispatch(Intent::SelectFilter(value));
                player.app.close_filter_menu();
                player.app.top();
            }
        }
        _ => {}
    }
}
