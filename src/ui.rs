//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, PlaybackState};
use crate::config::Settings;
use crate::format::format_duration;
use crate::search::{FilterKind, FilterValue};
use crate::session::{Session, SessionState};
use crate::transport::{MediaElement, TransportBridge};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play selected");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next");
    // H/L is filled dynamically from config.
    map.insert("/", "search");
    map.insert("1/2/3", "author/year/genre");
    map.insert("0", "clear filters");
    map.insert("f/F", "like cursor/playing");
    map.insert("s", "shuffle");
    map.insert("r", "repeat");
    map.insert("+/-", "volume");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating the seek step.
fn controls_text(seek_step_percent: f64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "gg/G", "/", "1/2/3", "0", "f/F", "s", "r",
        "+/-", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}%", seek_step_percent))
            } else {
                CONTROLS_MAP.get(k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

/// The status line: search, filters, modes and volume.
fn status_text(app: &App, state: &SessionState) -> String {
    let mut parts: Vec<String> = Vec::new();

    if app.follow_playback {
        parts.push("CURSOR: Follow".to_string());
    } else {
        parts.push("CURSOR: Free-roam".to_string());
    }

    if app.search_mode {
        parts.push(format!("SEARCH: {}_", app.search_input));
    } else if !state.query.trim().is_empty() {
        parts.push(format!("SEARCH: {}", state.query.trim()));
    }

    let filters: Vec<String> = FilterKind::ALL
        .iter()
        .filter_map(|&kind| {
            state
                .filters
                .get(kind)
                .map(|v| format!("{}={}", kind.label(), v))
        })
        .collect();
    if !filters.is_empty() {
        parts.push(format!("FILTER: {}", filters.join(", ")));
    }

    parts.push(format!("Shuffle: {}", on_off(state.is_shuffled)));
    parts.push(format!("Repeat: {}", on_off(state.is_looping)));
    parts.push(format!("Vol: {:.0}%", state.volume * 100.0));
    if !state.liked.is_empty() {
        parts.push(format!("Liked: {}", state.liked.len()));
    }

    if let Some(src) = &app.source_label {
        parts.push(format!("Source: {}", src));
    }

    parts.join(" • ")
}

/// Render the entire UI into the provided `frame`.
pub fn draw<M: MediaElement>(
    frame: &mut Frame,
    app: &App,
    session: &Session,
    bridge: &TransportBridge<M>,
    settings: &Settings,
) {
    let state = session.state();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadenza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(app, state))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    draw_track_list(frame, chunks[2], app, state, bridge);

    if let Some(kind) = app.open_filter {
        draw_filter_popup(frame, chunks[2], app, state, kind);
    }

    draw_player_bar(frame, chunks[3], state, bridge);

    let footer = Paragraph::new(controls_text(settings.controls.seek_step_percent))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

fn draw_track_list<M: MediaElement>(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    state: &SessionState,
    bridge: &TransportBridge<M>,
) {
    // Center the cursor when possible by creating a visible window.
    // Only build ListItems for the visible window (avoid allocating the entire list).
    let total = state.playlist.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = app.cursor.min(total.saturating_sub(1));
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let items: Vec<ListItem> = state.playlist[start..end]
        .iter()
        .map(|track| {
            let marker = if state.is_current(track.id) {
                if state.is_playing { "▶" } else { "‖" }
            } else {
                " "
            };
            let liked = if state.is_liked(track.id) { "♥" } else { " " };
            let line = format!(
                "{} {} {} · {} · {}  [{}]",
                marker,
                liked,
                track.name,
                track.author,
                track.album,
                bridge.time_label(track, state)
            );
            let item = ListItem::new(line);
            if state.is_current(track.id) {
                item.style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                item
            }
        })
        .collect();

    let title = if total == 0 {
        " tracks (no matches) ".to_string()
    } else {
        format!(" tracks ({}) ", total)
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    if total > 0 {
        list_state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Overlay the open filter dropdown (keeps the list visible under it).
fn draw_filter_popup(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    state: &SessionState,
    kind: FilterKind,
) {
    let values = app.open_filter_values();
    let active = state.filters.get(kind);
    let popup_area = centered_rect_sized(40, values.len() as u16 + 2, area);
    frame.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = if values.is_empty() {
        vec![ListItem::new("(none)")]
    } else {
        values
            .iter()
            .map(|v: &FilterValue| {
                let mark = if active.as_ref() == Some(v) { "*" } else { " " };
                ListItem::new(format!("{} {}", mark, v))
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} (enter toggles, esc closes) ", kind.label())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut list_state = ListState::default();
    if !values.is_empty() {
        list_state.select(Some(app.filter_cursor.min(values.len() - 1)));
    }
    frame.render_stateful_widget(list, popup_area, &mut list_state);
}

fn draw_player_bar<M: MediaElement>(
    frame: &mut Frame,
    area: Rect,
    state: &SessionState,
    bridge: &TransportBridge<M>,
) {
    let (title, label) = match &state.current_track {
        Some(track) => {
            let status = match PlaybackState::of(state) {
                PlaybackState::Playing => "Playing",
                PlaybackState::Paused => "Paused",
                PlaybackState::Stopped => "Stopped",
            };
            let total = if state.duration > 0.0 {
                state.duration
            } else {
                bridge.known_duration(track)
            };
            (
                format!(" {}: {} - {} ", status, track.author, track.name),
                format!("{} / {}", format_duration(state.current_time), format_duration(total)),
            )
        }
        None => (" Stopped ".to_string(), "0:00 / 0:00".to_string()),
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(state.progress())
        .label(label);
    frame.render_widget(gauge, area);
}
