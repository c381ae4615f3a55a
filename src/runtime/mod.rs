use std::env;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::catalog::{self, Catalog};
use crate::config::{CatalogSettings, Settings};
use crate::error::CatalogError;
use crate::mpris::ControlCmd;
use crate::search::FilterOptions;
use crate::session::{Intent, Session};
use crate::transport::{DurationProber, RodioMedia, TransportBridge};

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;

#[cfg(test)]
mod tests;

/// Where the catalog is read from, in priority order.
fn catalog_source(arg: Option<String>, settings: &CatalogSettings) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| settings.path.clone())
        .or_else(|| settings.music_dir.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// A `.toml` path is a catalog file; anything else is scanned as a music directory.
fn load_catalog(source: &Path, settings: &CatalogSettings) -> Result<Catalog, CatalogError> {
    let is_toml = source
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
    if is_toml {
        Catalog::load(source)
    } else {
        catalog::scan(source, settings)
    }
}

fn seed(settings: &Settings) -> u64 {
    settings.playback.shuffle_seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    })
}

/// Build the session and apply the configured playback defaults.
fn start_session(catalog: Catalog, settings: &Settings) -> Session {
    let mut session = Session::new(catalog, StdRng::seed_from_u64(seed(settings)));
    session.dispatch(Intent::SetVolume(settings.audio.volume));
    if settings.playback.shuffle {
        session.dispatch(Intent::ToggleShuffle);
    }
    if settings.playback.looping {
        session.dispatch(Intent::ToggleLoop);
    }
    session
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();
    let log_file = logging::init_logging(&settings.logging);
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }
    info!(log_file = ?log_file, "cadenza starting");

    let source = catalog_source(env::args().nth(1), &settings.catalog);
    let catalog = load_catalog(&source, &settings.catalog)?;
    if catalog.is_empty() {
        warn!(source = %source.display(), "catalog is empty");
    }

    let mut app = App::new(
        FilterOptions::from_tracks(catalog.tracks()),
        settings.ui.follow_playback,
    );
    app.set_source_label(source.display().to_string());
    let mut session = start_session(catalog, &settings);

    let media = RodioMedia::spawn(Duration::from_millis(settings.audio.tick_ms));
    let mut bridge = TransportBridge::new(media, &settings.playback);
    if settings.catalog.probe_durations {
        bridge = bridge.with_prober(DurationProber::with_lofty());
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new();
        let mut player = event_loop::Player {
            settings: &settings,
            app: &mut app,
            session: &mut session,
            bridge: &mut bridge,
        };

        event_loop::run(&mut terminal, &mut player, &mpris, &control_rx, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
