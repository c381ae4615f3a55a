use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::catalog::{Track, TrackId};
use crate::config::PlaybackSettings;
use crate::format::format_duration;
use crate::session::{Intent, Session, SessionState};

use super::media::{MediaElement, MediaEvent};
use super::probe::DurationProber;
use super::rewind::RewindWindow;

/// What the media element was last told, so each change is sent once.
#[derive(Debug, Default)]
struct Observed {
    track: Option<TrackId>,
    playing: bool,
    looping: Option<bool>,
    volume: Option<f32>,
    playlist: Option<Vec<TrackId>>,
}

/// Keeps one media element in step with the session.
///
/// State flows into the element through [`reconcile`](Self::reconcile) and
/// element events flow back as intents through
/// [`pump_events`](Self::pump_events). Ingested events never produce media
/// commands other than a deferred `play`.
pub struct TransportBridge<M: MediaElement> {
    media: M,
    observed: Observed,
    rewind: RewindWindow,
    restart_threshold: f64,
    prober: Option<DurationProber>,
    probed: HashMap<TrackId, f64>,
}

impl<M: MediaElement> TransportBridge<M> {
    pub fn new(media: M, playback: &PlaybackSettings) -> Self {
        Self {
            media,
            observed: Observed::default(),
            rewind: RewindWindow::new(Duration::from_millis(playback.rewind_window_ms)),
            restart_threshold: Duration::from_millis(playback.restart_threshold_ms).as_secs_f64(),
            prober: None,
            probed: HashMap::new(),
        }
    }

    pub fn with_prober(mut self, prober: DurationProber) -> Self {
        self.prober = Some(prober);
        self
    }

    #[cfg(test)]
    pub(crate) fn media(&self) -> &M {
        &self.media
    }

    #[cfg(test)]
    pub(crate) fn prober(&self) -> Option<&DurationProber> {
        self.prober.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    /// Drain element events, push state into the element and expire the
    /// rewind window. Returns true when the session or the probed lengths changed.
    pub fn sync(&mut self, session: &mut Session, now: Instant) -> bool {
        if self.rewind.tick(now) {
            debug!("rewind window lapsed");
        }
        let changed = self.pump_events(session);
        self.reconcile(session.state());
        changed
    }

    /// Push session changes into the media element.
    pub fn reconcile(&mut self, state: &SessionState) {
        let track_id = state.current_id();
        if track_id != self.observed.track {
            self.media.pause();
            self.rewind.cancel();
            if let Some(track) = &state.current_track {
                info!(id = %track.id, source = %track.file_ref, "loading track");
                self.media.set_source(&track.file_ref);
                self.media.load();
            }
            self.observed.track = track_id;
            self.observed.playing = false;
        }

        if state.is_playing != self.observed.playing {
            if state.is_playing {
                self.try_play();
            } else {
                self.media.pause();
            }
            self.observed.playing = state.is_playing;
        }

        if self.observed.looping != Some(state.is_looping) {
            self.media.set_loop(state.is_looping);
            self.observed.looping = Some(state.is_looping);
        }

        if self.observed.volume != Some(state.volume) {
            self.media.set_volume(state.volume);
            self.observed.volume = Some(state.volume);
        }

        let ids: Vec<TrackId> = state.playlist.iter().map(|t| t.id).collect();
        if self.observed.playlist.as_ref() != Some(&ids) {
            if let Some(prober) = &mut self.prober {
                let missing: Vec<Track> = state
                    .playlist
                    .iter()
                    .filter(|t| !self.probed.contains_key(&t.id))
                    .cloned()
                    .collect();
                if !missing.is_empty() {
                    prober.start(&missing);
                }
            }
            self.observed.playlist = Some(ids);
        }
    }

    /// Turn pending media events into session intents.
    pub fn pump_events(&mut self, session: &mut Session) -> bool {
        let mut changed = false;

        for event in self.media.poll_events() {
            // Events still queued from the previous source.
            if session.state().current_id() != self.observed.track {
                debug!(?event, "dropping event for a replaced source");
                continue;
            }
            match event {
                MediaEvent::TimeUpdate(secs) => {
                    changed |= session.dispatch(Intent::SetCurrentTime(secs));
                }
                MediaEvent::MetadataLoaded(secs) => {
                    debug!(secs, "metadata loaded");
                    changed |= session.dispatch(Intent::SetDuration(secs));
                }
                MediaEvent::CanPlay => {
                    if session.state().is_playing {
                        self.try_play();
                    }
                }
                MediaEvent::Ended => {
                    if !session.state().is_looping {
                        changed |= session.dispatch(Intent::Ended);
                    }
                }
                MediaEvent::Error(message) => warn!(%message, "media error"),
            }
        }

        if let Some(found) = self.prober.as_mut().and_then(DurationProber::poll) {
            debug!(tracks = found.len(), "probed durations merged");
            self.probed.extend(found);
            changed = true;
        }

        changed
    }

    /// Jump to `fraction` of the active track. Returns the commanded time.
    ///
    /// The session position is updated right away instead of waiting for the
    /// element's next time update.
    pub fn seek(&mut self, session: &mut Session, fraction: f64) -> Option<f64> {
        if !fraction.is_finite() {
            return None;
        }
        let track = session.state().current_track.as_ref()?;
        let duration = self.effective_duration(track, session.state());
        let time = fraction.clamp(0.0, 1.0) * duration;

        self.media.seek(time);
        session.dispatch(Intent::SetCurrentTime(time));
        debug!(fraction, time, "seek");
        Some(time)
    }

    /// Seek relative to the current position by `delta` of the track length.
    pub fn seek_by(&mut self, session: &mut Session, delta: f64) -> Option<f64> {
        let state = session.state();
        let track = state.current_track.as_ref()?;
        let duration = self.effective_duration(track, state);
        if duration <= 0.0 {
            return None;
        }
        let fraction = state.current_time / duration + delta;
        self.seek(session, fraction)
    }

    /// "Previous" with restart semantics.
    ///
    /// Early in a track, or right after a restart, this goes to the previous
    /// track. Otherwise it rewinds to the start and arms the rewind window.
    pub fn previous(&mut self, session: &mut Session, now: Instant) -> bool {
        let state = session.state();
        if state.current_track.is_none() {
            return false;
        }

        if state.current_time < self.restart_threshold || self.rewind.is_armed(now) {
            self.rewind.cancel();
            return session.dispatch(Intent::Prev);
        }

        self.media.seek(0.0);
        session.dispatch(Intent::SetCurrentTime(0.0));
        self.rewind.arm(now);
        debug!("rewound to start");
        true
    }

    /// Best known length of `track`: probed, else the catalog value.
    pub fn known_duration(&self, track: &Track) -> f64 {
        self.probed
            .get(&track.id)
            .copied()
            .unwrap_or(f64::from(track.duration_secs))
    }

    /// Time column for `track`: a countdown for the active track, the length otherwise.
    pub fn time_label(&self, track: &Track, state: &SessionState) -> String {
        if state.is_current(track.id) {
            let remaining = self.effective_duration(track, state) - state.current_time;
            format_duration(remaining.max(0.0))
        } else {
            format_duration(self.known_duration(track))
        }
    }

    /// Stop pending timers and probes and release the element.
    pub fn shutdown(&mut self, fade_out: Duration) {
        self.rewind.cancel();
        if let Some(prober) = &mut self.prober {
            prober.cancel();
        }
        self.media.shutdown(fade_out);
    }

    fn effective_duration(&self, track: &Track, state: &SessionState) -> f64 {
        if state.is_current(track.id) && state.duration > 0.0 {
            state.duration
        } else {
            self.known_duration(track)
        }
    }

    fn try_play(&mut self) {
        if !self.media.is_ready() {
            debug!("play deferred until the source can play");
            return;
        }
        if let Err(e) = self.media.play() {
            warn!(error = %e, "play rejected");
        }
    }
}
