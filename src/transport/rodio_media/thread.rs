use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::error::MediaError;
use crate::transport::media::MediaEvent;

use super::sink::{create_sink_at, fade_out_sink};

#[derive(Debug)]
pub(super) enum MediaCmd {
    /// Replace the source. Events for it are tagged with `seq`.
    Load { seq: u64, path: String },
    Play,
    Pause,
    Seek(Duration),
    SetLoop(bool),
    SetVolume(f32),
    /// Quit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

pub(super) type TaggedEvent = (u64, MediaEvent);

/// Everything the audio thread tracks about the loaded source.
struct Playback {
    seq: u64,
    path: Option<String>,
    sink: Option<Sink>,
    paused: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    looping: bool,
    volume: f32,
}

impl Playback {
    fn new() -> Self {
        Self {
            seq: 0,
            path: None,
            sink: None,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            looping: false,
            volume: 1.0,
        }
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    /// Rebuild the sink at `at`, keeping the paused state.
    fn rebuild(&mut self, stream: &OutputStream, at: Duration) -> Result<Option<Duration>, MediaError> {
        let Some(path) = self.path.clone() else {
            return Err(MediaError::NoSource);
        };
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        let prepared = create_sink_at(stream, &path, at)?;
        prepared.sink.set_volume(self.volume);
        if self.paused {
            self.started_at = None;
        } else {
            prepared.sink.play();
            self.started_at = Some(Instant::now());
        }
        self.sink = Some(prepared.sink);
        self.accumulated = at;
        Ok(prepared.total)
    }
}

struct Emitter {
    tx: Sender<TaggedEvent>,
}

impl Emitter {
    fn emit(&self, seq: u64, event: MediaEvent) {
        let _ = self.tx.send((seq, event));
    }
}

pub(super) fn spawn_media_thread(
    rx: Receiver<MediaCmd>,
    events: Sender<TaggedEvent>,
    tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let events = Emitter { tx: events };

        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let err = MediaError::Output(e.to_string());
                warn!(error = %err, "audio output unavailable");
                run_without_output(&rx, &events, &err);
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut pb = Playback::new();

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    MediaCmd::Load { seq, path } => {
                        pb.stop();
                        pb.seq = seq;
                        pb.path = Some(path);
                        match pb.rebuild(&stream, Duration::ZERO) {
                            Ok(total) => {
                                let secs = total.map_or(0.0, |d| d.as_secs_f64());
                                events.emit(seq, MediaEvent::MetadataLoaded(secs));
                                events.emit(seq, MediaEvent::CanPlay);
                            }
                            Err(e) => {
                                pb.path = None;
                                events.emit(seq, MediaEvent::Error(e.to_string()));
                            }
                        }
                    }

                    MediaCmd::Play => {
                        if let Some(ref s) = pb.sink {
                            if pb.paused {
                                s.play();
                                pb.started_at = Some(Instant::now());
                                pb.paused = false;
                            }
                        }
                    }

                    MediaCmd::Pause => {
                        if let Some(ref s) = pb.sink {
                            if !pb.paused {
                                s.pause();
                                if let Some(st) = pb.started_at.take() {
                                    pb.accumulated += st.elapsed();
                                }
                                pb.paused = true;
                            }
                        }
                    }

                    MediaCmd::Seek(at) => {
                        // Scrubbing: rebuild the current sink and skip into the file.
                        if pb.sink.is_none() {
                            continue;
                        }
                        match pb.rebuild(&stream, at) {
                            Ok(_) => events.emit(pb.seq, MediaEvent::TimeUpdate(at.as_secs_f64())),
                            Err(e) => events.emit(pb.seq, MediaEvent::Error(e.to_string())),
                        }
                    }

                    MediaCmd::SetLoop(looping) => pb.looping = looping,

                    MediaCmd::SetVolume(volume) => {
                        pb.volume = volume;
                        if let Some(ref s) = pb.sink {
                            s.set_volume(volume);
                        }
                    }

                    MediaCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = pb.sink {
                            if !pb.paused {
                                fade_out_sink(s, pb.volume, fade_out_ms);
                            }
                            s.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    let finished = match pb.sink {
                        Some(ref s) if !pb.paused => s.empty(),
                        _ => continue,
                    };

                    if !finished {
                        events.emit(pb.seq, MediaEvent::TimeUpdate(pb.elapsed().as_secs_f64()));
                    } else if pb.looping {
                        debug!(seq = pb.seq, "looping source");
                        match pb.rebuild(&stream, Duration::ZERO) {
                            Ok(_) => events.emit(pb.seq, MediaEvent::TimeUpdate(0.0)),
                            Err(e) => events.emit(pb.seq, MediaEvent::Error(e.to_string())),
                        }
                    } else {
                        pb.paused = true;
                        pb.started_at = None;
                        events.emit(pb.seq, MediaEvent::Ended);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

/// Without an output device every load fails, until quit.
fn run_without_output(rx: &Receiver<MediaCmd>, events: &Emitter, err: &MediaError) {
    while let Ok(cmd) = rx.recv() {
        match cmd {
            MediaCmd::Load { seq, .. } => events.emit(seq, MediaEvent::Error(err.to_string())),
            MediaCmd::Quit { .. } => break,
            _ => {}
        }
    }
}
