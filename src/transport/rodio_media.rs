//! `MediaElement` backed by rodio on a dedicated audio thread.

mod sink;
mod thread;

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::error::MediaError;

use super::media::{MediaElement, MediaEvent};
use thread::{MediaCmd, TaggedEvent, spawn_media_thread};

pub struct RodioMedia {
    tx: Sender<MediaCmd>,
    events: Receiver<TaggedEvent>,
    source: Option<String>,
    /// Sequence number of the latest load; older events are dropped.
    seq: u64,
    ready: bool,
    join: Option<JoinHandle<()>>,
}

impl RodioMedia {
    /// Start the audio thread. Position updates arrive every `tick`.
    pub fn spawn(tick: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<MediaCmd>();
        let (event_tx, events) = mpsc::channel::<TaggedEvent>();
        let join = spawn_media_thread(rx, event_tx, tick);

        Self {
            tx,
            events,
            source: None,
            seq: 0,
            ready: false,
            join: Some(join),
        }
    }

    fn send(&self, cmd: MediaCmd) -> Result<(), MediaError> {
        self.tx.send(cmd).map_err(|_| MediaError::Disconnected)
    }
}

impl MediaElement for RodioMedia {
    fn set_source(&mut self, source: &str) {
        self.source = Some(source.to_string());
    }

    fn load(&mut self) {
        let Some(path) = self.source.clone() else {
            return;
        };
        self.seq += 1;
        self.ready = false;
        if self.send(MediaCmd::Load { seq: self.seq, path }).is_err() {
            debug!("audio thread gone; load dropped");
        }
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.source.is_none() {
            return Err(MediaError::NoSource);
        }
        if !self.ready {
            return Err(MediaError::NotReady);
        }
        self.send(MediaCmd::Play)
    }

    fn pause(&mut self) {
        let _ = self.send(MediaCmd::Pause);
    }

    fn seek(&mut self, secs: f64) {
        if secs.is_finite() && secs >= 0.0 {
            let _ = self.send(MediaCmd::Seek(Duration::from_secs_f64(secs)));
        }
    }

    fn set_loop(&mut self, looping: bool) {
        let _ = self.send(MediaCmd::SetLoop(looping));
    }

    fn set_volume(&mut self, volume: f32) {
        let _ = self.send(MediaCmd::SetVolume(volume));
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        let mut out = Vec::new();
        while let Ok((seq, event)) = self.events.try_recv() {
            if seq != self.seq {
                continue;
            }
            if event == MediaEvent::CanPlay {
                self.ready = true;
            }
            out.push(event);
        }
        out
    }

    fn shutdown(&mut self, fade_out: Duration) {
        let _ = self.send(MediaCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Drop for RodioMedia {
    fn drop(&mut self) {
        if self.join.is_some() {
            self.shutdown(Duration::ZERO);
        }
    }
}
