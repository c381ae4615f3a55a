//! Background probing of real track lengths.
//!
//! Each batch is tagged with a generation. Starting a new batch cancels the
//! previous one, and any result that arrives tagged with an older generation
//! is dropped in [`DurationProber::poll`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use lofty::file::AudioFile;
use tracing::debug;

use crate::catalog::{Track, TrackId};
use crate::error::ProbeError;

/// Reads the length of one track, in seconds.
pub type ProbeFn = Arc<dyn Fn(&Track) -> Result<f64, ProbeError> + Send + Sync>;

const DEFAULT_WORKERS: usize = 4;

struct ProbeBatch {
    generation: u64,
    durations: HashMap<TrackId, f64>,
}

pub struct DurationProber {
    probe: ProbeFn,
    workers: usize,
    generation: u64,
    cancel: Option<Arc<AtomicBool>>,
    tx: Sender<ProbeBatch>,
    rx: Receiver<ProbeBatch>,
}

/// Read the length from the file's audio properties.
pub fn lofty_probe(track: &Track) -> Result<f64, ProbeError> {
    let tagged = lofty::read_from_path(&track.file_ref)?;
    let secs = tagged.properties().duration().as_secs_f64();
    if secs > 0.0 { Ok(secs) } else { Err(ProbeError::Empty) }
}

impl DurationProber {
    pub fn new(probe: ProbeFn) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            probe,
            workers: DEFAULT_WORKERS,
            generation: 0,
            cancel: None,
            tx,
            rx,
        }
    }

    pub fn with_lofty() -> Self {
        Self::new(Arc::new(lofty_probe))
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Probe `tracks` in the background, superseding any batch in flight.
    pub fn start(&mut self, tracks: &[Track]) {
        self.cancel();
        self.generation += 1;

        let cancel = Arc::new(AtomicBool::new(false));
        self.cancel = Some(cancel.clone());

        let generation = self.generation;
        let probe = self.probe.clone();
        let tx = self.tx.clone();
        let workers = self.workers;
        let tracks = tracks.to_vec();

        debug!(generation, tracks = tracks.len(), "probe batch started");
        thread::spawn(move || {
            let durations = probe_batch(&tracks, &probe, &cancel, workers);
            if cancel.load(Ordering::Relaxed) {
                debug!(generation, "probe batch cancelled");
                return;
            }
            let _ = tx.send(ProbeBatch {
                generation,
                durations,
            });
        });
    }

    pub fn cancel(&mut self) {
        if let Some(flag) = self.cancel.take() {
            flag.store(true, Ordering::Relaxed);
        }
    }

    /// Durations from the current generation, if its batch has finished.
    pub fn poll(&mut self) -> Option<HashMap<TrackId, f64>> {
        let mut latest = None;
        while let Ok(batch) = self.rx.try_recv() {
            if batch.generation == self.generation {
                latest = Some(batch.durations);
            } else {
                debug!(
                    stale = batch.generation,
                    current = self.generation,
                    "discarding stale probe batch"
                );
            }
        }
        latest
    }

    #[cfg(test)]
    pub(crate) fn wait(&mut self, timeout: std::time::Duration) -> Option<HashMap<TrackId, f64>> {
        let deadline = std::time::Instant::now() + timeout;
        while std::time::Instant::now() < deadline {
            if let Some(found) = self.poll() {
                return Some(found);
            }
            thread::sleep(std::time::Duration::from_millis(5));
        }
        None
    }
}

impl Drop for DurationProber {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn probe_one(probe: &ProbeFn, cancel: &AtomicBool, track: &Track) -> Result<f64, ProbeError> {
    if cancel.load(Ordering::Relaxed) {
        return Err(ProbeError::Cancelled);
    }
    probe(track)
}

/// Fan the batch out over `workers` scoped threads and join the results.
/// A failed probe only drops that track.
fn probe_batch(
    tracks: &[Track],
    probe: &ProbeFn,
    cancel: &AtomicBool,
    workers: usize,
) -> HashMap<TrackId, f64> {
    if tracks.is_empty() {
        return HashMap::new();
    }
    let chunk_len = tracks.len().div_ceil(workers.max(1));

    thread::scope(|scope| {
        let handles: Vec<_> = tracks
            .chunks(chunk_len)
            .map(|chunk| {
                scope.spawn(move || {
                    let mut found = Vec::with_capacity(chunk.len());
                    for track in chunk {
                        match probe_one(probe, cancel, track) {
                            Ok(secs) => found.push((track.id, secs)),
                            Err(ProbeError::Cancelled) => break,
                            Err(e) => debug!(id = %track.id, error = %e, "probe failed"),
                        }
                    }
                    found
                })
            })
            .collect();

        handles
            .into_iter()
            .filter_map(|h| h.join().ok())
            .flatten()
            .collect()
    })
}
