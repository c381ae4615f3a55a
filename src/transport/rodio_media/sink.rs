//! Utilities for creating `rodio` sinks from a track source.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::MediaError;

/// A paused sink plus the decoder's idea of the total length.
pub(super) struct PreparedSink {
    pub sink: Sink,
    pub total: Option<Duration>,
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &str,
    start_at: Duration,
) -> Result<PreparedSink, MediaError> {
    let file = File::open(path).map_err(|source| MediaError::Open {
        path: path.to_string(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|source| MediaError::Decode {
        path: path.to_string(),
        source,
    })?;
    let total = decoder.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    Ok(PreparedSink { sink, total })
}

/// Ramp `sink` from `volume` down to silence over `fade_out_ms`.
pub(super) fn fade_out_sink(sink: &Sink, volume: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(volume * (1.0 - t));
        std::thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
