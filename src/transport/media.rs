//! The media primitive the transport bridge drives.

use std::time::Duration;

use crate::error::MediaError;

/// Notifications raised by a media backend, drained with [`MediaElement::poll_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback position in seconds.
    TimeUpdate(f64),
    /// Length of the loaded source in seconds.
    MetadataLoaded(f64),
    /// The loaded source can start playing.
    CanPlay,
    /// Playback reached the end of the source. Not raised while looping.
    Ended,
    Error(String),
}

/// A single playable media element.
///
/// Loading is asynchronous: after [`load`](Self::load) the element reports
/// `MetadataLoaded` and `CanPlay` through later events, and `play` fails until
/// it is ready.
pub trait MediaElement {
    fn set_source(&mut self, source: &str);
    fn load(&mut self);
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn seek(&mut self, secs: f64);
    fn set_loop(&mut self, looping: bool);
    fn set_volume(&mut self, volume: f32);
    fn is_ready(&self) -> bool;
    fn poll_events(&mut self) -> Vec<MediaEvent>;

    /// Release the backend. Playback may fade out over `fade_out`.
    fn shutdown(&mut self, _fade_out: Duration) {}
}
