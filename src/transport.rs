//! Transport: the bridge between the session and a media element.
//!
//! The bridge is the only owner of the media element. It also runs the
//! rewind window behind the "previous" button and the background duration
//! prober for the visible playlist.

mod bridge;
mod media;
mod probe;
mod rewind;
mod rodio_media;

pub use bridge::TransportBridge;
pub use media::{MediaElement, MediaEvent};
pub use probe::DurationProber;
pub use rodio_media::RodioMedia;
