//! Session state store.
//!
//! A single `Session` owns the process-wide playback state. Every change goes
//! through [`Session::dispatch`] with a named [`Intent`]; readers get a shared
//! `&SessionState` and redraw when [`Session::version`] moves.

mod intent;
mod likes;
pub mod sequencer;
mod state;
mod store;

pub use intent::Intent;
pub use likes::LikedTracks;
pub use state::SessionState;
pub use store::Session;
