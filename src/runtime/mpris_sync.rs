use crate::app::PlaybackState;
use crate::mpris::MprisHandle;
use crate::session::SessionState;
use crate::transport::{MediaElement, TransportBridge};

pub fn update_mpris<M: MediaElement>(
    mpris: &MprisHandle,
    state: &SessionState,
    bridge: &TransportBridge<M>,
) {
    let track = state.current_track.as_ref();
    let length = match track {
        Some(_) if state.duration > 0.0 => state.duration,
        Some(t) => bridge.known_duration(t),
        None => 0.0,
    };
    mpris.set_track_metadata(track, length);
    mpris.set_playback(PlaybackState::of(state));
}
