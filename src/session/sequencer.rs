//! Next/previous track resolution over a playlist.
//!
//! Sequential navigation never wraps. Shuffle draws without replacement: a
//! round surfaces every playlist track once before any repeats.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::catalog::{Track, TrackId};

fn position(playlist: &[Track], id: TrackId) -> Option<usize> {
    playlist.iter().position(|t| t.id == id)
}

/// The track after `current` in playlist order. `None` at the end or when
/// `current` is not in the playlist.
pub fn next_in_order(playlist: &[Track], current: TrackId) -> Option<&Track> {
    let pos = position(playlist, current)?;
    playlist.get(pos + 1)
}

/// The track before `current` in playlist order. Shuffle does not apply here.
pub fn prev_in_order(playlist: &[Track], current: TrackId) -> Option<&Track> {
    let pos = position(playlist, current)?;
    pos.checked_sub(1).map(|p| &playlist[p])
}

/// Pick a random track not yet surfaced this round.
///
/// When every other track has been played the round restarts: `played` is
/// reset to the current track and the pick is drawn from everything else.
pub fn next_shuffled<'a>(
    playlist: &'a [Track],
    current: TrackId,
    played: &mut HashSet<TrackId>,
    rng: &mut StdRng,
) -> Option<&'a Track> {
    let unplayed: Vec<&Track> = playlist
        .iter()
        .filter(|t| t.id != current && !played.contains(&t.id))
        .collect();

    if let Some(pick) = unplayed.choose(rng) {
        return Some(*pick);
    }

    played.clear();
    if position(playlist, current).is_some() {
        played.insert(current);
    }

    let others: Vec<&Track> = playlist.iter().filter(|t| t.id != current).collect();
    others.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::catalog_of;
    use rand::SeedableRng;

    #[test]
    fn next_in_order_stops_at_the_end() {
        let catalog = catalog_of(3);
        let list = catalog.tracks();
        assert_eq!(next_in_order(list, TrackId(1)).map(|t| t.id), Some(TrackId(2)));
        assert_eq!(next_in_order(list, TrackId(2)).map(|t| t.id), Some(TrackId(3)));
        assert!(next_in_order(list, TrackId(3)).is_none());
        assert!(next_in_order(list, TrackId(42)).is_none());
    }

    #[test]
    fn prev_in_order_stops_at_the_start() {
        let catalog = catalog_of(3);
        let list = catalog.tracks();
        assert!(prev_in_order(list, TrackId(1)).is_none());
        assert_eq!(prev_in_order(list, TrackId(3)).map(|t| t.id), Some(TrackId(2)));
        assert!(prev_in_order(list, TrackId(42)).is_none());
    }

    #[test]
    fn shuffled_pick_skips_played_and_current() {
        let catalog = catalog_of(4);
        let mut rng = StdRng::seed_from_u64(1);
        let mut played: HashSet<TrackId> = [TrackId(1), TrackId(2)].into_iter().collect();

        for _ in 0..20 {
            let pick = next_shuffled(catalog.tracks(), TrackId(3), &mut played, &mut rng).unwrap();
            assert_eq!(pick.id, TrackId(4));
        }
    }

    #[test]
    fn exhausted_round_resets_to_current() {
        let catalog = catalog_of(3);
        let mut rng = StdRng::seed_from_u64(9);
        let mut played: HashSet<TrackId> = [TrackId(1), TrackId(2)].into_iter().collect();

        let pick = next_shuffled(catalog.tracks(), TrackId(3), &mut played, &mut rng).unwrap();
        assert_ne!(pick.id, TrackId(3));
        assert_eq!(played, [TrackId(3)].into_iter().collect());
    }

    #[test]
    fn single_track_playlist_has_no_shuffled_next() {
        let catalog = catalog_of(1);
        let mut rng = StdRng::seed_from_u64(0);
        let mut played = HashSet::new();
        assert!(next_shuffled(catalog.tracks(), TrackId(1), &mut played, &mut rng).is_none());
    }
}
