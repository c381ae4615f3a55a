use std::collections::HashSet;

use crate::catalog::TrackId;

/// Set of liked track ids. Membership is the only meaningful query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikedTracks(HashSet<TrackId>);

impl LikedTracks {
    /// Flip membership of `id`; returns true when the track is now liked.
    pub fn toggle(&mut self, id: TrackId) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_its_own_inverse() {
        let mut liked = LikedTracks::default();
        assert!(liked.toggle(TrackId(3)));
        assert!(liked.contains(TrackId(3)));
        assert!(!liked.toggle(TrackId(3)));
        assert!(!liked.contains(TrackId(3)));
        assert!(liked.is_empty());
    }

    #[test]
    fn toggles_are_independent_per_id() {
        let mut liked = LikedTracks::default();
        liked.toggle(TrackId(1));
        liked.toggle(TrackId(2));
        liked.toggle(TrackId(1));
        assert!(!liked.contains(TrackId(1)));
        assert!(liked.contains(TrackId(2)));
        assert_eq!(liked.len(), 1);
    }
}
