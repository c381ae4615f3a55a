use crate::catalog::Track;

/// Normalize a raw search string: surrounding whitespace trimmed, lowercased.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Return true if `track` matches an already normalized query.
///
/// An empty query matches everything.
pub fn matches_query(track: &Track, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [&track.name, &track.author, &track.album]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Case-insensitive substring search over name, author and album.
pub fn search(tracks: &[Track], query: &str) -> Vec<Track> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return tracks.to_vec();
    }
    tracks
        .iter()
        .filter(|t| matches_query(t, &needle))
        .cloned()
        .collect()
}
