//! Search and filter engine.
//!
//! Both stages are pure: `filter` narrows the catalog by author/year/genre,
//! `query` keeps tracks whose name, author or album contain the search text.
//! The session composes them to derive the playlist.

mod filter;
mod query;

pub use filter::*;
pub use query::*;

use crate::catalog::Track;

/// Derive a playlist: filters first, then the search query. Catalog order is kept.
pub fn derive_playlist(tracks: &[Track], filters: &ActiveFilters, query: &str) -> Vec<Track> {
    if filters.is_empty() {
        return search(tracks, query);
    }
    search(&apply_filters(tracks, filters), query)
}
