//! Track builders shared by unit tests.

use std::collections::BTreeSet;

use crate::catalog::{Catalog, Track, TrackId};

pub fn track(id: u32, name: &str, author: &str, album: &str) -> Track {
    Track {
        id: TrackId(id),
        name: name.into(),
        author: author.into(),
        album: album.into(),
        duration_secs: 180,
        file_ref: format!("/music/{id}.mp3"),
        release_date: None,
        genres: BTreeSet::new(),
    }
}

pub fn dated(mut t: Track, date: &str, genres: &[&str]) -> Track {
    t.release_date = Some(date.into());
    t.genres = genres.iter().map(|g| g.to_string()).collect();
    t
}

/// `n` tracks with ids `1..=n`.
pub fn catalog_of(n: u32) -> Catalog {
    let tracks = (1..=n)
        .map(|i| track(i, &format!("Song {i}"), &format!("Artist {i}"), "Album"))
        .collect();
    Catalog::new(tracks).unwrap()
}
