use crate::models::{Artist, Track};
use std::collections::HashMap;

/// Indexes artists by display name.
///
/// Names rather than ids are the join key: top-artist and recommendation
/// responses do not always agree on artist ids. Two distinct artists sharing a
/// name collapse into one entry.
pub fn artist_index(artists: &[Artist]) -> HashMap<String, Artist> {
    artists
        .iter()
        .map(|a| (a.name.clone(), a.clone()))
        .collect()
}

/// Drops every track whose artist name is a key of `exclude`, keeping order.
pub fn filter_known_artists(tracks: Vec<Track>, exclude: &HashMap<String, Artist>) -> Vec<Track> {
    if tracks.is_empty() || exclude.is_empty() {
        return tracks;
    }

    tracks
        .into_iter()
        .filter(|t| !exclude.contains_key(&t.artist.name))
        .collect()
}
