use crate::models::{Artist, Playlist, Track};
use rspotify::model::{FullArtist, FullPlaylist, FullTrack, SimplifiedArtist, SimplifiedTrack};
use rspotify::prelude::*;

pub fn parse_artist(artist: &SimplifiedArtist) -> Artist {
    Artist {
        id: artist
            .id
            .as_ref()
            .map(|id| id.id().to_string())
            .unwrap_or_default(),
        name: artist.name.clone(),
    }
}

pub fn parse_full_artist(artist: &FullArtist) -> Artist {
    Artist {
        id: artist.id.id().to_string(),
        name: artist.name.clone(),
    }
}

// Only the first credited artist is kept; local files may have none.
fn first_artist(artists: &[SimplifiedArtist]) -> Artist {
    artists.first().map(parse_artist).unwrap_or_default()
}

pub fn parse_simplified_track(track: &SimplifiedTrack) -> Track {
    Track {
        id: track
            .id
            .as_ref()
            .map(|id| id.id().to_string())
            .unwrap_or_default(),
        name: track.name.clone(),
        artist: first_artist(&track.artists),
    }
}

pub fn parse_full_track(track: &FullTrack) -> Track {
    Track {
        id: track
            .id
            .as_ref()
            .map(|id| id.id().to_string())
            .unwrap_or_default(),
        name: track.name.clone(),
        artist: first_artist(&track.artists),
    }
}

pub fn parse_playlist(playlist: &FullPlaylist) -> Playlist {
    Playlist {
        id: playlist.id.id().to_string(),
        uri: playlist.id.uri(),
    }
}
