use crate::error::{Context, RefindError, Result};
use crate::models::{is_blank, Playlist, Track};
use crate::provider::PlaylistProvider;
use log::info;

/// Saves a generated track list as a playlist for the current user.
pub struct Publisher<P> {
    provider: P,
}

impl<P: PlaylistProvider> Publisher<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub async fn publish(&self, name: &str, tracks: &[Track]) -> Result<Playlist> {
        if is_blank(name) {
            return Err(RefindError::InvalidId {
                kind: "playlist name",
                value: name.to_string(),
            });
        }
        if tracks.is_empty() {
            return Err(RefindError::MissingTracks);
        }

        let playlist = self
            .provider
            .create_playlist(name, tracks)
            .await
            .with_context(|| format!("cannot create playlist with name: {}", name))?;

        info!(
            "Published playlist {} with {} tracks",
            playlist.uri,
            tracks.len()
        );
        Ok(playlist)
    }
}
