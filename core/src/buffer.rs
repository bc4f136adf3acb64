use crate::error::{RefindError, Result};
use crate::models::{Artist, Track};
use crate::provider::HistoryProvider;
use async_trait::async_trait;
use log::debug;
use tokio::sync::Mutex;

/// Remembers the first non-empty history fetch for as long as it lives.
///
/// One generation run may ask for top artists twice (filter step, then
/// fallback seeds). Wrapping the provider in a fresh `Buffer` per run turns
/// the second ask into a memory read.
pub struct Buffer<H> {
    inner: H,
    artists: Mutex<Option<Vec<Artist>>>,
    tracks: Mutex<Option<Vec<Track>>>,
}

impl<H: HistoryProvider> Buffer<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            artists: Mutex::new(None),
            tracks: Mutex::new(None),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: HistoryProvider> TryFrom<Option<H>> for Buffer<H> {
    type Error = RefindError;

    fn try_from(inner: Option<H>) -> Result<Self> {
        inner
            .map(Buffer::new)
            .ok_or(RefindError::NilProvider("buffer"))
    }
}

#[async_trait]
impl<H: HistoryProvider> HistoryProvider for Buffer<H> {
    async fn top_artists(&self) -> Result<Vec<Artist>> {
        // Held across the fetch so concurrent callers share one upstream call.
        let mut cached = self.artists.lock().await;
        if let Some(artists) = cached.as_ref() {
            debug!("Serving {} top artists from buffer", artists.len());
            return Ok(artists.clone());
        }

        let artists = self.inner.top_artists().await?;
        if !artists.is_empty() {
            *cached = Some(artists.clone());
        }
        Ok(artists)
    }

    async fn recent_tracks(&self) -> Result<Vec<Track>> {
        let mut cached = self.tracks.lock().await;
        if let Some(tracks) = cached.as_ref() {
            debug!("Serving {} recent tracks from buffer", tracks.len());
            return Ok(tracks.clone());
        }

        let tracks = self.inner.recent_tracks().await?;
        if !tracks.is_empty() {
            *cached = Some(tracks.clone());
        }
        Ok(tracks)
    }
}
