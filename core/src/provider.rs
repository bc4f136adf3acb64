//! Capabilities the pipeline consumes from the streaming platform.

use crate::error::Result;
use crate::models::{Artist, Playlist, Track};
use crate::seed::{Seed, SeedBatch};
use async_trait::async_trait;
use std::sync::Arc;

/// The listener's own history.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn top_artists(&self) -> Result<Vec<Artist>>;
    async fn recent_tracks(&self) -> Result<Vec<Track>>;
}

/// Turns an arbitrary list of seeds into roughly `total` recommended tracks.
#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    async fn recommendations(&self, total: u32, seeds: &[Seed]) -> Result<Vec<Track>>;
}

/// A single platform recommendation request for one legal-sized batch.
#[async_trait]
pub trait BatchRecommender: Send + Sync {
    async fn recommend_batch(&self, batch: &SeedBatch, limit: u32) -> Result<Vec<Track>>;
}

#[async_trait]
pub trait PlaylistProvider: Send + Sync {
    async fn create_playlist(&self, name: &str, tracks: &[Track]) -> Result<Playlist>;
}

#[async_trait]
impl<T: HistoryProvider + ?Sized> HistoryProvider for Arc<T> {
    async fn top_artists(&self) -> Result<Vec<Artist>> {
        (**self).top_artists().await
    }

    async fn recent_tracks(&self) -> Result<Vec<Track>> {
        (**self).recent_tracks().await
    }
}

#[async_trait]
impl<T: RecommendationProvider + ?Sized> RecommendationProvider for Arc<T> {
    async fn recommendations(&self, total: u32, seeds: &[Seed]) -> Result<Vec<Track>> {
        (**self).recommendations(total, seeds).await
    }
}

#[async_trait]
impl<T: BatchRecommender + ?Sized> BatchRecommender for Arc<T> {
    async fn recommend_batch(&self, batch: &SeedBatch, limit: u32) -> Result<Vec<Track>> {
        (**self).recommend_batch(batch, limit).await
    }
}

#[async_trait]
impl<T: PlaylistProvider + ?Sized> PlaylistProvider for Arc<T> {
    async fn create_playlist(&self, name: &str, tracks: &[Track]) -> Result<Playlist> {
        (**self).create_playlist(name, tracks).await
    }
}
