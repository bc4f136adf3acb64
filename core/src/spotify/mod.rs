//! Spotify-backed implementations of the provider traits.

mod parse;

pub use parse::{
    parse_artist, parse_full_artist, parse_full_track, parse_playlist, parse_simplified_track,
};

use crate::config::Settings;
use crate::error::{Context, RefindError, Result};
use crate::models::{Artist, Playlist, Track};
use crate::provider::{BatchRecommender, HistoryProvider, PlaylistProvider};
use crate::seed::SeedBatch;
use async_trait::async_trait;
use log::debug;
use rspotify::{
    model::{
        ArtistId, Market, PlayableId, RecommendationsAttribute, TimeRange, TrackId,
    },
    prelude::*,
    AuthCodeSpotify,
};
use std::future::Future;

/// Spotify caps playlist additions at 100 items per request.
const PLAYLIST_CHUNK: usize = 100;

const TIME_RANGES: [TimeRange; 3] = [
    TimeRange::ShortTerm,
    TimeRange::MediumTerm,
    TimeRange::LongTerm,
];

pub struct SpotifyService {
    client: AuthCodeSpotify,
    settings: Settings,
}

impl SpotifyService {
    pub fn new(client: AuthCodeSpotify, settings: Settings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    async fn top_artists_in(&self, range: TimeRange) -> Result<Vec<Artist>> {
        let page = self
            .client
            .current_user_top_artists_manual(Some(range), Some(self.settings.fetch_limit), None)
            .await
            .context("cannot fetch top artists")?;

        debug!("Fetched {} top artists for {:?}", page.items.len(), range);
        Ok(page.items.iter().map(parse_full_artist).collect())
    }
}

/// Runs `fetch` once per time range, short to long term, and concatenates
/// the results. The first failing range fails the whole call.
async fn collect_time_ranges<F, Fut>(mut fetch: F) -> Result<Vec<Artist>>
where
    F: FnMut(TimeRange) -> Fut,
    Fut: Future<Output = Result<Vec<Artist>>>,
{
    let mut top = Vec::new();
    for range in TIME_RANGES {
        top.extend(fetch(range).await?);
    }
    Ok(top)
}

fn non_empty<T>(items: Vec<T>, what: &'static str) -> Result<Vec<T>> {
    if items.is_empty() {
        return Err(RefindError::InvalidUpstreamData(what));
    }
    Ok(items)
}

fn artist_ids(batch: &SeedBatch) -> Result<Vec<ArtistId<'_>>> {
    batch
        .artists
        .iter()
        .map(|id| {
            ArtistId::from_id(id.as_str()).map_err(|_| RefindError::InvalidId {
                kind: "artist id",
                value: id.clone(),
            })
        })
        .collect()
}

fn track_ids(batch: &SeedBatch) -> Result<Vec<TrackId<'_>>> {
    batch
        .tracks
        .iter()
        .map(|id| {
            TrackId::from_id(id.as_str()).map_err(|_| RefindError::InvalidId {
                kind: "track id",
                value: id.clone(),
            })
        })
        .collect()
}

fn playable_ids(tracks: &[Track]) -> Result<Vec<PlayableId<'static>>> {
    tracks
        .iter()
        .map(|t| {
            TrackId::from_id(t.id.clone())
                .map(PlayableId::Track)
                .map_err(|_| RefindError::InvalidId {
                    kind: "track id",
                    value: t.id.clone(),
                })
        })
        .collect()
}

fn playlist_chunks<T>(items: &[T]) -> std::slice::Chunks<'_, T> {
    items.chunks(PLAYLIST_CHUNK)
}

#[async_trait]
impl HistoryProvider for SpotifyService {
    /// Short, medium and long term top artists, concatenated in that order.
    /// Artists appearing in several ranges are repeated.
    async fn top_artists(&self) -> Result<Vec<Artist>> {
        collect_time_ranges(|range| self.top_artists_in(range)).await
    }

    async fn recent_tracks(&self) -> Result<Vec<Track>> {
        let page = self
            .client
            .current_user_recently_played(Some(self.settings.fetch_limit), None)
            .await
            .context("cannot fetch recently played tracks")?;

        let items = non_empty(page.items, "recently played tracks")?;
        Ok(items
            .iter()
            .map(|item| parse_full_track(&item.track))
            .collect())
    }
}

#[async_trait]
impl BatchRecommender for SpotifyService {
    async fn recommend_batch(&self, batch: &SeedBatch, limit: u32) -> Result<Vec<Track>> {
        let artists = artist_ids(batch)?;
        let tracks = track_ids(batch)?;
        let genres: Vec<&str> = batch.genres.iter().map(String::as_str).collect();

        let attributes = [
            RecommendationsAttribute::TargetPopularity(self.settings.target_popularity),
            RecommendationsAttribute::MaxPopularity(self.settings.max_popularity),
        ];

        let recs = self
            .client
            .recommendations(
                attributes,
                (!artists.is_empty()).then_some(artists),
                (!genres.is_empty()).then_some(genres),
                (!tracks.is_empty()).then_some(tracks),
                Some(Market::FromToken),
                Some(limit),
            )
            .await
            .context("cannot fetch recommendations")?;

        Ok(recs.tracks.iter().map(parse_simplified_track).collect())
    }
}

#[async_trait]
impl PlaylistProvider for SpotifyService {
    async fn create_playlist(&self, name: &str, tracks: &[Track]) -> Result<Playlist> {
        // Validate ids before anything is created upstream.
        let items = playable_ids(tracks)?;

        let user = self.client.current_user().await.context("cannot fetch user")?;

        let playlist = self
            .client
            .user_playlist_create(
                user.id,
                name,
                Some(self.settings.public_playlist),
                Some(false),
                Some(self.settings.playlist_description.as_str()),
            )
            .await
            .context("cannot create playlist")?;

        for (i, chunk) in playlist_chunks(&items).enumerate() {
            debug!("Adding chunk {} ({} tracks) to playlist", i, chunk.len());
            self.client
                .playlist_add_items(playlist.id.clone(), chunk.to_vec(), None)
                .await
                .context("cannot add tracks to playlist")?;
        }

        Ok(parse_playlist(&playlist))
    }
}
