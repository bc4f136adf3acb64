//! Builds the final track list from the listener's history.
//!
//! Recent tracks are tried first since they reflect what the listener is into
//! right now. If anything on that path fails, the whole attempt is thrown away
//! and the generator starts over from top artists. There is no third option.

use crate::error::{Context, RefindError, Result};
use crate::filter::{artist_index, filter_known_artists};
use crate::models::Track;
use crate::provider::{HistoryProvider, RecommendationProvider};
use crate::seed::Seed;
use log::{info, warn};
use std::fmt;

pub const DEFAULT_TOTAL: u32 = 30;

/// Where the seeds of an attempt come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStrategy {
    RecentTracks,
    TopArtists,
}

impl fmt::Display for SeedStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedStrategy::RecentTracks => f.write_str("recent tracks"),
            SeedStrategy::TopArtists => f.write_str("top artists"),
        }
    }
}

pub struct Generator<H, R> {
    history: H,
    recommender: R,
    total: u32,
}

pub struct GeneratorBuilder<H, R> {
    history: Option<H>,
    recommender: Option<R>,
    total: u32,
}

impl<H, R> Default for GeneratorBuilder<H, R> {
    fn default() -> Self {
        Self {
            history: None,
            recommender: None,
            total: DEFAULT_TOTAL,
        }
    }
}

impl<H, R> GeneratorBuilder<H, R>
where
    H: HistoryProvider,
    R: RecommendationProvider,
{
    pub fn history(mut self, history: H) -> Self {
        self.history = Some(history);
        self
    }

    pub fn recommender(mut self, recommender: R) -> Self {
        self.recommender = Some(recommender);
        self
    }

    /// Number of recommendations to request before filtering.
    pub fn total(mut self, total: u32) -> Self {
        self.total = total;
        self
    }

    pub fn build(self) -> Result<Generator<H, R>> {
        let history = self
            .history
            .ok_or(RefindError::NilProvider("generator history"))?;
        let recommender = self
            .recommender
            .ok_or(RefindError::NilProvider("generator recommender"))?;

        Ok(Generator {
            history,
            recommender,
            total: self.total,
        })
    }
}

impl<H, R> Generator<H, R>
where
    H: HistoryProvider,
    R: RecommendationProvider,
{
    pub fn builder() -> GeneratorBuilder<H, R> {
        GeneratorBuilder::default()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Generates a filtered list of recommended tracks.
    ///
    /// On failure the error comes from the top-artists attempt; the
    /// recent-tracks failure is only logged.
    pub async fn tracklist(&self) -> Result<Vec<Track>> {
        match self.attempt(SeedStrategy::RecentTracks).await {
            Ok(list) => return Ok(list),
            Err(e) => warn!("Falling back to top artists: {}", e),
        }

        self.attempt(SeedStrategy::TopArtists).await
    }

    async fn attempt(&self, strategy: SeedStrategy) -> Result<Vec<Track>> {
        let list = match strategy {
            SeedStrategy::RecentTracks => self.from_recent_tracks().await,
            SeedStrategy::TopArtists => self.from_top_artists().await,
        }
        .with_context(|| format!("cannot generate tracklist from {}", strategy))?;

        info!("Generated {} tracks from {}", list.len(), strategy);
        Ok(list)
    }

    async fn from_recent_tracks(&self) -> Result<Vec<Track>> {
        let tracks = self
            .history
            .recent_tracks()
            .await
            .context("cannot fetch recent tracks")?;

        let seeds = tracks
            .iter()
            .map(Track::seed)
            .collect::<Result<Vec<Seed>>>()
            .context("one or more tracks are invalid seeds")?;

        let recs = self
            .recommender
            .recommendations(self.total, &seeds)
            .await
            .context("cannot fetch recommendations")?;

        let top = self
            .history
            .top_artists()
            .await
            .context("cannot fetch top artists")?;

        Ok(filter_known_artists(recs, &artist_index(&top)))
    }

    async fn from_top_artists(&self) -> Result<Vec<Track>> {
        let top = self
            .history
            .top_artists()
            .await
            .context("cannot fetch top artists")?;

        let seeds = top
            .iter()
            .map(|a| a.seed())
            .collect::<Result<Vec<Seed>>>()
            .context("one or more artists are invalid seeds")?;

        let recs = self
            .recommender
            .recommendations(self.total, &seeds)
            .await
            .context("cannot fetch recommendations")?;

        Ok(filter_known_artists(recs, &artist_index(&top)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::Artist;
    use crate::seed::SeedCategory;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeHistory {
        artists: Vec<Artist>,
        artists_err: Option<&'static str>,
        tracks: Vec<Track>,
        tracks_err: Option<&'static str>,
        artist_calls: AtomicUsize,
    }

    #[async_trait]
    impl HistoryProvider for FakeHistory {
        async fn top_artists(&self) -> Result<Vec<Artist>> {
            self.artist_calls.fetch_add(1, Ordering::SeqCst);
            match self.artists_err {
                Some(msg) => Err(RefindError::Upstream(msg.to_string())),
                None => Ok(self.artists.clone()),
            }
        }

        async fn recent_tracks(&self) -> Result<Vec<Track>> {
            match self.tracks_err {
                Some(msg) => Err(RefindError::Upstream(msg.to_string())),
                None => Ok(self.tracks.clone()),
            }
        }
    }

    #[derive(Default)]
    struct FakeRecommender {
        tracks: Vec<Track>,
        err: bool,
        seen: Mutex<Vec<Vec<Seed>>>,
    }

    #[async_trait]
    impl RecommendationProvider for FakeRecommender {
        async fn recommendations(&self, _total: u32, seeds: &[Seed]) -> Result<Vec<Track>> {
            self.seen.lock().unwrap().push(seeds.to_vec());
            if self.err {
                return Err(RefindError::Upstream("cannot fetch recommendation tracks".to_string()));
            }
            Ok(self.tracks.clone())
        }
    }

    fn top_artists() -> Vec<Artist> {
        vec![Artist::new("0", "foo"), Artist::new("1", "bar")]
    }

    fn recent_tracks() -> Vec<Track> {
        vec![Track::new("10", "baz", Artist::new("0", "foo"))]
    }

    fn generator(history: FakeHistory, rec: FakeRecommender) -> Generator<FakeHistory, FakeRecommender> {
        Generator::builder()
            .history(history)
            .recommender(rec)
            .build()
            .unwrap()
    }

    fn upstream_message(err: &RefindError) -> String {
        match err.root() {
            RefindError::Upstream(msg) => msg.clone(),
            other => panic!("unexpected root error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tracklist_from_recent_tracks() {
        let gen = generator(
            FakeHistory {
                artists: top_artists(),
                tracks: recent_tracks(),
                ..Default::default()
            },
            FakeRecommender {
                tracks: vec![Track::new("21", "qux", Artist::default())],
                ..Default::default()
            },
        );

        let list = gen.tracklist().await.unwrap();
        assert_eq!(list, vec![Track::new("21", "qux", Artist::default())]);

        let seen = gen.recommender.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][0].category, SeedCategory::Track);
        assert_eq!(seen[0][0].id, "10");
    }

    #[tokio::test]
    async fn test_tracklist_filters_top_artists() {
        let gen = generator(
            FakeHistory {
                artists: top_artists(),
                tracks: recent_tracks(),
                ..Default::default()
            },
            FakeRecommender {
                tracks: vec![
                    Track::new("21", "qux", Artist::new("0", "foo")),
                    Track::new("22", "quux", Artist::new("5", "waldo")),
                    Track::new("23", "corge", Artist::new("1", "bar")),
                ],
                ..Default::default()
            },
        );

        let list = gen.tracklist().await.unwrap();
        let ids: Vec<&str> = list.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["22"]);
    }

    #[tokio::test]
    async fn test_recent_tracks_failure_falls_back_to_top_artists() {
        let gen = generator(
            FakeHistory {
                artists: top_artists(),
                tracks_err: Some("cannot fetch tracks"),
                ..Default::default()
            },
            FakeRecommender {
                tracks: vec![Track::new("21", "qux", Artist::new("5", "waldo"))],
                ..Default::default()
            },
        );

        let list = gen.tracklist().await.unwrap();
        assert_eq!(list.len(), 1);

        let seen = gen.recommender.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].iter().all(|s| s.category == SeedCategory::Artist));
        assert_eq!(seen[0][1].name, "bar");
    }

    #[tokio::test]
    async fn test_invalid_track_seed_falls_back() {
        let gen = generator(
            FakeHistory {
                artists: top_artists(),
                tracks: vec![Track::new("", "baz", Artist::new("0", "foo"))],
                ..Default::default()
            },
            FakeRecommender {
                tracks: vec![Track::new("21", "qux", Artist::default())],
                ..Default::default()
            },
        );

        assert!(gen.tracklist().await.is_ok());
        let seen = gen.recommender.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][0].category, SeedCategory::Artist);
    }

    #[tokio::test]
    async fn test_both_paths_fail_returns_second_error() {
        let gen = generator(
            FakeHistory {
                artists_err: Some("cannot fetch artists"),
                tracks_err: Some("cannot fetch tracks"),
                ..Default::default()
            },
            FakeRecommender::default(),
        );

        let err = gen.tracklist().await.unwrap_err();
        assert_eq!(upstream_message(&err), "cannot fetch artists");
        assert!(err.to_string().starts_with("cannot generate tracklist from top artists"));
    }

    #[tokio::test]
    async fn test_top_artists_failure_after_recommendations_discards_attempt() {
        let gen = generator(
            FakeHistory {
                artists_err: Some("cannot fetch artists"),
                tracks: recent_tracks(),
                ..Default::default()
            },
            FakeRecommender::default(),
        );

        let err = gen.tracklist().await.unwrap_err();
        assert_eq!(upstream_message(&err), "cannot fetch artists");
        // Once for the filter step, once more for the fallback seeds.
        assert_eq!(gen.history.artist_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_recommendation_failure_on_both_paths() {
        let gen = generator(
            FakeHistory {
                artists: top_artists(),
                tracks: recent_tracks(),
                ..Default::default()
            },
            FakeRecommender {
                err: true,
                ..Default::default()
            },
        );

        let err = gen.tracklist().await.unwrap_err();
        assert_eq!(upstream_message(&err), "cannot fetch recommendation tracks");
        assert_eq!(gen.recommender.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_artist_fails_fallback() {
        let gen = generator(
            FakeHistory {
                artists: vec![Artist::new("0", "foo"), Artist::new("", "bar")],
                tracks_err: Some("cannot fetch tracks"),
                ..Default::default()
            },
            FakeRecommender::default(),
        );

        let err = gen.tracklist().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSeedId);
    }

    #[test]
    fn test_builder_requires_providers() {
        let err = Generator::<FakeHistory, FakeRecommender>::builder()
            .recommender(FakeRecommender::default())
            .build()
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::NilProvider);

        let err = Generator::<FakeHistory, FakeRecommender>::builder()
            .history(FakeHistory::default())
            .build()
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::NilProvider);
    }

    #[test]
    fn test_builder_total() {
        let gen = Generator::builder()
            .history(FakeHistory::default())
            .recommender(FakeRecommender::default())
            .total(50)
            .build()
            .unwrap();
        assert_eq!(gen.total(), 50);
    }
}
