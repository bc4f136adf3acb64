use crate::error::{Context, RefindError, Result};
use crate::models::Track;
use crate::provider::{BatchRecommender, RecommendationProvider};
use crate::seed::{batch_seeds, Seed, SeedBatch, MAX_SEEDS};
use async_trait::async_trait;
use futures::future::try_join_all;
use log::{debug, info};

/// Fans a seed list out over as many platform requests as the seed ceiling
/// requires and concatenates the answers in batch order.
pub struct Aggregator<B> {
    recommender: B,
    seed_limit: usize,
    concurrent: bool,
}

impl<B: BatchRecommender> Aggregator<B> {
    pub fn new(recommender: B) -> Self {
        Self {
            recommender,
            seed_limit: MAX_SEEDS,
            concurrent: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_seed_limit(mut self, seed_limit: usize) -> Self {
        self.seed_limit = seed_limit;
        self
    }

    /// Issue every batch request at once instead of one after another.
    ///
    /// Output order is unchanged. The first failing batch aborts the rest.
    pub fn concurrent(mut self, enabled: bool) -> Self {
        self.concurrent = enabled;
        self
    }

    async fn fetch_batch(&self, index: usize, batch: &SeedBatch, limit: u32) -> Result<Vec<Track>> {
        debug!(
            "Requesting {} recommendations for batch {} ({} seeds)",
            limit,
            index,
            batch.len()
        );

        let tracks = self
            .recommender
            .recommend_batch(batch, limit)
            .await
            .with_context(|| format!("cannot fetch recommendations for seed batch {}", index))?;

        if tracks.is_empty() {
            return Err(RefindError::InvalidUpstreamData("recommendations")
                .context(format!("seed batch {} returned no tracks", index)));
        }

        Ok(tracks)
    }
}

/// Splits `total` evenly over `batches`, dropping the remainder.
fn per_batch_limit(total: u32, batches: usize) -> Result<u32> {
    let count = u32::try_from(batches).map_err(|_| RefindError::InvalidRange {
        name: "seed batch count",
        value: i64::try_from(batches).unwrap_or(i64::MAX),
    })?;

    let per_batch = total.checked_div(count).ok_or(RefindError::MissingSeeds)?;
    if per_batch == 0 {
        debug!(
            "Total {} is smaller than the {} seed batches, requesting 0 tracks per batch",
            total, count
        );
    }
    Ok(per_batch)
}

#[async_trait]
impl<B: BatchRecommender> RecommendationProvider for Aggregator<B> {
    async fn recommendations(&self, total: u32, seeds: &[Seed]) -> Result<Vec<Track>> {
        if seeds.is_empty() {
            return Err(RefindError::MissingSeeds);
        }
        if total == 0 {
            return Err(RefindError::InvalidRange {
                name: "total",
                value: 0,
            });
        }

        let batches = batch_seeds(seeds, self.seed_limit)?;
        let per_batch = per_batch_limit(total, batches.len())?;

        let results = if self.concurrent {
            try_join_all(
                batches
                    .iter()
                    .enumerate()
                    .map(|(i, batch)| self.fetch_batch(i, batch, per_batch)),
            )
            .await?
        } else {
            let mut results = Vec::with_capacity(batches.len());
            for (i, batch) in batches.iter().enumerate() {
                results.push(self.fetch_batch(i, batch, per_batch).await?);
            }
            results
        };

        let list: Vec<Track> = results.into_iter().flatten().collect();
        info!(
            "Collected {} recommendations from {} seed batches",
            list.len(),
            batches.len()
        );

        Ok(list)
    }
}
