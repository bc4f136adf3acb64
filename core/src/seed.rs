//! Recommendation seeds and their conversion into request-sized batches.

use crate::error::{RefindError, Result};
use crate::models::is_blank;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of seeds Spotify accepts in a single recommendation request.
pub const MAX_SEEDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedCategory {
    Track,
    Artist,
    Genre,
}

impl fmt::Display for SeedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeedCategory::Track => "track",
            SeedCategory::Artist => "artist",
            SeedCategory::Genre => "genre",
        };
        f.write_str(name)
    }
}

impl FromStr for SeedCategory {
    type Err = RefindError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "track" => Ok(SeedCategory::Track),
            "artist" => Ok(SeedCategory::Artist),
            "genre" => Ok(SeedCategory::Genre),
            _ => Err(RefindError::UnknownSeedCategory(s.to_string())),
        }
    }
}

/// A typed reference used to ask the platform for recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    pub category: SeedCategory,
    pub id: String,
    pub name: String,
}

impl Seed {
    pub fn genre(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if is_blank(&name) {
            return Err(RefindError::InvalidSeedId("genre name"));
        }

        Ok(Self {
            category: SeedCategory::Genre,
            id: String::new(),
            name,
        })
    }

    /// The value placed in the request: the id for tracks and artists, the
    /// name for genres (falling back to the id when no name was given).
    pub fn key(&self) -> &str {
        match self.category {
            SeedCategory::Track | SeedCategory::Artist => &self.id,
            SeedCategory::Genre if is_blank(&self.name) => &self.id,
            SeedCategory::Genre => &self.name,
        }
    }
}

/// Parses `category:value`, e.g. `artist:4NHQUGzhtTLFvgF5SZesLK` or `genre:ambient`.
impl FromStr for Seed {
    type Err = RefindError;

    fn from_str(s: &str) -> Result<Self> {
        let (category, value) = s
            .split_once(':')
            .ok_or_else(|| RefindError::UnknownSeedCategory(s.to_string()))?;

        let category = category.parse::<SeedCategory>()?;
        let value = value.trim();
        if value.is_empty() {
            return Err(RefindError::InvalidSeedId("seed value"));
        }

        Ok(match category {
            SeedCategory::Genre => Seed {
                category,
                id: String::new(),
                name: value.to_string(),
            },
            SeedCategory::Track | SeedCategory::Artist => Seed {
                category,
                id: value.to_string(),
                name: String::new(),
            },
        })
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.key())
    }
}

/// Seeds for one recommendation request, grouped by the request field they fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedBatch {
    pub tracks: Vec<String>,
    pub artists: Vec<String>,
    pub genres: Vec<String>,
}

impl SeedBatch {
    pub fn len(&self) -> usize {
        self.tracks.len() + self.artists.len() + self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, seed: &Seed) -> Result<()> {
        let key = seed.key();
        if is_blank(key) {
            return Err(RefindError::InvalidSeedId("seed id"));
        }

        let field = match seed.category {
            SeedCategory::Track => &mut self.tracks,
            SeedCategory::Artist => &mut self.artists,
            SeedCategory::Genre => &mut self.genres,
        };
        field.push(key.to_string());
        Ok(())
    }
}

/// Splits `seeds` into consecutive batches of at most `limit` seeds.
///
/// Any malformed seed fails the whole call; no partial batch list is
/// returned. An empty input yields an empty list.
pub fn batch_seeds(seeds: &[Seed], limit: usize) -> Result<Vec<SeedBatch>> {
    if limit == 0 {
        return Err(RefindError::InvalidRange {
            name: "seed batch limit",
            value: 0,
        });
    }

    seeds
        .chunks(limit)
        .enumerate()
        .map(|(index, chunk)| -> Result<SeedBatch> {
            let mut batch = SeedBatch::default();
            for seed in chunk {
                batch.push(seed).map_err(|e| {
                    e.context(format!("one or more seeds in batch {} cannot be parsed", index))
                })?;
            }
            Ok(batch)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn track_seed(id: &str) -> Seed {
        Seed {
            category: SeedCategory::Track,
            id: id.to_string(),
            name: String::new(),
        }
    }

    #[test]
    fn test_batches_preserve_order_and_respect_limit() {
        let seeds: Vec<Seed> = (0..12).map(|i| track_seed(&i.to_string())).collect();

        for limit in 1..=7 {
            let batches = batch_seeds(&seeds, limit).unwrap();
            assert!(batches.iter().all(|b| b.len() <= limit && !b.is_empty()));

            let flattened: Vec<String> = batches.into_iter().flat_map(|b| b.tracks).collect();
            let expected: Vec<String> = seeds.iter().map(|s| s.id.clone()).collect();
            assert_eq!(flattened, expected);
        }
    }

    #[test]
    fn test_batch_routes_categories_to_fields() {
        let seeds = vec![
            Seed {
                category: SeedCategory::Artist,
                id: "4NHQUGzhtTLFvgF5SZesLK".to_string(),
                name: String::new(),
            },
            track_seed("0c6xIDDpzE81m2q797ordA"),
            Seed::genre("classical").unwrap(),
            Seed {
                category: SeedCategory::Genre,
                id: "country".to_string(),
                name: String::new(),
            },
        ];

        let batches = batch_seeds(&seeds, MAX_SEEDS).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].artists, vec!["4NHQUGzhtTLFvgF5SZesLK"]);
        assert_eq!(batches[0].tracks, vec!["0c6xIDDpzE81m2q797ordA"]);
        assert_eq!(batches[0].genres, vec!["classical", "country"]);
    }

    #[test]
    fn test_batch_rejects_blank_id_anywhere() {
        for position in 0..11 {
            let mut seeds: Vec<Seed> = (0..11).map(|i| track_seed(&i.to_string())).collect();
            seeds[position].id = "  ".to_string();

            let err = batch_seeds(&seeds, MAX_SEEDS).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidSeedId);
        }
    }

    #[test]
    fn test_batch_empty_input() {
        assert!(batch_seeds(&[], MAX_SEEDS).unwrap().is_empty());
    }

    #[test]
    fn test_batch_zero_limit() {
        let err = batch_seeds(&[track_seed("1")], 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }

    #[test]
    fn test_seed_from_str() {
        let seed: Seed = "artist:4NHQUGzhtTLFvgF5SZesLK".parse().unwrap();
        assert_eq!(seed.category, SeedCategory::Artist);
        assert_eq!(seed.key(), "4NHQUGzhtTLFvgF5SZesLK");

        let seed: Seed = "Genre:ambient".parse().unwrap();
        assert_eq!(seed.category, SeedCategory::Genre);
        assert_eq!(seed.key(), "ambient");
        assert_eq!(seed.to_string(), "genre:ambient");
    }

    #[test]
    fn test_seed_from_str_errors() {
        let err = "album:123".parse::<Seed>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownSeedCategory);

        let err = "no-separator".parse::<Seed>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownSeedCategory);

        let err = "track:   ".parse::<Seed>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSeedId);
    }
}
