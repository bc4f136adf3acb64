//! Runtime settings read from `REFIND_*` environment variables.
//!
//! Spotify credentials are not handled here; `rspotify` reads the
//! `RSPOTIFY_*` variables itself (see [`crate::auth`]).

use crate::generator::DEFAULT_TOTAL;
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Recommendations requested per run, before filtering.
    pub total: u32,
    /// 0-100 popularity scores, signed to match the Spotify attribute type.
    pub target_popularity: i32,
    pub max_popularity: i32,
    /// Page size for top-artist and recently-played requests.
    pub fetch_limit: u32,
    pub public_playlist: bool,
    pub playlist_description: String,
    pub concurrent_batches: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total: DEFAULT_TOTAL,
            target_popularity: 40,
            max_popularity: 50,
            fetch_limit: 50,
            public_playlist: true,
            playlist_description: "Generated by refind from your listening history".to_string(),
            concurrent_batches: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Unset keys keep their
    /// defaults; set but malformed keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let settings = Self {
            total: parse_var(&lookup, "REFIND_TOTAL", defaults.total)?,
            target_popularity: parse_var(
                &lookup,
                "REFIND_TARGET_POPULARITY",
                defaults.target_popularity,
            )?,
            max_popularity: parse_var(&lookup, "REFIND_MAX_POPULARITY", defaults.max_popularity)?,
            fetch_limit: parse_var(&lookup, "REFIND_FETCH_LIMIT", defaults.fetch_limit)?,
            public_playlist: parse_var(
                &lookup,
                "REFIND_PUBLIC_PLAYLIST",
                defaults.public_playlist,
            )?,
            playlist_description: lookup("REFIND_PLAYLIST_DESCRIPTION")
                .unwrap_or(defaults.playlist_description),
            concurrent_batches: parse_var(
                &lookup,
                "REFIND_CONCURRENT_BATCHES",
                defaults.concurrent_batches,
            )?,
        };

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.total == 0 {
            return Err(ConfigError::InvalidValue {
                var: "REFIND_TOTAL",
                value: self.total.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(0..=100).contains(&self.max_popularity) {
            return Err(ConfigError::InvalidValue {
                var: "REFIND_MAX_POPULARITY",
                value: self.max_popularity.to_string(),
                reason: "popularity is a 0-100 score".to_string(),
            });
        }
        if self.target_popularity < 0 {
            return Err(ConfigError::InvalidValue {
                var: "REFIND_TARGET_POPULARITY",
                value: self.target_popularity.to_string(),
                reason: "popularity is a 0-100 score".to_string(),
            });
        }
        if self.target_popularity > self.max_popularity {
            return Err(ConfigError::InvalidValue {
                var: "REFIND_TARGET_POPULARITY",
                value: self.target_popularity.to_string(),
                reason: format!("exceeds max popularity {}", self.max_popularity),
            });
        }
        if self.fetch_limit == 0 || self.fetch_limit > 50 {
            return Err(ConfigError::InvalidValue {
                var: "REFIND_FETCH_LIMIT",
                value: self.fetch_limit.to_string(),
                reason: "Spotify pages hold between 1 and 50 items".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                var,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.total, 30);
        assert_eq!(settings.target_popularity, 40);
        assert_eq!(settings.max_popularity, 50);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("REFIND_TOTAL", "60"),
            ("REFIND_PUBLIC_PLAYLIST", "false"),
            ("REFIND_CONCURRENT_BATCHES", " true "),
            ("REFIND_PLAYLIST_DESCRIPTION", "weekly dig"),
        ]))
        .unwrap();

        assert_eq!(settings.total, 60);
        assert!(!settings.public_playlist);
        assert!(settings.concurrent_batches);
        assert_eq!(settings.playlist_description, "weekly dig");
    }

    #[test]
    fn test_malformed_value_names_variable() {
        let err = Settings::from_lookup(lookup(&[("REFIND_TOTAL", "lots")])).unwrap_err();
        assert!(err.to_string().contains("REFIND_TOTAL"));
    }

    #[test]
    fn test_validation() {
        assert!(Settings::from_lookup(lookup(&[("REFIND_TOTAL", "0")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("REFIND_FETCH_LIMIT", "51")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("REFIND_TARGET_POPULARITY", "70")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("REFIND_MAX_POPULARITY", "101")])).is_err());
    }

    #[test]
    fn test_negative_popularity_rejected() {
        let err = Settings::from_lookup(lookup(&[("REFIND_TARGET_POPULARITY", "-5")])).unwrap_err();
        assert!(err.to_string().contains("REFIND_TARGET_POPULARITY"));

        let err = Settings::from_lookup(lookup(&[
            ("REFIND_TARGET_POPULARITY", "-10"),
            ("REFIND_MAX_POPULARITY", "-1"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("REFIND_MAX_POPULARITY"));
    }
}
