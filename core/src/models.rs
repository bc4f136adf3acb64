/*
    refind | Rust CLI tool to discover new music from your listening history.
    Copyright (C) 2025  Israel Alberto Roldan Vega

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::error::{RefindError, Result};
use crate::seed::{Seed, SeedCategory};
use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// An artist as reported by the streaming platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

impl Artist {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Builds an artist seed. Both the id and the name must be present.
    pub fn seed(&self) -> Result<Seed> {
        if is_blank(&self.id) {
            return Err(RefindError::InvalidSeedId("artist id"));
        }
        if is_blank(&self.name) {
            return Err(RefindError::InvalidSeedId("artist name"));
        }

        Ok(Seed {
            category: SeedCategory::Artist,
            id: self.id.clone(),
            name: self.name.clone(),
        })
    }
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.id)
    }
}

/// A track together with its first credited artist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist: Artist,
}

impl Track {
    pub fn new(id: impl Into<String>, name: impl Into<String>, artist: Artist) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            artist,
        }
    }

    pub fn seed(&self) -> Result<Seed> {
        if is_blank(&self.id) {
            return Err(RefindError::InvalidSeedId("track id"));
        }

        Ok(Seed {
            category: SeedCategory::Track,
            id: self.id.clone(),
            name: self.name.clone(),
        })
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} - {}", self.id, self.name, self.artist.name)
    }
}

/// A published playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub uri: String,
}

/// Report written by `refind generate --json`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TracklistReport {
    pub total_requested: u32,
    pub tracks: Vec<Track>,
    pub playlist: Option<Playlist>,
}
