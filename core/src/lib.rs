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

pub mod auth;
pub mod buffer;
pub mod config;
pub mod error;
pub mod filter;
pub mod generator;
pub mod models;
pub mod provider;
pub mod publish;
pub mod recommend;
pub mod seed;
pub mod spotify;

// Re-export key items for convenience
pub use auth::get_spotify_client;
pub use buffer::Buffer;
pub use config::Settings;
pub use error::{ErrorKind, RefindError};
pub use filter::{artist_index, filter_known_artists};
pub use generator::Generator;
pub use models::{Artist, Playlist, Track, TracklistReport};
pub use provider::{BatchRecommender, HistoryProvider, PlaylistProvider, RecommendationProvider};
pub use publish::Publisher;
pub use recommend::Aggregator;
pub use seed::{batch_seeds, Seed, SeedBatch, SeedCategory};
pub use spotify::SpotifyService;
