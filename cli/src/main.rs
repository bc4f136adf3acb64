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

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::debug;
use refind_core::{
    get_spotify_client, Aggregator, Buffer, Generator, HistoryProvider, Publisher,
    RecommendationProvider, Seed, Settings, SpotifyService, Track, TracklistReport,
};
use std::fs::File;
use std::io::Write;
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "refind")]
#[command(about = "Discover new music based on what you already listen to", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates a track list from your recent listening, falling back to your top artists.
    Generate {
        /// Publish the result as a new playlist with this name
        #[arg(long, short = 'n')]
        name: Option<String>,
        /// Number of recommendations to request (before filtering)
        #[arg(long, short = 't')]
        total: Option<u32>,
        /// Output the report to a JSON file (e.g., --json=tracklist.json)
        #[arg(long)]
        json: Option<String>,
        /// Send all seed batches at once
        #[arg(long)]
        concurrent: bool,
    },
    /// Fetches raw recommendations for explicit seeds, without filtering
    Recommend {
        /// Seed as CATEGORY:VALUE, e.g. artist:4NHQUGzhtTLFvgF5SZesLK or genre:ambient
        #[arg(long = "seed", short = 's', required = true, value_name = "SEED")]
        seeds: Vec<String>,
        /// Number of recommendations to request
        #[arg(long, short = 't')]
        total: Option<u32>,
        /// Output the tracks to a JSON file
        #[arg(long)]
        json: Option<String>,
    },
    /// Shows your top artists and recently played tracks
    History,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if dotenv().is_err() {
        // Silently ignore
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            name,
            total,
            json,
            concurrent,
        } => handle_generate(name.as_deref(), total, json.as_deref(), concurrent).await,
        Commands::Recommend { seeds, total, json } => {
            handle_recommend(&seeds, total, json.as_deref()).await
        }
        Commands::History => handle_history().await,
    };

    if let Err(e) = result {
        eprintln!();
        eprintln!("[ERROR] {:#}", e);
        process::exit(1);
    }
}

async fn get_service() -> anyhow::Result<Arc<SpotifyService>> {
    let settings = Settings::from_env().context("Invalid configuration")?;
    debug!("Loaded settings: {:?}", settings);

    let client = get_spotify_client()
        .await
        .context("Error initializing Spotify client")?;

    Ok(Arc::new(SpotifyService::new(client, settings)))
}

async fn handle_generate(
    name: Option<&str>,
    total: Option<u32>,
    json_path: Option<&str>,
    concurrent: bool,
) -> anyhow::Result<()> {
    let service = get_service().await?;
    let settings = service.settings().clone();
    let total = total.unwrap_or(settings.total);

    let aggregator = Aggregator::new(Arc::clone(&service))
        .concurrent(concurrent || settings.concurrent_batches);

    let generator = Generator::builder()
        .history(Buffer::new(Arc::clone(&service)))
        .recommender(aggregator)
        .total(total)
        .build()?;

    println!("Generating up to {} recommendations...", generator.total());
    let tracks = generator
        .tracklist()
        .await
        .context("Tracklist generation failed")?;

    println!();
    println!("---------------------------------------------------");
    println!("TRACKLIST ({} tracks)", tracks.len());
    println!("---------------------------------------------------");
    print_tracks(&tracks);

    let playlist = match name {
        Some(name) => {
            println!();
            println!("Publishing playlist '{}'...", name);
            let playlist = Publisher::new(Arc::clone(&service))
                .publish(name, &tracks)
                .await
                .context("Publishing failed")?;
            println!("[SAVED] Playlist created: {}", playlist.uri);
            Some(playlist)
        }
        None => None,
    };

    if let Some(path) = json_path {
        let report = TracklistReport {
            total_requested: generator.total(),
            tracks,
            playlist,
        };
        save_json(path, serde_json::to_string_pretty(&report).unwrap_or_default());
    }

    Ok(())
}

async fn handle_recommend(
    raw_seeds: &[String],
    total: Option<u32>,
    json_path: Option<&str>,
) -> anyhow::Result<()> {
    let seeds = raw_seeds
        .iter()
        .map(|s| s.parse::<Seed>())
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid --seed value")?;

    let service = get_service().await?;
    let total = total.unwrap_or(service.settings().total);
    let aggregator =
        Aggregator::new(Arc::clone(&service)).concurrent(service.settings().concurrent_batches);

    println!(
        "Requesting {} recommendations for {} seeds...",
        total,
        seeds.len()
    );
    let tracks = aggregator
        .recommendations(total, &seeds)
        .await
        .context("Recommendation request failed")?;

    println!();
    print_tracks(&tracks);

    if let Some(path) = json_path {
        save_json(path, serde_json::to_string_pretty(&tracks).unwrap_or_default());
    }

    Ok(())
}

async fn handle_history() -> anyhow::Result<()> {
    let service = get_service().await?;
    println!("Fetching your listening history...");

    let top = service.top_artists().await?;
    println!();
    println!("TOP ARTISTS ({})", top.len());
    println!("---------------------------------------------------");
    for (i, artist) in top.iter().enumerate() {
        println!("{:>3}. {}", i + 1, artist);
    }

    let recent = service.recent_tracks().await?;
    println!();
    println!("RECENTLY PLAYED ({})", recent.len());
    println!("---------------------------------------------------");
    print_tracks(&recent);

    Ok(())
}

fn print_tracks(tracks: &[Track]) {
    if tracks.is_empty() {
        println!("(nothing left after filtering out artists you already know)");
        return;
    }
    for (i, track) in tracks.iter().enumerate() {
        println!("{:>3}. {}", i + 1, track);
    }
}

fn save_json(path: &str, json_content: String) {
    match File::create(path) {
        Ok(mut file) => {
            if let Err(e) = file.write_all(json_content.as_bytes()) {
                eprintln!();
                eprintln!("[ERROR] Failed to write report to file: {}", e);
            } else {
                println!();
                println!("[SAVED] Report saved to: {}", path);
            }
        }
        Err(e) => eprintln!("[ERROR] Failed to create file '{}': {}", path, e),
    }
}
