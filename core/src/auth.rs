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

use rspotify::{prelude::*, scopes, AuthCodeSpotify, Config, Credentials, OAuth};
use std::collections::HashSet;
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to initialize Spotify client: {0}")]
    ClientConfig(String),
    #[error("Spotify authentication failed: {0}")]
    Spotify(#[from] rspotify::ClientError),
}

/// Scopes needed to read listening history and publish playlists.
fn required_scopes() -> HashSet<String> {
    scopes!(
        "playlist-modify-public",
        "playlist-modify-private",
        "user-read-private",
        "user-top-read",
        "user-read-recently-played"
    )
}

/// Builds the OAuth settings, rejecting a missing or blank redirect URI.
fn oauth_from_redirect(redirect_uri: Option<String>) -> Result<OAuth, AuthError> {
    let redirect_uri = redirect_uri
        .filter(|uri| !uri.trim().is_empty())
        .ok_or_else(|| AuthError::ClientConfig("RSPOTIFY_REDIRECT_URI is blank".to_string()))?;

    Ok(OAuth {
        redirect_uri,
        scopes: required_scopes(),
        ..Default::default()
    })
}

/// Initializes and authenticates a Spotify client using the Authorization Code Flow.
///
/// Credentials come from `RSPOTIFY_CLIENT_ID` / `RSPOTIFY_CLIENT_SECRET` and the
/// redirect from `RSPOTIFY_REDIRECT_URI`. The token is cached on disk and
/// refreshed automatically, so the browser prompt only shows up on first use
/// or after the scopes change.
pub async fn get_spotify_client() -> Result<AuthCodeSpotify, AuthError> {
    let creds = Credentials::from_env().ok_or_else(|| {
        AuthError::ClientConfig("Missing RSPOTIFY_CLIENT_ID or RSPOTIFY_CLIENT_SECRET".to_string())
    })?;

    let oauth = oauth_from_redirect(env::var("RSPOTIFY_REDIRECT_URI").ok())?;

    // `token_cached: true` saves the token to .spotify_token_cache.json.
    let config = Config {
        token_cached: true,
        token_refreshing: true,
        ..Default::default()
    };

    let spotify = AuthCodeSpotify::with_config(creds, oauth, config);

    let url = spotify.get_authorize_url(false)?;

    // Opens the browser when possible, otherwise prints the URL and waits
    // for the redirected URL to be pasted back.
    spotify.prompt_for_token(&url).await?;

    Ok(spotify)
}
