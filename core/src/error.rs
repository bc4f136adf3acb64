use std::fmt;
use thiserror::Error;

pub type Result<T, E = RefindError> = std::result::Result<T, E>;

/// Errors raised anywhere in the tracklist pipeline.
///
/// Layers wrap failures with [`Context`] on the way up, so the variant a
/// caller sees is usually `Context`. Use [`RefindError::kind`] to inspect the
/// root cause.
#[derive(Error, Debug)]
pub enum RefindError {
    #[error("seed source has a missing or blank {0}")]
    InvalidSeedId(&'static str),
    #[error("unexpected seed category: {0:?}")]
    UnknownSeedCategory(String),
    #[error("missing seed input")]
    MissingSeeds,
    #[error("playlist track list is missing")]
    MissingTracks,
    #[error("parameter {name} is out of range: {value}")]
    InvalidRange { name: &'static str, value: i64 },
    #[error("invalid or empty data returned for {0}")]
    InvalidUpstreamData(&'static str),
    #[error("cannot initialize {0} without a provider")]
    NilProvider(&'static str),
    #[error("invalid {kind}: {value:?}")]
    InvalidId { kind: &'static str, value: String },
    #[error("Spotify API error: {0}")]
    Spotify(#[from] rspotify::ClientError),
    #[error("upstream request failed: {0}")]
    Upstream(String),
    // Not a `#[source]`: the message already carries the inner error.
    #[error("{context}: {inner}")]
    Context {
        context: String,
        inner: Box<RefindError>,
    },
}

/// Root-cause classification of a [`RefindError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidSeedId,
    UnknownSeedCategory,
    MissingSeeds,
    MissingTracks,
    InvalidRange,
    InvalidUpstreamData,
    NilProvider,
    InvalidId,
    Transport,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidSeedId => "invalid seed id",
            ErrorKind::UnknownSeedCategory => "unknown seed category",
            ErrorKind::MissingSeeds => "missing seeds",
            ErrorKind::MissingTracks => "missing tracks",
            ErrorKind::InvalidRange => "invalid range",
            ErrorKind::InvalidUpstreamData => "invalid upstream data",
            ErrorKind::NilProvider => "nil provider",
            ErrorKind::InvalidId => "invalid id",
            ErrorKind::Transport => "transport",
        };
        f.write_str(name)
    }
}

impl RefindError {
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            RefindError::InvalidSeedId(_) => ErrorKind::InvalidSeedId,
            RefindError::UnknownSeedCategory(_) => ErrorKind::UnknownSeedCategory,
            RefindError::MissingSeeds => ErrorKind::MissingSeeds,
            RefindError::MissingTracks => ErrorKind::MissingTracks,
            RefindError::InvalidRange { .. } => ErrorKind::InvalidRange,
            RefindError::InvalidUpstreamData(_) => ErrorKind::InvalidUpstreamData,
            RefindError::NilProvider(_) => ErrorKind::NilProvider,
            RefindError::InvalidId { .. } => ErrorKind::InvalidId,
            RefindError::Spotify(_) | RefindError::Upstream(_) => ErrorKind::Transport,
            // root() never stops on a Context
            RefindError::Context { inner, .. } => inner.kind(),
        }
    }

    /// The innermost error, with every context layer peeled off.
    pub fn root(&self) -> &RefindError {
        let mut current = self;
        while let RefindError::Context { inner, .. } = current {
            current = inner;
        }
        current
    }

    pub fn context<C: Into<String>>(self, context: C) -> Self {
        RefindError::Context {
            context: context.into(),
            inner: Box::new(self),
        }
    }
}

/// Adds operation context to a failing result without changing its root kind.
pub trait Context<T> {
    fn context<C: Into<String>>(self, context: C) -> Result<T>;

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: Into<RefindError>,
{
    fn context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| Into::<RefindError>::into(e).context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Into::<RefindError>::into(e).context(f()))
    }
}
