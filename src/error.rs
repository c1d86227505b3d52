//! Error types.
//!
//! `MediaError` covers the playback resource and never leaves the transport
//! controller; `Error` covers startup paths (config, playlists, devices).

use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by a media resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// No audio output device could be opened
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    /// The source locator uses a scheme this resource cannot open
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    /// The source could not be opened
    #[error("cannot open {source_uri}: {reason}")]
    Open { source_uri: String, reason: String },

    /// The source opened but could not be decoded
    #[error("cannot decode {source_uri}: {reason}")]
    Decode { source_uri: String, reason: String },

    /// The platform refused to start playback
    #[error("playback rejected: {0}")]
    Rejected(String),

    /// An operation needs a loaded source
    #[error("no source loaded")]
    NotLoaded,
}

/// Crate-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Playlist file parse errors
    #[error("playlist {path}: {source}")]
    Playlist {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Two tracks in one list share an id
    #[error("duplicate track id {0:?}")]
    DuplicateTrack(String),

    /// Media device errors at startup
    #[error("media error: {0}")]
    Media(#[from] MediaError),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
