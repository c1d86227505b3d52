//! TOML playlist files.
//!
//! ```toml
//! [[track]]
//! id = "intro"
//! title = "Intro"
//! source = "audio/intro.flac"
//! artist = "Someone"
//! cover = "covers/intro.jpg"
//! duration_secs = 182.5
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::config::TrackDisplayField;
use crate::error::{Error, Result};

use super::display::display_from_fields;
use super::model::Track;

#[derive(Debug, Deserialize)]
struct PlaylistFile {
    #[serde(default, rename = "track")]
    tracks: Vec<TrackEntry>,
}

#[derive(Debug, Deserialize)]
struct TrackEntry {
    id: String,
    title: String,
    source: String,
    artist: Option<String>,
    album: Option<String>,
    cover: Option<String>,
    duration_secs: Option<f64>,
}

/// Read a playlist file. Relative sources resolve against the file's directory.
pub fn load_playlist(path: &Path) -> Result<Vec<Track>> {
    let text = std::fs::read_to_string(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let tracks = parse_playlist(&text, base).map_err(|e| match e {
        Error::Playlist { source, .. } => Error::Playlist {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    info!(path = %path.display(), count = tracks.len(), "playlist loaded");
    Ok(tracks)
}

/// Parse playlist TOML, resolving relative local sources against `base`.
pub fn parse_playlist(text: &str, base: &Path) -> Result<Vec<Track>> {
    let file: PlaylistFile = toml::from_str(text).map_err(|source| Error::Playlist {
        path: base.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::new();
    let mut tracks = Vec::with_capacity(file.tracks.len());
    for entry in file.tracks {
        if !seen.insert(entry.id.clone()) {
            return Err(Error::DuplicateTrack(entry.id));
        }

        let source = resolve_source(&entry.source, base);
        let display = display_from_fields(
            &source,
            &entry.title,
            entry.artist.as_deref(),
            entry.album.as_deref(),
            &[TrackDisplayField::Artist, TrackDisplayField::Title],
            " - ",
        );

        tracks.push(Track {
            id: entry.id,
            title: entry.title,
            source,
            cover: entry.cover.map(|c| resolve_source(&c, base)),
            artist: entry.artist,
            album: entry.album,
            duration: entry
                .duration_secs
                .filter(|s| *s > 0.0)
                .and_then(|s| Duration::try_from_secs_f64(s).ok()),
            display,
        });
    }
    Ok(tracks)
}

/// Leave URIs alone, anchor relative paths at `base`.
fn resolve_source(source: &str, base: &Path) -> String {
    if source.contains("://") || Path::new(source).is_absolute() {
        return source.to_string();
    }
    base.join(source).display().to_string()
}
