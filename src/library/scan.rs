use std::path::Path;
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::display_from_fields;
use super::model::Track;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Tag-derived metadata for one file. Missing or unreadable tags leave the
/// filename stem as title.
struct Tags {
    title: String,
    artist: Option<String>,
    album: Option<String>,
    duration: Option<Duration>,
}

fn read_tags(path: &Path) -> Tags {
    let mut tags = Tags {
        title: path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string(),
        artist: None,
        album: None,
        duration: None,
    };

    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no readable tags");
            return tags;
        }
    };

    tags.duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
            tags.title = v.trim().to_string();
        }
        tags.artist = tag
            .artist()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        tags.album = tag
            .album()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
    }
    tags
}

/// Walk `dir` and build a track list sorted by display label.
///
/// Track ids are the file paths, which are unique within one scan.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file()
            || (!settings.include_hidden && is_hidden(path))
            || !is_audio_file(path, settings)
        {
            continue;
        }

        let source = path.display().to_string();
        let tags = read_tags(path);
        let display = display_from_fields(
            &source,
            &tags.title,
            tags.artist.as_deref(),
            tags.album.as_deref(),
            &settings.display_fields,
            &settings.display_separator,
        );

        tracks.push(Track {
            id: source.clone(),
            title: tags.title,
            source,
            cover: None,
            artist: tags.artist,
            album: tags.album,
            duration: tags.duration,
            display,
        });
    }

    tracks.sort_by(|a, b| a.display.to_lowercase().cmp(&b.display.to_lowercase()));
    info!(dir = %dir.display(), count = tracks.len(), "library scanned");
    tracks
}
