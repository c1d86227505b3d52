use std::path::Path;
use std::time::Duration;

use crate::config::TrackDisplayField;

/// Build a display string for a track according to the provided `fields` and separator.
///
/// This composes metadata fields (artist, title, album, filename, source) in the
/// configured order and falls back to `title` when no parts were produced.
pub fn display_from_fields(
    source: &str,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Display => {
                // "display" inside the field list means "artist - title".
                parts.extend(non_empty(artist));
                parts.extend(non_empty(Some(title)));
            }
            TrackDisplayField::Title => parts.extend(non_empty(Some(title))),
            TrackDisplayField::Artist => parts.extend(non_empty(artist)),
            TrackDisplayField::Album => parts.extend(non_empty(album)),
            TrackDisplayField::Filename => {
                let stem = Path::new(source).file_stem().and_then(|s| s.to_str());
                parts.extend(non_empty(stem));
            }
            TrackDisplayField::Source => parts.push(source.to_string()),
        }
    }

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}

fn non_empty(v: Option<&str>) -> Option<String> {
    v.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Format a position as `m:ss`, the way the player bar shows it.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
