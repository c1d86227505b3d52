//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the library list and the player bar using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::App;
use crate::config::{ControlsSettings, TimeField, TrackDisplayField, UiSettings};
use crate::library::{Track, format_time};
use crate::transport::{PlaybackInfo, RepeatMode};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play selected");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L is filled dynamically from config.
    map.insert("/", "filter");
    map.insert("s", "shuffle");
    map.insert("r", "repeat");
    map.insert("f", "follow");
    map.insert("K", "metadata");
    map.insert("q", "quit");
    map
});

/// What the player bar shows about the transport this frame.
pub struct NowPlaying<'a> {
    pub info: &'a PlaybackInfo,
    pub track: Option<&'a Track>,
}

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "gg/G", "K", "/", "s", "r", "f", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn repeat_text(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "REPEAT: Off",
        RepeatMode::All => "REPEAT: All",
        RepeatMode::One => "REPEAT: One",
    }
}

fn trimmed(v: Option<&str>) -> Option<String> {
    v.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Build the "now playing" track text according to `ui` settings.
fn now_playing_track_text(track: &Track, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in &ui.now_playing_track_fields {
        let part = match f {
            TrackDisplayField::Display => trimmed(Some(track.display.as_str())),
            TrackDisplayField::Title => trimmed(Some(track.title.as_str())),
            TrackDisplayField::Artist => trimmed(track.artist.as_deref()),
            TrackDisplayField::Album => trimmed(track.album.as_deref()),
            TrackDisplayField::Filename => trimmed(
                std::path::Path::new(&track.source)
                    .file_stem()
                    .and_then(|s| s.to_str()),
            ),
            TrackDisplayField::Source => Some(track.source.clone()),
        };
        parts.extend(part);
    }

    if parts.is_empty() {
        track.display.clone()
    } else {
        parts.join(&ui.now_playing_track_separator)
    }
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_time(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_time(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    parts.push(format!("-{}", format_time(t.saturating_sub(elapsed))));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

/// Fraction of the track played, for the progress gauge. Unknown duration
/// shows an empty bar.
fn progress_ratio(elapsed: Duration, total: Option<Duration>) -> f64 {
    match total {
        Some(t) if !t.is_zero() => (elapsed.as_secs_f64() / t.as_secs_f64()).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

fn status_text(app: &App, now: &NowPlaying<'_>, ui_settings: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();

    if app.follow_playback {
        parts.push(" CURSOR: Follow".to_string());
    } else {
        parts.push(" CURSOR: Free-roam".to_string());
    }

    parts.push(repeat_text(now.info.repeat).to_string());

    let q = app.filter_query.trim();
    if app.filter_mode || !q.is_empty() {
        let mut filter_part = String::from("FILTER:");
        if !q.is_empty() {
            filter_part.push(' ');
            filter_part.push_str(q);
        }
        parts.push(filter_part);
    }

    match now.track {
        Some(track) => {
            let song = now_playing_track_text(track, ui_settings);
            match now_playing_time_text(now.info.elapsed, now.info.duration, ui_settings) {
                Some(time) => parts.push(format!("Song: {} [{}]", song, time)),
                None => parts.push(format!("Song: {}", song)),
            }
            let state = if now.info.playing { "Playing" } else { "Paused" };
            parts.push(state.to_string());
        }
        None => parts.push("Stopped".to_string()),
    }

    if now.info.shuffle {
        parts.push("Shuffle: ON".to_string());
    } else {
        parts.push("Shuffle: OFF".to_string());
    }

    if let Some(label) = &app.source_label {
        parts.push(format!("From: {}", label));
    }

    parts.join(" • ")
}

fn track_list<'a>(app: &'a App, display: &[usize], list_height: usize) -> (Vec<ListItem<'a>>, Option<usize>) {
    let q = app.filter_query.trim();
    let query_lower = if !q.is_empty() && app.uses_lower_titles() {
        Some(q.to_ascii_lowercase())
    } else {
        None
    };

    // Only build ListItems for the visible window, centred on the selection.
    let total = display.len();
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end) = if total <= list_height || list_height == 0 {
        (0, total)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height)
    };

    let items = display[start..end]
        .iter()
        .map(|&i| {
            let title = &app.tracks[i].display;
            if q.is_empty() {
                return ListItem::new(title.as_str());
            }
            let positions = match query_lower.as_deref() {
                Some(ql) => app.fuzzy_match_positions_for_track_lower(i, ql),
                None => App::fuzzy_match_positions(title, q),
            };
            let Some(positions) = positions else {
                return ListItem::new(title.as_str());
            };

            // Uppercase the matched characters.
            let mut rendered = String::new();
            let mut pos_iter = positions.into_iter();
            let mut next_pos = pos_iter.next();
            for (ci, ch) in title.chars().enumerate() {
                if next_pos == Some(ci) {
                    rendered.extend(ch.to_uppercase());
                    next_pos = pos_iter.next();
                } else {
                    rendered.push(ch);
                }
            }
            ListItem::new(rendered)
        })
        .collect();

    let selected = (total > 0).then(|| sel_pos - start);
    (items, selected)
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    display: &[usize],
    now: &NowPlaying<'_>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app, now, ui_settings))
        .block(Block::bordered().padding(left_pad()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    let (items, selected) = track_list(app, display, chunks[2].height as usize);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(selected);
    frame.render_stateful_widget(list, chunks[2], &mut state);

    let label = match now.info.duration {
        Some(d) => format!("{} / {}", format_time(now.info.elapsed), format_time(d)),
        None => format_time(now.info.elapsed),
    };
    let gauge = Gauge::default()
        .block(Block::bordered().title(" progress "))
        .ratio(progress_ratio(now.info.elapsed, now.info.duration))
        .label(label);
    frame.render_widget(gauge, chunks[3]);

    if app.metadata_window {
        // Keep the popup inside the list area.
        let popup_area = centered_rect_sized(72, 10, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let meta = match app.selected_track() {
            Some(track) => format!(
                "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nCover: {}\nSource: {}",
                track.title,
                track.artist.as_deref().unwrap_or("-"),
                track.album.as_deref().unwrap_or("-"),
                track.duration.map(format_time).unwrap_or_else(|| "-".to_string()),
                track.cover.as_deref().unwrap_or("-"),
                track.source
            ),
            None => "No track selected".to_string(),
        };
        let meta_paragraph = Paragraph::new(meta)
            .block(
                Block::default()
                    .padding(left_pad())
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track {
            id: "1".into(),
            title: "Song".into(),
            source: "/music/01 Song.mp3".into(),
            cover: None,
            artist: Some("Artist".into()),
            album: Some("Album".into()),
            duration: None,
            display: "Artist - Song".into(),
        }
    }

    #[test]
    fn now_playing_track_text_follows_configured_fields() {
        let ui = UiSettings {
            now_playing_track_fields: vec![
                TrackDisplayField::Album,
                TrackDisplayField::Filename,
            ],
            now_playing_track_separator: " | ".into(),
            ..UiSettings::default()
        };
        assert_eq!(now_playing_track_text(&track(), &ui), "Album | 01 Song");

        let empty = UiSettings {
            now_playing_track_fields: Vec::new(),
            ..UiSettings::default()
        };
        assert_eq!(now_playing_track_text(&track(), &empty), "Artist - Song");
    }

    #[test]
    fn time_text_skips_total_and_remaining_until_duration_is_known() {
        let ui = UiSettings::default();
        let elapsed = Duration::from_secs(45);
        assert_eq!(now_playing_time_text(elapsed, None, &ui), Some("0:45".into()));
        assert_eq!(
            now_playing_time_text(elapsed, Some(Duration::from_secs(180)), &ui),
            Some("0:45 / 3:00 / -2:15".into())
        );
    }

    #[test]
    fn progress_ratio_is_clamped_and_zero_without_duration() {
        assert_eq!(progress_ratio(Duration::from_secs(10), None), 0.0);
        assert_eq!(progress_ratio(Duration::from_secs(10), Some(Duration::ZERO)), 0.0);
        assert_eq!(
            progress_ratio(Duration::from_secs(45), Some(Duration::from_secs(180))),
            0.25
        );
        assert_eq!(
            progress_ratio(Duration::from_secs(300), Some(Duration::from_secs(180))),
            1.0
        );
    }

    #[test]
    fn controls_text_includes_scrub_seconds() {
        let text = controls_text(7);
        assert!(text.contains("[H/L] seek -/+7s"));
        assert!(text.contains("[r] repeat"));
    }
}
