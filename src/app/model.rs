//! Application model: the browsable library, cursor and filter.
//!
//! Playback state is not stored here; the runtime reads it from the
//! transport controller on each frame.

use crate::library::Track;

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,

    lower_titles: Option<Vec<String>>,

    pub follow_playback: bool,
    pub filter_mode: bool,
    pub filter_query: String,
    /// Directory or playlist file the library came from.
    pub source_label: Option<String>,
    pub metadata_window: bool,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        // For larger libraries, precompute lowercase titles so filtering does
        // not lowercase every label on each keystroke.
        let lower_titles = if tracks.len() > 100 {
            Some(
                tracks
                    .iter()
                    .map(|t| t.display.to_ascii_lowercase())
                    .collect(),
            )
        } else {
            None
        };

        Self {
            tracks,
            selected: 0,
            lower_titles,
            follow_playback: true,
            filter_mode: false,
            filter_query: String::new(),
            source_label: None,
            metadata_window: false,
        }
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }
    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }
    pub fn set_source_label(&mut self, label: String) {
        self.source_label = Some(label);
    }

    /// Library indices visible under the active filter, in library order.
    pub fn display_indices(&self) -> Vec<usize> {
        let all = 0..self.tracks.len();
        let query = self.filter_query.trim();
        if query.is_empty() {
            return all.collect();
        }

        match self.lower_titles.as_deref() {
            Some(lower_titles) => {
                let query_lower = query.to_ascii_lowercase();
                all.filter(|&i| {
                    Self::fuzzy_match_positions_lower(&lower_titles[i], &query_lower).is_some()
                })
                .collect()
            }
            None => all
                .filter(|&i| Self::fuzzy_match_positions(&self.tracks[i].display, query).is_some())
                .collect(),
        }
    }

    /// The visible tracks, cloned. This is the queue handed to the transport
    /// when a track is started from the list.
    pub fn visible_tracks(&self) -> Vec<Track> {
        self.display_indices()
            .into_iter()
            .map(|i| self.tracks[i].clone())
            .collect()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    /// Library index of the track with `id`.
    pub fn index_of_id(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Return true if this `App` uses precomputed lowercase titles.
    pub fn uses_lower_titles(&self) -> bool {
        self.lower_titles.is_some()
    }

    /// Fuzzy-match `query_lower` against a specific track by index.
    ///
    /// Returns the character positions that match, or `None` when there is no match.
    pub fn fuzzy_match_positions_for_track_lower(
        &self,
        track_index: usize,
        query_lower: &str,
    ) -> Option<Vec<usize>> {
        if query_lower.is_empty() {
            return Some(Vec::new());
        }

        match self.lower_titles.as_deref() {
            Some(lower_titles) => {
                Self::fuzzy_match_positions_lower(&lower_titles[track_index], query_lower)
            }
            None => Self::fuzzy_match_positions(&self.tracks[track_index].display, query_lower),
        }
    }

    /// Return the next visible index after `current`, wrapping to the first.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        self.step_in_view(current, true)
    }

    /// Return the previous visible index before `current`, wrapping to the last.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        self.step_in_view(current, false)
    }

    fn step_in_view(&self, current: usize, forward: bool) -> Option<usize> {
        let display = self.display_indices();
        let len = display.len();
        let last = *display.last()?;
        let step = match display.iter().position(|&i| i == current) {
            Some(p) if forward => display[(p + 1) % len],
            Some(p) => display[(p + len - 1) % len],
            None if forward => display[0],
            None => last,
        };
        Some(step)
    }

    /// Set the selected track index and ensure it is visible in the display.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
        self.ensure_selected_visible();
    }
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Fuzzy/subsequence match: return the character positions in `title`
    /// that match `query`, or `None` if not matched.
    pub fn fuzzy_match_positions(title: &str, query: &str) -> Option<Vec<usize>> {
        subsequence_positions(title, query, |c| c.to_ascii_lowercase())
    }

    fn fuzzy_match_positions_lower(title_lower: &str, query_lower: &str) -> Option<Vec<usize>> {
        subsequence_positions(title_lower, query_lower, |c| c)
    }

    /// Enter filter mode; the cursor stops following playback while typing.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.follow_playback_off();
        self.ensure_selected_visible();
    }
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }
    /// Clear the active filter and restore selection visibility.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }
    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }
    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Move selection to the first visible track when the current one is
    /// filtered out.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }

        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }
    /// Move selection to the next visible track.
    pub fn next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    /// Move selection to the previous visible track.
    pub fn prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.selected = last;
        }
    }
}

/// Positions in `haystack` where the characters of `needle` appear in order,
/// comparing both sides through `fold`.
fn subsequence_positions(
    haystack: &str,
    needle: &str,
    fold: fn(char) -> char,
) -> Option<Vec<usize>> {
    let mut hay = haystack.chars().map(fold).enumerate();
    needle
        .chars()
        .map(fold)
        .map(|nc| hay.find(|&(_, hc)| hc == nc).map(|(i, _)| i))
        .collect()
}
