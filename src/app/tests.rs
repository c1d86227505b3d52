use super::*;
use crate::library::Track;

fn t(title: &str) -> Track {
    Track {
        id: title.to_ascii_lowercase(),
        title: title.into(),
        source: format!("/music/{title}.mp3"),
        cover: None,
        artist: None,
        album: None,
        duration: None,
        display: title.into(),
    }
}

#[test]
fn fuzzy_match_simple() {
    let title = "Hello World";
    assert!(App::fuzzy_match_positions(title, "hw").is_some());
    assert_eq!(App::fuzzy_match_positions(title, "hw"), Some(vec![0, 6]));
    assert!(App::fuzzy_match_positions(title, "xyz").is_none());
}

#[test]
fn display_indices_uses_fuzzy_not_substring_only() {
    let tracks = vec![t("Metallica - Blackened"), t("Black Sabbath - Paranoid")];

    let mut app = App::new(tracks);
    app.filter_query = "mtbk".into();
    assert_eq!(app.display_indices(), vec![0]);
}

#[test]
fn whitespace_only_filter_shows_everything() {
    let tracks = vec![t("Alpha"), t("Beta")];

    let mut app = App::new(tracks);
    app.filter_query = "   ".into();
    assert_eq!(app.display_indices(), vec![0, 1]);
}

#[test]
fn large_libraries_filter_through_precomputed_lowercase_titles() {
    let tracks: Vec<Track> = (0..150).map(|i| t(&format!("Track {i:03}"))).collect();
    let mut app = App::new(tracks);
    assert!(app.uses_lower_titles());

    app.filter_query = "TRACK 149".into();
    assert_eq!(app.display_indices(), vec![149]);
    assert!(app.fuzzy_match_positions_for_track_lower(149, "149").is_some());
    assert!(app.fuzzy_match_positions_for_track_lower(3, "149").is_none());
}

#[test]
fn visible_tracks_is_the_filtered_list_in_library_order() {
    let tracks = vec![t("Alpha"), t("Beta"), t("Gamma"), t("Delta")];
    let mut app = App::new(tracks);
    app.filter_query = "ta".into();

    let ids: Vec<String> = app.visible_tracks().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec!["beta".to_string(), "delta".to_string()]);
}

#[test]
fn next_prev_in_view_helpers_work() {
    let tracks = vec![t("Alpha"), t("Beta"), t("Gamma")];

    let mut app = App::new(tracks);
    app.filter_query = "et".into(); // only Beta is visible

    assert_eq!(app.next_in_view_from(0), Some(1));
    assert_eq!(app.prev_in_view_from(0), Some(1));
    assert_eq!(app.next_in_view_from(1), Some(1));
    assert_eq!(app.prev_in_view_from(1), Some(1));
}

#[test]
fn cursor_moves_wrap_and_jump_to_ends() {
    let tracks = vec![t("Alpha"), t("Beta"), t("Gamma")];
    let mut app = App::new(tracks);

    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.select_last();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);
}

#[test]
fn filter_mode_stops_following_and_keeps_selection_visible() {
    let tracks = vec![t("Alpha"), t("Beta"), t("Gamma")];
    let mut app = App::new(tracks);
    app.set_selected(2);

    app.enter_filter_mode();
    assert!(!app.follow_playback);
    app.push_filter_char('b');
    assert_eq!(app.selected, 1);

    app.pop_filter_char();
    assert_eq!(app.selected, 1);

    app.push_filter_char('z');
    app.push_filter_char('z');
    assert_eq!(app.selected, 0);
    app.clear_filter();
    assert!(!app.filter_mode);
    assert!(app.filter_query.is_empty());
}

#[test]
fn index_of_id_and_selected_track() {
    let tracks = vec![t("Alpha"), t("Beta")];
    let mut app = App::new(tracks);
    assert_eq!(app.index_of_id("beta"), Some(1));
    assert_eq!(app.index_of_id("nope"), None);

    app.set_selected(1);
    assert_eq!(app.selected_track().map(|t| t.title.as_str()), Some("Beta"));
    assert!(app.has_tracks());
}
