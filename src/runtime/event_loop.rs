use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::config;
use crate::transport::{MediaResource, TransportController, TransportEvent};
use crate::ui::{self, NowPlaying};

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    events: Receiver<TransportEvent>,
}

impl EventLoopState {
    pub fn new(events: Receiver<TransportEvent>) -> Self {
        Self {
            pending_gg: false,
            events,
        }
    }
}

/// Main terminal event loop: drives the transport, draws and handles input.
/// Returns `Ok(())` when the user quits.
pub fn run<M: MediaResource>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    transport: &mut TransportController<M>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        transport.pump();
        sync_from_transport(app, transport, state);

        let display = app.display_indices();
        let info = transport.snapshot();
        let now = NowPlaying {
            info: &info,
            track: transport.current_track(),
        };
        terminal.draw(|f| ui::draw(f, app, &display, &now, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, transport, state) {
                    return Ok(());
                }
            }
        }
    }
}

/// Drain transport notifications, moving the cursor onto a newly started
/// track when following playback.
fn sync_from_transport<M: MediaResource>(
    app: &mut App,
    transport: &TransportController<M>,
    state: &EventLoopState,
) {
    let mut track_changed = false;
    while let Ok(ev) = state.events.try_recv() {
        if let TransportEvent::TrackChanged(_) = ev {
            track_changed = true;
        }
    }
    if track_changed && app.follow_playback && !app.filter_mode {
        select_playing(app, transport);
    }
}

fn select_playing<M: MediaResource>(app: &mut App, transport: &TransportController<M>) {
    if let Some(idx) = transport
        .current_track()
        .and_then(|t| app.index_of_id(&t.id))
    {
        app.set_selected(idx);
    }
}

/// Start the selected track, queueing everything currently visible.
fn play_selected<M: MediaResource>(app: &mut App, transport: &mut TransportController<M>) {
    let Some(track) = app.selected_track().cloned() else {
        return;
    };
    app.follow_playback_on();
    transport.play(&track, Some(app.visible_tracks()));
}

/// Handle one key press. Returns `true` when the app should exit.
pub(crate) fn handle_key_event<M: MediaResource>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    transport: &mut TransportController<M>,
    state: &mut EventLoopState,
) -> bool {
    // Any key counts as the user interacting with the player.
    transport.grant_user_gesture();

    if app.filter_mode {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Char('j') | KeyCode::Char('n')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                app.next();
            }
            KeyCode::Char('k') | KeyCode::Char('p')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                app.prev();
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_filter_char(c);
                }
            }
            KeyCode::Enter => {
                if app.display_indices().is_empty() {
                    return false;
                }
                play_selected(app, transport);
                app.exit_filter_mode();
            }
            _ => {}
        }
        return false;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    let scrub = Duration::from_secs(settings.controls.scrub_seconds);
    match key.code {
        KeyCode::Char('q') => {
            transport.shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return true;
        }
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('s') => {
            let on = transport.toggle_shuffle();
            debug!(shuffle = on, "shuffle toggled");
        }
        KeyCode::Char('r') => {
            let mode = transport.toggle_repeat();
            debug!(repeat = ?mode, "repeat toggled");
        }
        KeyCode::Char('f') => {
            if app.follow_playback {
                app.follow_playback_off();
            } else {
                app.follow_playback_on();
                select_playing(app, transport);
            }
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback_off();
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.select_last();
        }
        KeyCode::Char('j') => {
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') => {
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Enter => {
            let already_playing = transport.is_playing()
                && transport.current_track().map(|t| t.id.as_str())
                    == app.selected_track().map(|t| t.id.as_str());
            if !already_playing {
                play_selected(app, transport);
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            if transport.current_track().is_some() {
                transport.toggle_play();
            } else {
                play_selected(app, transport);
            }
        }
        KeyCode::Char('l') => transport.next(),
        KeyCode::Char('h') => transport.previous(),
        KeyCode::Char('L') => {
            let target = transport.position().saturating_add(scrub);
            transport.seek(target);
        }
        KeyCode::Char('H') => {
            let target = transport.position().saturating_sub(scrub);
            transport.seek(target);
        }
        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }

    false
}
