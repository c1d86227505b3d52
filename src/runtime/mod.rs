use std::env;
use std::path::PathBuf;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

use crate::app::App;
use crate::logging;

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    match logging::init(&settings.logging) {
        Ok(path) => info!(log = %path.display(), "encore starting"),
        Err(e) => eprintln!("encore: logging disabled: {e}"),
    }

    let target = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("Music"));

    let tracks = startup::load_library(&target, &settings.library).inspect_err(|e| {
        error!(path = %target.display(), error = %e, "could not load library");
    })?;

    let media = startup::open_media().inspect_err(|e| {
        error!(error = %e, "no audio output");
    })?;
    let mut transport = startup::build_transport(media, &settings);

    let mut app = App::new(tracks);
    app.follow_playback = settings.ui.follow_playback;
    app.set_source_label(target.display().to_string());

    let mut state = event_loop::EventLoopState::new(transport.subscribe());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result =
        event_loop::run(&mut terminal, &settings, &mut app, &mut transport, &mut state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        error!(error = %e, "event loop failed");
    }
    info!("encore exiting");
    run_result
}
