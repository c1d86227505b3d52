use std::path::Path;

use tracing::info;

use crate::config::{LibrarySettings, Settings};
use crate::error::Result;
use crate::library::{Track, load_playlist, scan};
use crate::transport::{MediaResource, RodioMedia, TransportContext, TransportController};

/// Build the browsable library from `target`: a `.toml` playlist file or a
/// directory to scan.
pub fn load_library(target: &Path, settings: &LibrarySettings) -> Result<Vec<Track>> {
    let is_playlist = target.is_file()
        && target
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    if is_playlist {
        load_playlist(target)
    } else {
        Ok(scan(target, settings))
    }
}

/// Open the default audio output.
pub fn open_media() -> Result<RodioMedia> {
    Ok(RodioMedia::open_default()?)
}

/// Construct the transport from playback settings.
pub fn build_transport<M: MediaResource>(media: M, settings: &Settings) -> TransportController<M> {
    let ctx = TransportContext::from(&settings.playback);
    info!(
        shuffle = ctx.shuffle,
        repeat = ?ctx.repeat,
        gesture_required = ctx.gesture_required,
        "transport ready"
    );
    TransportController::new(media, ctx)
}
