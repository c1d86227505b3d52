use std::time::Duration;

use crate::error::MediaError;

use super::types::MediaEvent;

/// The single audio-rendering resource owned by a `TransportController`.
///
/// Implementations are driven from one thread. `load` replaces whatever was
/// loaded before, which is how a new track supersedes the old one.
pub trait MediaResource {
    /// Stop the current source and prepare `source` at position zero, paused.
    fn load(&mut self, source: &str) -> Result<(), MediaError>;

    /// Start or continue playback of the loaded source.
    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    /// Move to `pos`, clamped to the source's bounds. Returns the position
    /// actually reached.
    /// An error leaves nothing loaded.
    fn seek(&mut self, pos: Duration) -> Result<Duration, MediaError>;

    fn position(&self) -> Duration;

    /// Drain notifications accumulated since the last call.
    fn poll_events(&mut self) -> Vec<MediaEvent>;

    /// Fade to silence over the given time and stop. Used on shutdown.
    /// Resources that cannot fade just pause.
    fn fade_out(&mut self, _over: Duration) {
        self.pause();
    }
}
