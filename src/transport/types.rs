//! Transport-related small types.
//!
//! Repeat mode, the coarse transport state, the snapshot handed to
//! presentation code, and the two event vocabularies: what the media
//! resource reports and what the controller broadcasts.

use std::time::Duration;

use crate::config::{PlaybackSettings, RepeatSetting};
use crate::error::MediaError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop at the end of the queue.
    #[default]
    Off,
    /// Wrap around to the start of the queue.
    All,
    /// Repeat the current track when it ends.
    One,
}

impl RepeatMode {
    /// The mode after this one in the cycle `Off -> All -> One -> Off`.
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

impl From<RepeatSetting> for RepeatMode {
    fn from(s: RepeatSetting) -> Self {
        match s {
            RepeatSetting::Off => Self::Off,
            RepeatSetting::All => Self::All,
            RepeatSetting::One => Self::One,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportState {
    /// No queue installed yet.
    Idle,
    Paused,
    Playing,
}

/// Point-in-time view of the transport for presentation code.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackInfo {
    /// Current position in the queue (if any).
    pub index: Option<usize>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Track length once the media resource has reported it.
    pub duration: Option<Duration>,
    /// Whether playback is currently active.
    pub playing: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            index: None,
            elapsed: Duration::ZERO,
            duration: None,
            playing: false,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

/// Notifications from the media resource, delivered through
/// `TransportController::handle_media_event`.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The resource learned the length of the loaded source.
    MetadataLoaded(Duration),
    /// Playback position moved.
    TimeUpdate(Duration),
    /// The loaded source played to its natural end.
    Ended,
    /// The resource failed after loading (decode or device trouble).
    Error(MediaError),
}

/// Change notifications broadcast to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    TrackChanged(Option<usize>),
    PlayingChanged(bool),
    PositionChanged(Duration),
    DurationChanged(Option<Duration>),
    ShuffleChanged(bool),
    RepeatChanged(RepeatMode),
}

/// Construction-time configuration for a `TransportController`.
#[derive(Debug, Clone)]
pub struct TransportContext {
    /// Audio may only start after `grant_user_gesture` has been called.
    pub gesture_required: bool,
    /// `previous` restarts the current track once this much has elapsed.
    pub restart_threshold: Duration,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Default for TransportContext {
    fn default() -> Self {
        Self {
            gesture_required: false,
            restart_threshold: Duration::from_secs(3),
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

impl From<&PlaybackSettings> for TransportContext {
    fn from(s: &PlaybackSettings) -> Self {
        Self {
            gesture_required: s.require_gesture,
            restart_threshold: Duration::from_millis(s.restart_threshold_ms),
            shuffle: s.shuffle,
            repeat: s.repeat.into(),
        }
    }
}
