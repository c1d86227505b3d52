//! Scripted media resource for tests.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::MediaError;

use super::media::MediaResource;
use super::types::MediaEvent;

/// Scripted media resource: records loads, clamps seeks to a configurable
/// length and hands back queued events on `poll_events`.
#[derive(Debug, Default)]
pub(crate) struct FakeMedia {
    pub(crate) loaded: Option<String>,
    pub(crate) loads: Vec<String>,
    pub(crate) playing: bool,
    pub(crate) position: Duration,
    pub(crate) length: Option<Duration>,
    pub(crate) broken_sources: HashSet<String>,
    pub(crate) reject_play: bool,
    /// Seeks fail and drop the loaded source, like a decoder that cannot reopen.
    pub(crate) fail_seek: bool,
    pub(crate) events: Vec<MediaEvent>,
    pub(crate) faded: Option<Duration>,
}

impl MediaResource for FakeMedia {
    fn load(&mut self, source: &str) -> Result<(), MediaError> {
        self.loads.push(source.to_string());
        self.playing = false;
        self.position = Duration::ZERO;
        if self.broken_sources.contains(source) {
            self.loaded = None;
            return Err(MediaError::Open {
                source_uri: source.to_string(),
                reason: "missing".to_string(),
            });
        }
        self.loaded = Some(source.to_string());
        Ok(())
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.loaded.is_none() {
            return Err(MediaError::NotLoaded);
        }
        if self.reject_play {
            return Err(MediaError::Rejected("autoplay blocked".to_string()));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, pos: Duration) -> Result<Duration, MediaError> {
        let Some(source) = self.loaded.clone() else {
            return Err(MediaError::NotLoaded);
        };
        if self.fail_seek {
            self.loaded = None;
            self.playing = false;
            return Err(MediaError::Open {
                source_uri: source,
                reason: "reopen failed".to_string(),
            });
        }
        self.position = match self.length {
            Some(len) => pos.min(len),
            None => pos,
        };
        Ok(self.position)
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.events)
    }

    fn fade_out(&mut self, over: Duration) {
        self.faded = Some(over);
        self.playing = false;
    }
}
