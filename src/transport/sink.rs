//! `rodio`-backed media resource.
//!
//! One `Sink` on the default output stream at a time. Seeking rebuilds the
//! sink and skips into the decoded source, which works for every format the
//! decoder handles. Position is tracked from wall-clock time between
//! play/pause transitions.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use crate::error::MediaError;

use super::media::MediaResource;
use super::types::MediaEvent;

/// Map a source locator to a local file. Only paths and `file://` URIs are
/// playable.
pub(crate) fn resolve_source(source: &str) -> Result<PathBuf, MediaError> {
    if let Some(rest) = source.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if source.contains("://") {
        return Err(MediaError::UnsupportedSource(source.to_string()));
    }
    if source.trim().is_empty() {
        return Err(MediaError::UnsupportedSource("empty source".to_string()));
    }
    Ok(PathBuf::from(source))
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
/// Also returns the source length when the decoder knows it.
fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), MediaError> {
    let source_uri = path.display().to_string();
    let file = File::open(path).map_err(|e| MediaError::Open {
        source_uri: source_uri.clone(),
        reason: e.to_string(),
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| MediaError::Decode {
        source_uri,
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}

pub struct RodioMedia {
    stream: OutputStream,
    sink: Option<Sink>,
    path: Option<PathBuf>,
    duration: Option<Duration>,

    // Playback start time and elapsed time accumulated across pauses.
    started_at: Option<Instant>,
    accumulated: Duration,

    ended: bool,
    pending: Vec<MediaEvent>,
}

impl RodioMedia {
    /// Open the default output device.
    pub fn open_default() -> Result<Self, MediaError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| MediaError::NoOutputDevice(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which garbles a TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            path: None,
            duration: None,
            started_at: None,
            accumulated: Duration::ZERO,
            ended: false,
            pending: Vec::new(),
        })
    }

    fn clamp(&self, pos: Duration) -> Duration {
        match self.duration {
            Some(d) => pos.min(d),
            None => pos,
        }
    }

    fn freeze_position(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.accumulated = self.clamp(self.accumulated);
    }
}

impl MediaResource for RodioMedia {
    fn load(&mut self, source: &str) -> Result<(), MediaError> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.path = None;
        self.duration = None;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.ended = false;
        self.pending.clear();

        let path = resolve_source(source)?;
        let (sink, total) = create_sink_at(&self.stream, &path, Duration::ZERO)?;
        debug!(path = %path.display(), ?total, "source loaded");

        self.sink = Some(sink);
        self.path = Some(path);
        self.duration = total;
        if let Some(d) = total {
            self.pending.push(MediaEvent::MetadataLoaded(d));
        }
        Ok(())
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.sink.is_none() {
            return Err(MediaError::NotLoaded);
        }
        if self.ended {
            // Playing a finished source starts it over.
            self.seek(Duration::ZERO)?;
        }
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
        }
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
        self.freeze_position();
    }

    fn seek(&mut self, pos: Duration) -> Result<Duration, MediaError> {
        let Some(path) = self.path.clone() else {
            return Err(MediaError::NotLoaded);
        };
        let target = self.clamp(pos);
        let playing = self.started_at.is_some();

        // Stop old sink and replace with a fresh one.
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let sink = match create_sink_at(&self.stream, &path, target) {
            Ok((sink, _)) => sink,
            Err(e) => {
                // The old sink is gone; nothing is loaded any more.
                self.freeze_position();
                self.path = None;
                return Err(e);
            }
        };
        self.ended = false;
        if playing {
            sink.play();
            self.started_at = Some(Instant::now());
        } else {
            self.started_at = None;
        }
        self.sink = Some(sink);
        self.accumulated = target;
        Ok(target)
    }

    fn position(&self) -> Duration {
        let running = self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        self.clamp(self.accumulated + running)
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        if self.started_at.is_some() {
            let drained = self.sink.as_ref().is_some_and(Sink::empty);
            if drained && !self.ended {
                self.freeze_position();
                if let Some(d) = self.duration {
                    self.accumulated = d;
                }
                self.ended = true;
                self.pending.push(MediaEvent::TimeUpdate(self.accumulated));
                self.pending.push(MediaEvent::Ended);
            } else {
                self.pending.push(MediaEvent::TimeUpdate(self.position()));
            }
        }
        std::mem::take(&mut self.pending)
    }

    fn fade_out(&mut self, over: Duration) {
        if let Some(sink) = self.sink.as_ref() {
            let fade_out_ms = over.as_millis() as u64;
            if fade_out_ms > 0 {
                let steps: u64 = 20;
                let step_ms = (fade_out_ms / steps).max(1);
                for step in 1..=steps {
                    let t = step as f32 / steps as f32;
                    sink.set_volume(1.0 - t);
                    thread::sleep(Duration::from_millis(step_ms));
                }
            }
            sink.set_volume(0.0);
            sink.stop();
        }
        self.freeze_position();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_source_accepts_paths_and_file_uris() {
        assert_eq!(
            resolve_source("/music/a.mp3").unwrap(),
            PathBuf::from("/music/a.mp3")
        );
        assert_eq!(
            resolve_source("file:///music/b.flac").unwrap(),
            PathBuf::from("/music/b.flac")
        );
        assert_eq!(resolve_source("relative.ogg").unwrap(), PathBuf::from("relative.ogg"));
    }

    #[test]
    fn resolve_source_rejects_remote_schemes_and_empty_sources() {
        assert!(matches!(
            resolve_source("https://cdn.example.com/a.mp3"),
            Err(MediaError::UnsupportedSource(_))
        ));
        assert!(matches!(
            resolve_source("  "),
            Err(MediaError::UnsupportedSource(_))
        ));
    }
}
