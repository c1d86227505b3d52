use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::library::Track;

use super::media::MediaResource;
use super::queue::{next_position, position_of, previous_position};
use super::types::{
    MediaEvent, PlaybackInfo, RepeatMode, TransportContext, TransportEvent, TransportState,
};

/// Owns the media resource, the queue and the derived transport state.
///
/// Commands never fail: anything the resource refuses is logged and leaves
/// the controller in a not-playing state with queue and position intact.
pub struct TransportController<M: MediaResource> {
    media: M,
    queue: Vec<Track>,
    index: Option<usize>,
    playing: bool,
    /// Whether the current track's source loaded successfully.
    loaded: bool,
    position: Duration,
    duration: Option<Duration>,
    shuffle: bool,
    repeat: RepeatMode,
    gesture_required: bool,
    gesture_granted: bool,
    restart_threshold: Duration,
    rng: StdRng,
    subscribers: Vec<Sender<TransportEvent>>,
}

impl<M: MediaResource> TransportController<M> {
    pub fn new(media: M, ctx: TransportContext) -> Self {
        Self::with_rng(media, ctx, StdRng::from_entropy())
    }

    /// Like `new`, with a caller-supplied RNG for shuffle picks.
    pub fn with_rng(media: M, ctx: TransportContext, rng: StdRng) -> Self {
        Self {
            media,
            queue: Vec::new(),
            index: None,
            playing: false,
            loaded: false,
            position: Duration::ZERO,
            duration: None,
            shuffle: ctx.shuffle,
            repeat: ctx.repeat,
            gesture_required: ctx.gesture_required,
            gesture_granted: false,
            restart_threshold: ctx.restart_threshold,
            rng,
            subscribers: Vec::new(),
        }
    }

    /// Register an observer. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<TransportEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Record that the user has interacted, which lets audio start.
    pub fn grant_user_gesture(&mut self) {
        if !self.gesture_granted {
            debug!("user gesture granted");
        }
        self.gesture_granted = true;
    }

    fn gate_open(&self) -> bool {
        !self.gesture_required || self.gesture_granted
    }

    /// Play `track`. A non-empty `queue` replaces the current one; otherwise
    /// `track` is looked up in the existing queue, and a single-entry queue
    /// is installed when it is not there.
    pub fn play(&mut self, track: &Track, queue: Option<Vec<Track>>) {
        if !self.gate_open() {
            debug!(id = %track.id, "play ignored: no user gesture yet");
            return;
        }

        let index = match queue.filter(|q| !q.is_empty()) {
            Some(q) => {
                let i = position_of(&q, &track.id).unwrap_or(0);
                self.queue = q;
                i
            }
            None => match position_of(&self.queue, &track.id) {
                Some(i) => i,
                None => {
                    self.queue = vec![track.clone()];
                    0
                }
            },
        };
        self.start_at(index);
    }

    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.media.pause();
        let pos = self.media.position();
        self.set_position(pos);
        self.set_playing(false);
    }

    /// Continue from the current position. Retries the load when the
    /// current track's source failed earlier.
    pub fn resume(&mut self) {
        let Some(i) = self.index else {
            return;
        };
        if self.playing || !self.gate_open() {
            return;
        }
        if !self.loaded {
            self.start_at(i);
            return;
        }
        let started = self.start_media();
        self.set_playing(started);
    }

    pub fn toggle_play(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Move within the current track. The resource clamps to its bounds.
    pub fn seek(&mut self, pos: Duration) {
        if self.index.is_none() {
            return;
        }
        match self.media.seek(pos) {
            Ok(actual) => self.set_position(actual),
            Err(e) => {
                warn!(error = %e, ?pos, "seek failed, playback stopped");
                self.unload();
            }
        }
    }

    /// Advance per the shuffle/repeat policy, stopping when the queue is
    /// exhausted.
    pub fn next(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        match next_position(
            self.queue.len(),
            self.index,
            self.shuffle,
            self.repeat,
            &mut self.rng,
        ) {
            Some(i) => self.start_at(i),
            None => {
                debug!("queue exhausted");
                self.media.pause();
                let pos = self.media.position();
                self.set_position(pos);
                self.set_playing(false);
            }
        }
    }

    /// Restart the current track when past the restart threshold or at the
    /// head of a non-wrapping queue; otherwise step back one entry.
    pub fn previous(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        if self.index.is_some() && self.position > self.restart_threshold {
            self.restart();
            return;
        }
        match previous_position(self.queue.len(), self.index, self.repeat) {
            Some(i) => self.start_at(i),
            None => self.restart(),
        }
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.emit(TransportEvent::ShuffleChanged(self.shuffle));
        self.shuffle
    }

    /// Step the repeat mode through `Off -> All -> One -> Off`.
    pub fn toggle_repeat(&mut self) -> RepeatMode {
        self.set_repeat(self.repeat.cycled());
        self.repeat
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        if self.repeat != mode {
            self.repeat = mode;
            self.emit(TransportEvent::RepeatChanged(mode));
        }
    }

    /// Apply one notification from the media resource.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if self.index.is_none() {
            return;
        }
        match event {
            MediaEvent::MetadataLoaded(d) => {
                if self.duration != Some(d) {
                    self.duration = Some(d);
                    self.emit(TransportEvent::DurationChanged(Some(d)));
                }
            }
            MediaEvent::TimeUpdate(p) => self.set_position(p),
            MediaEvent::Ended => self.on_track_ended(),
            MediaEvent::Error(e) => {
                warn!(error = %e, "media error, playback stopped");
                self.unload();
            }
        }
    }

    /// Drain and apply everything the media resource has reported.
    pub fn pump(&mut self) {
        for event in self.media.poll_events() {
            self.handle_media_event(event);
        }
    }

    /// Fade out and stop. The queue stays as it is.
    pub fn shutdown(&mut self, fade_out: Duration) {
        self.media.fade_out(fade_out);
        self.set_playing(false);
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.index.and_then(|i| self.queue.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn state(&self) -> TransportState {
        if self.queue.is_empty() {
            TransportState::Idle
        } else if self.playing {
            TransportState::Playing
        } else {
            TransportState::Paused
        }
    }

    pub fn snapshot(&self) -> PlaybackInfo {
        PlaybackInfo {
            index: self.index,
            elapsed: self.position,
            duration: self.duration,
            playing: self.playing,
            shuffle: self.shuffle,
            repeat: self.repeat,
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    #[cfg(test)]
    pub(crate) fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    fn on_track_ended(&mut self) {
        if self.repeat != RepeatMode::One {
            self.next();
            return;
        }

        debug!("repeat-one: restarting track");
        if let Err(e) = self.media.seek(Duration::ZERO) {
            warn!(error = %e, "could not restart track");
            self.unload();
            return;
        }
        self.set_position(Duration::ZERO);
        let started = self.start_media();
        self.set_playing(started);
    }

    fn restart(&mut self) {
        let Some(i) = self.index else {
            return;
        };
        if !self.loaded {
            self.start_at(i);
            return;
        }
        match self.media.seek(Duration::ZERO) {
            Ok(actual) => self.set_position(actual),
            Err(e) => {
                warn!(error = %e, "restart failed, playback stopped");
                self.unload();
            }
        }
    }

    /// Make queue entry `i` current, load it and start it.
    fn start_at(&mut self, i: usize) {
        let Some(track) = self.queue.get(i) else {
            return;
        };
        let source = track.source.clone();
        info!(index = i, id = %track.id, title = %track.title, "starting track");

        self.index = Some(i);
        self.position = Duration::ZERO;
        self.duration = None;
        self.emit(TransportEvent::TrackChanged(Some(i)));
        self.emit(TransportEvent::PositionChanged(Duration::ZERO));
        self.emit(TransportEvent::DurationChanged(None));

        self.loaded = match self.media.load(&source) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, %source, "cannot load track");
                false
            }
        };
        let started = self.loaded && self.start_media();
        self.set_playing(started);
    }

    /// The resource lost its source. The next `resume` reloads it.
    fn unload(&mut self) {
        self.loaded = false;
        self.set_playing(false);
    }

    fn start_media(&mut self) -> bool {
        match self.media.play() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "playback did not start");
                false
            }
        }
    }

    fn set_playing(&mut self, playing: bool) {
        if self.playing != playing {
            self.playing = playing;
            self.emit(TransportEvent::PlayingChanged(playing));
        }
    }

    fn set_position(&mut self, pos: Duration) {
        if self.position != pos {
            self.position = pos;
            self.emit(TransportEvent::PositionChanged(pos));
        }
    }

    fn emit(&mut self, event: TransportEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
