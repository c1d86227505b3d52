//! Transport controller: one media resource, a queue of tracks, and the
//! playing/position/duration/shuffle/repeat state derived from them.

mod controller;
mod media;
mod queue;
mod sink;
mod types;

pub use controller::TransportController;
pub use media::MediaResource;
pub use sink::RodioMedia;
pub use types::{
    MediaEvent, PlaybackInfo, RepeatMode, TransportContext, TransportEvent, TransportState,
};

#[cfg(test)]
pub(crate) mod fake;
