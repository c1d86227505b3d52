use std::time::Duration;

/// A single playable item. Immutable once handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Unique identifier within a list.
    pub id: String,
    pub title: String,
    /// Audio source locator (path or `file://` URI).
    pub source: String,
    /// Cover image locator.
    pub cover: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Duration hint from tags or the playlist; the transport waits for the
    /// media resource to report the real value.
    pub duration: Option<Duration>,
    /// Pre-rendered label for lists.
    pub display: String,
}
