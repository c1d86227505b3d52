//! Application module: the browsing model the TUI renders and edits.
//!
//! `App` holds the library, cursor selection and filter. It never touches
//! audio; starting playback goes through the transport controller.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
