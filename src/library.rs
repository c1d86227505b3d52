//! Track descriptors and the places lists of them come from: directory
//! scans and TOML playlist files.

mod display;
mod model;
mod playlist;
mod scan;

pub use display::{display_from_fields, format_time};
pub use model::Track;
pub use playlist::{load_playlist, parse_playlist};
pub use scan::scan;
