//! encore: a terminal music player built around a queue-driven transport.

pub mod app;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod runtime;
pub mod transport;
pub mod ui;
