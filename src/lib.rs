//! qrscan library crate.
//!
//! Live QR scanning pipeline: camera frames are read on a background thread,
//! detected and decoded with an external vision library, deduplicated, and
//! published to a presenter together with an overlay-annotated frame.

pub mod camera;
pub mod clipboard;
pub mod config;
pub mod dedup;
pub mod detect;
pub mod overlay;
pub mod presenter;
pub mod record;
pub mod scanner;
pub mod session;
