//! Smoothed joint angles from body pose landmarks.
//!
//! Landmark detection is done elsewhere (eg. by a MediaPipe pose model). This crate takes the
//! detected 2D landmarks of every frame, measures the direction or slope of a fixed set of
//! skeleton [connections][body::Connection], and smooths every measurement with its own
//! [moving average][filter::MovingAvg].
//!
//! The main entry point is [`TrackingSession`][session::TrackingSession], which is fed one
//! [`Frame`][landmark::Frame] at a time.
//!
//! # Coordinates
//!
//! Landmark coordinates use the image coordinate system: X points to the right, Y points *down*.
//! Angles therefore increase clockwise on screen.
//!
//! # Environment Variables
//!
//! * `RUST_LOG`: overrides the log levels set by [`init_logger!`].

use log::LevelFilter;

pub mod angle;
pub mod body;
pub mod config;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod joint;
pub mod landmark;
pub mod session;
pub mod source;
pub mod timer;
pub mod transmit;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and armtrack will log at *trace*
/// level. Otherwise, they will log at *debug* level.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
