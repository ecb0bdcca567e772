//! Replays recorded pose landmarks and prints the smoothed measurements.
//!
//! Every frame produces one line on stdout holding its values separated by tabs. Lost frames
//! produce an empty line.
//!
//! Usage: `armtrack <landmarks.jsonl> [config.json]`

use std::io::{self, BufWriter};

use anyhow::Context;
use armtrack::{
    config::TrackerConfig,
    landmark::Frame,
    session::TrackingSession,
    source::{LandmarkSource, ReplaySource},
    transmit::LineSink,
};

fn main() -> anyhow::Result<()> {
    armtrack::init_logger!();

    let mut args = std::env::args_os().skip(1);
    let Some(landmarks) = args.next() else {
        eprintln!("usage: armtrack <landmarks.jsonl> [config.json]");
        std::process::exit(1);
    };
    let config = match args.next() {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };

    let mut source = ReplaySource::open(&landmarks)?;
    let mut session = TrackingSession::new(&config)?;
    let mut sink = LineSink::new(BufWriter::new(io::stdout().lock()));

    loop {
        let frame = match source.read() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) if e.is::<io::Error>() => return Err(e),
            Err(e) => {
                log::warn!("{e:#}");
                Frame::Lost
            }
        };

        let report = session.process_frame(&frame);
        sink.send_record(&report.values())
            .context("failed to write measurements")?;
    }
    sink.flush()?;

    log::info!(
        "processed {} frames ({} without detection), wrote {} values",
        session.frames_processed(),
        session.frames_lost(),
        sink.sent(),
    );
    Ok(())
}
