//! Forwarding smoothed values to a line-based consumer, such as a microcontroller on a serial
//! link.
//!
//! Two line formats are supported. [`LineSink::send`] writes one decimal value per line, which is
//! what simple serial consumers expect. [`LineSink::send_record`] writes all values of a frame on
//! one tab-separated line, so frame boundaries survive.

use std::io::{self, Write};

use itertools::Itertools;

/// Writes values to `W`, one per line.
///
/// A serial port can be used by opening its device file (eg. `/dev/ttyUSB0`) and passing the
/// [`File`][std::fs::File] here. Port settings such as the baud rate have to be configured
/// beforehand.
pub struct LineSink<W: Write> {
    writer: W,
    sent: u64,
}

impl<W: Write> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, sent: 0 }
    }

    /// Writes every value in `values` on its own line.
    ///
    /// Frame boundaries are not marked. Since connections can be skipped in any frame, a consumer
    /// of this format cannot tell which connection a value belongs to unless all connections are
    /// always measured.
    pub fn send(&mut self, values: &[f32]) -> io::Result<()> {
        for value in values {
            writeln!(self.writer, "{value}")?;
        }
        self.sent += values.len() as u64;
        Ok(())
    }

    /// Writes all of `values` on a single line, separated by tabs.
    ///
    /// An empty slice writes an empty line, so every frame produces exactly one line.
    pub fn send_record(&mut self, values: &[f32]) -> io::Result<()> {
        writeln!(self.writer, "{}", values.iter().format("\t"))?;
        self.sent += values.len() as u64;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Returns the number of values written so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
