//! Per-connection measurement and smoothing.

use crate::{
    angle::{segment_angle, segment_slope, AngleOffset},
    body::Connection,
    error::ConfigError,
    filter::WindowedAverage,
    landmark::{FrameLandmarks, Point},
};

/// The quantity measured for each connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// Direction of the segment in `[0, 360)` degrees, rotated by the given offset.
    Angle { offset: AngleOffset },
    /// Slope `dy / dx` of the segment.
    ///
    /// If `|dx| <= epsilon`, the segment is considered vertical and the last slope computed for the
    /// connection is reused instead.
    Slope { epsilon: f32 },
}

impl Measurement {
    pub const DEFAULT_SLOPE_EPSILON: f32 = 1e-3;

    /// Checks that the mode's parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Measurement::Angle { offset } if !offset.0.is_finite() => {
                Err(ConfigError::InvalidOffset(offset.0))
            }
            Measurement::Slope { epsilon } if !(epsilon.is_finite() && epsilon >= 0.0) => {
                Err(ConfigError::InvalidEpsilon(epsilon))
            }
            _ => Ok(()),
        }
    }
}

impl Default for Measurement {
    fn default() -> Self {
        Measurement::Angle {
            offset: AngleOffset::DEFAULT,
        }
    }
}

/// A smoothed measurement of one connection in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedMeasurement {
    pub connection: Connection,
    /// The unfiltered measurement of this frame.
    pub raw: f32,
    /// Mean of the connection's moving average window, including `raw`.
    pub value: f32,
}

/// State owned by each connection. Never shared between connections.
struct Channel {
    connection: Connection,
    filter: WindowedAverage,
    last_slope: Option<f32>,
}

/// Computes a smoothed measurement for each of a fixed list of [`Connection`]s.
///
/// Every connection gets its own moving average window, so measurements of different connections
/// never mix.
pub struct AngleExtractor {
    channels: Vec<Channel>,
    mode: Measurement,
}

impl AngleExtractor {
    /// Creates an extractor that smooths measurements of `connections` over the last
    /// `window_size` frames.
    ///
    /// Fails if `connections` is empty, `window_size` is 0, or `mode` has a non-finite parameter.
    pub fn new(
        connections: impl IntoIterator<Item = Connection>,
        mode: Measurement,
        window_size: usize,
    ) -> Result<Self, ConfigError> {
        mode.validate()?;
        let channels = connections
            .into_iter()
            .map(|connection| {
                Ok(Channel {
                    connection,
                    filter: WindowedAverage::with_window(window_size)?,
                    last_slope: None,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        if channels.is_empty() {
            return Err(ConfigError::NoConnections);
        }

        Ok(Self { channels, mode })
    }

    pub fn mode(&self) -> Measurement {
        self.mode
    }

    pub fn connections(&self) -> impl ExactSizeIterator<Item = Connection> + '_ {
        self.channels.iter().map(|ch| ch.connection)
    }

    /// Returns the moving average window of the `index`th connection.
    pub fn filter(&self, index: usize) -> Option<&WindowedAverage> {
        self.channels.get(index).map(|ch| &ch.filter)
    }

    /// Clears all moving average windows and remembered slopes.
    pub fn reset(&mut self) {
        for ch in &mut self.channels {
            ch.filter.reset();
            ch.last_slope = None;
        }
    }

    /// Measures all connections in `frame`.
    ///
    /// Returns one [`SmoothedMeasurement`] per measured connection, in configuration order.
    /// Connections with a missing endpoint are skipped for this frame and their window is left
    /// untouched.
    ///
    /// If `frame` is [`None`] or contains no landmarks, an empty list is returned and no window
    /// is modified. An empty list means "no measurement", not zero.
    pub fn process(&mut self, frame: Option<&FrameLandmarks>) -> Vec<SmoothedMeasurement> {
        let Some(frame) = frame.filter(|f| !f.is_empty()) else {
            return Vec::new();
        };

        let mode = self.mode;
        self.channels
            .iter_mut()
            .filter_map(|ch| ch.measure(mode, frame))
            .collect()
    }
}

impl Channel {
    fn measure(
        &mut self,
        mode: Measurement,
        frame: &FrameLandmarks,
    ) -> Option<SmoothedMeasurement> {
        let (Some(start), Some(end)) = (
            frame.get(self.connection.start),
            frame.get(self.connection.end),
        ) else {
            log::trace!("{}: landmark missing, skipping", self.connection);
            return None;
        };

        let raw = self.raw_measurement(mode, start, end)?;
        self.filter.add_value(raw);
        Some(SmoothedMeasurement {
            connection: self.connection,
            raw,
            value: self.filter.get_filtered_value(),
        })
    }

    fn raw_measurement(&mut self, mode: Measurement, start: Point, end: Point) -> Option<f32> {
        match mode {
            Measurement::Angle { offset } => Some(offset.apply(segment_angle(start, end))),
            Measurement::Slope { epsilon } => match segment_slope(start, end, epsilon) {
                Some(slope) => {
                    self.last_slope = Some(slope);
                    Some(slope)
                }
                None => {
                    log::trace!(
                        "{}: vertical segment, reusing slope {:?}",
                        self.connection,
                        self.last_slope,
                    );
                    self.last_slope
                }
            },
        }
    }
}
