//! Configuration errors.

use std::{error::Error, fmt};

use crate::body::Connection;

/// An invalid tracker setup, reported when a component is constructed.
///
/// Per-frame conditions (lost detection, missing landmarks, degenerate geometry) are never
/// reported through this type. They are handled where they occur and only affect the connection
/// in question.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A moving average window of size 0 was requested.
    ZeroWindow,
    /// The list of connections to measure is empty.
    NoConnections,
    /// Joint angles were requested without any joints to measure.
    NoJoints,
    /// A joint uses a connection that is not in the list of measured connections.
    UnmeasuredJointSegment(Connection),
    /// The slope threshold is negative, NaN or infinite.
    InvalidEpsilon(f32),
    /// The zero-angle offset is NaN or infinite.
    InvalidOffset(f32),
    /// A landmark name that is not part of the pose model.
    UnknownLandmark(String),
    /// An image resolution with a zero dimension.
    InvalidResolution { width: u32, height: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroWindow => f.write_str("window size must be at least 1"),
            ConfigError::NoConnections => f.write_str("no connections configured"),
            ConfigError::NoJoints => f.write_str("no joints configured"),
            ConfigError::UnmeasuredJointSegment(conn) => {
                write!(f, "joint segment `{conn}` is not a configured connection")
            }
            ConfigError::InvalidEpsilon(eps) => {
                write!(f, "slope threshold must be finite and non-negative (got {eps})")
            }
            ConfigError::InvalidOffset(offset) => {
                write!(f, "angle offset must be finite (got {offset})")
            }
            ConfigError::UnknownLandmark(name) => write!(f, "unknown landmark `{name}`"),
            ConfigError::InvalidResolution { width, height } => {
                write!(f, "invalid resolution {width}x{height}")
            }
        }
    }
}

impl Error for ConfigError {}
