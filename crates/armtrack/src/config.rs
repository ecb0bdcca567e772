//! Tracker configuration.
//!
//! A [`TrackerConfig`] can be loaded from a JSON file. Every field is optional, missing fields use
//! the defaults listed on [`TrackerConfig`]. Example:
//!
//! ```json
//! {
//!     "window_size": 10,
//!     "mode": "angle",
//!     "angle_offset": 360,
//!     "connections": [["LEFT SHOULDER", "LEFT ELBOW"], ["LEFT ELBOW", "LEFT WRIST"]],
//!     "coordinates": "centered",
//!     "resolution": [640, 400]
//! }
//! ```

use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::{
    angle::AngleOffset,
    body::{Connection, Joint, LandmarkIdx, ARM_JOINTS, UPPER_BODY_CONNECTIONS},
    error::ConfigError,
    extractor::Measurement,
};

/// Which quantity to measure per connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Angle,
    Slope,
}

/// The coordinate system landmarks are converted to before measuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coordinates {
    /// Use the detector's normalized coordinates as-is.
    Normalized,
    /// Whole pixels of an image of the configured resolution.
    #[default]
    Pixels,
    /// Whole pixels, relative to the image center.
    Centered,
}

/// Settings for a [`TrackingSession`][crate::session::TrackingSession].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Number of frames to average over. Default: 5.
    pub window_size: usize,
    /// Default: [`Mode::Angle`].
    pub mode: Mode,
    /// Angle that is mapped to 0° in angle mode. Default: 270.
    pub angle_offset: f32,
    /// Segments with `|dx|` at or below this value are treated as vertical in slope mode.
    /// Default: 0.001.
    pub slope_epsilon: f32,
    /// Landmark name pairs. Default: [`UPPER_BODY_CONNECTIONS`].
    pub connections: Vec<[String; 2]>,
    /// Pairs of connections meeting at a joint, only measured in slope mode.
    /// Default: [`ARM_JOINTS`].
    pub joints: Vec<[[String; 2]; 2]>,
    /// Default: [`Coordinates::Pixels`].
    pub coordinates: Coordinates,
    /// Image `[width, height]` for pixel conversion. Default: 640x400.
    pub resolution: [u32; 2],
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            mode: Mode::default(),
            angle_offset: AngleOffset::DEFAULT.0,
            slope_epsilon: Measurement::DEFAULT_SLOPE_EPSILON,
            connections: UPPER_BODY_CONNECTIONS.iter().map(connection_names).collect(),
            joints: ARM_JOINTS
                .iter()
                .map(|j| [connection_names(&j.first), connection_names(&j.second)])
                .collect(),
            coordinates: Coordinates::default(),
            resolution: [640, 400],
        }
    }
}

fn connection_names(c: &Connection) -> [String; 2] {
    [c.start.name().to_string(), c.end.name().to_string()]
}

fn parse_connection([start, end]: &[String; 2]) -> Result<Connection, ConfigError> {
    Ok(Connection::new(
        start.parse::<LandmarkIdx>()?,
        end.parse::<LandmarkIdx>()?,
    ))
}

impl TrackerConfig {
    /// Loads a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config = Self::from_json(&json)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
        log::debug!("loaded config from '{}': {:?}", path.display(), config);
        Ok(config)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a usable tracker.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        let [width, height] = self.resolution;
        if self.coordinates != Coordinates::Normalized && (width == 0 || height == 0) {
            return Err(ConfigError::InvalidResolution { width, height });
        }
        self.measurement()?;
        let connections = self.connections()?;
        if connections.is_empty() {
            return Err(ConfigError::NoConnections);
        }
        if self.mode == Mode::Slope {
            let joints = self.joints()?;
            if joints.is_empty() {
                return Err(ConfigError::NoJoints);
            }
            // Joint angles are computed from the slopes of measured connections only.
            if let Some(conn) = joints
                .iter()
                .flat_map(|j| [j.first, j.second])
                .find(|conn| !connections.contains(conn))
            {
                return Err(ConfigError::UnmeasuredJointSegment(conn));
            }
        }
        Ok(())
    }

    /// Returns the measurement mode with its parameter.
    pub fn measurement(&self) -> Result<Measurement, ConfigError> {
        let measurement = match self.mode {
            Mode::Angle => Measurement::Angle {
                offset: AngleOffset(self.angle_offset),
            },
            Mode::Slope => Measurement::Slope {
                epsilon: self.slope_epsilon,
            },
        };
        measurement.validate()?;
        Ok(measurement)
    }

    /// Resolves the configured connections.
    pub fn connections(&self) -> Result<Vec<Connection>, ConfigError> {
        self.connections.iter().map(parse_connection).collect()
    }

    /// Resolves the configured joints.
    pub fn joints(&self) -> Result<Vec<Joint>, ConfigError> {
        self.joints
            .iter()
            .map(|[first, second]| {
                Ok(Joint::new(
                    parse_connection(first)?,
                    parse_connection(second)?,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TrackerConfig::from_json("{}").unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.window_size, 5);
        assert_eq!(config.connections().unwrap(), UPPER_BODY_CONNECTIONS);
        assert_eq!(config.joints().unwrap(), ARM_JOINTS);
        assert_eq!(
            config.measurement().unwrap(),
            Measurement::Angle {
                offset: AngleOffset(270.0)
            }
        );
    }

    #[test]
    fn parse() {
        let config = TrackerConfig::from_json(
            r#"{
                "window_size": 10,
                "mode": "slope",
                "slope_epsilon": 0.5,
                "connections": [["11", "left_elbow"], ["left_elbow", "15"]],
                "joints": [[["LEFT SHOULDER", "LEFT ELBOW"], ["LEFT ELBOW", "LEFT WRIST"]]],
                "coordinates": "centered",
                "resolution": [900, 600]
            }"#,
        )
        .unwrap();
        assert_eq!(config.window_size, 10);
        assert_eq!(config.coordinates, Coordinates::Centered);
        assert_eq!(config.resolution, [900, 600]);
        assert_eq!(
            config.connections().unwrap(),
            [ARM_JOINTS[0].first, ARM_JOINTS[0].second]
        );
        assert_eq!(config.joints().unwrap(), &ARM_JOINTS[..1]);
        assert_eq!(
            config.measurement().unwrap(),
            Measurement::Slope { epsilon: 0.5 }
        );
    }

    #[test]
    fn joint_segments_must_be_measured() {
        let config = TrackerConfig {
            mode: Mode::Slope,
            connections: vec![["LEFT SHOULDER".into(), "RIGHT SHOULDER".into()]],
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnmeasuredJointSegment(Connection::new(
                LandmarkIdx::LeftShoulder,
                LandmarkIdx::LeftElbow
            )))
        );

        let config = TrackerConfig {
            mode: Mode::Slope,
            connections: vec![
                ["LEFT SHOULDER".into(), "LEFT ELBOW".into()],
                ["LEFT ELBOW".into(), "LEFT WRIST".into()],
            ],
            joints: vec![[
                ["LEFT SHOULDER".into(), "LEFT ELBOW".into()],
                ["LEFT ELBOW".into(), "LEFT WRIST".into()],
            ]],
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn invalid() {
        assert!(TrackerConfig::from_json(r#"{"window_size": 0}"#).is_err());
        assert!(TrackerConfig::from_json(r#"{"connections": []}"#).is_err());
        assert!(TrackerConfig::from_json(r#"{"connections": [["NOSE", "TAIL"]]}"#).is_err());
        assert!(TrackerConfig::from_json(r#"{"resolution": [0, 400]}"#).is_err());
        assert!(TrackerConfig::from_json(r#"{"mode": "slope", "joints": []}"#).is_err());
        assert!(TrackerConfig::from_json(r#"{"mode": "slope", "slope_epsilon": -1}"#).is_err());
        assert!(TrackerConfig::from_json(r#"{"frobnicate": true}"#).is_err());

        let config = TrackerConfig {
            connections: vec![],
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoConnections));

        let config = TrackerConfig {
            angle_offset: f32::INFINITY,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidOffset(f32::INFINITY))
        );
        let config = TrackerConfig {
            mode: Mode::Slope,
            slope_epsilon: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.measurement(),
            Err(ConfigError::InvalidEpsilon(eps)) if eps.is_nan()
        ));

        // Joints are ignored in angle mode.
        assert!(
            TrackerConfig::from_json(r#"{"connections": [["LEFT SHOULDER", "RIGHT SHOULDER"]]}"#)
                .is_ok()
        );
        assert!(TrackerConfig::from_json(r#"{"joints": []}"#).is_ok());
        // Resolution is ignored for normalized coordinates.
        assert!(
            TrackerConfig::from_json(r#"{"coordinates": "normalized", "resolution": [0, 0]}"#)
                .is_ok()
        );
    }
}
