//! Angles between adjacent segments, derived from their slopes.

use crate::{
    angle::inter_segment_angle,
    body::{Connection, Joint},
    error::ConfigError,
    extractor::{Measurement, SmoothedMeasurement},
    filter::WindowedAverage,
};

/// A smoothed joint angle in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointMeasurement {
    pub joint: Joint,
    pub raw: f32,
    pub value: f32,
}

/// Tracks the angle at each of a list of [`Joint`]s.
///
/// Joint angles are computed from the *raw* slopes measured by an
/// [`AngleExtractor`][crate::extractor::AngleExtractor] in slope mode, and smoothed with one moving
/// average window per joint.
///
/// When the two segments of a joint are (nearly) perpendicular, the angle cannot be computed from
/// their slopes. The joint is then skipped for that frame and its window is left untouched.
pub struct JointTracker {
    joints: Vec<(Joint, WindowedAverage)>,
    epsilon: f32,
}

impl JointTracker {
    /// Creates a tracker for `joints`.
    ///
    /// `epsilon` is the tolerance used to detect perpendicular segments, see
    /// [`inter_segment_angle`].
    pub fn new(
        joints: impl IntoIterator<Item = Joint>,
        window_size: usize,
        epsilon: f32,
    ) -> Result<Self, ConfigError> {
        Measurement::Slope { epsilon }.validate()?;
        let joints = joints
            .into_iter()
            .map(|joint| Ok((joint, WindowedAverage::with_window(window_size)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        if joints.is_empty() {
            return Err(ConfigError::NoJoints);
        }

        Ok(Self { joints, epsilon })
    }

    pub fn joints(&self) -> impl ExactSizeIterator<Item = Joint> + '_ {
        self.joints.iter().map(|(joint, _)| *joint)
    }

    pub fn filter(&self, index: usize) -> Option<&WindowedAverage> {
        self.joints.get(index).map(|(_, filter)| filter)
    }

    pub fn reset(&mut self) {
        for (_, filter) in &mut self.joints {
            filter.reset();
        }
    }

    /// Computes the joint angles from a frame's slope measurements.
    ///
    /// Joints for which either segment was not measured in this frame are skipped.
    pub fn process(&mut self, slopes: &[SmoothedMeasurement]) -> Vec<JointMeasurement> {
        let slope_of = |conn: Connection| {
            slopes
                .iter()
                .find(|m| m.connection == conn)
                .map(|m| m.raw)
        };

        let mut out = Vec::new();
        for (joint, filter) in &mut self.joints {
            let (Some(s1), Some(s2)) = (slope_of(joint.first), slope_of(joint.second)) else {
                continue;
            };
            let Some(raw) = inter_segment_angle(s1, s2, self.epsilon) else {
                log::trace!("{joint}: perpendicular segments, skipping");
                continue;
            };
            filter.add_value(raw);
            out.push(JointMeasurement {
                joint: *joint,
                raw,
                value: filter.get_filtered_value(),
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::body::{LandmarkIdx, LandmarkIdx::*, ARM_JOINTS};

    fn slope(start: LandmarkIdx, end: LandmarkIdx, raw: f32) -> SmoothedMeasurement {
        SmoothedMeasurement {
            connection: Connection::new(start, end),
            raw,
            value: raw,
        }
    }

    #[test]
    fn elbow_angle() {
        let mut tracker = JointTracker::new(ARM_JOINTS.iter().copied(), 3, 1e-3).unwrap();
        let out = tracker.process(&[
            slope(LeftShoulder, LeftElbow, 1.0),
            slope(LeftElbow, LeftWrist, 0.0),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].joint, ARM_JOINTS[0]);
        assert_abs_diff_eq!(out[0].value, 45.0, epsilon = 1e-4);
        assert!(tracker.filter(1).unwrap().is_empty());
    }

    #[test]
    fn perpendicular_segments_are_skipped() {
        let mut tracker = JointTracker::new(ARM_JOINTS.iter().copied(), 3, 1e-3).unwrap();
        let out = tracker.process(&[
            slope(LeftShoulder, LeftElbow, 2.0),
            slope(LeftElbow, LeftWrist, -0.5),
            slope(RightShoulder, RightElbow, 0.5),
            slope(RightElbow, RightWrist, 0.5),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].joint, ARM_JOINTS[1]);
        assert_eq!(out[0].value, 0.0);
        assert!(tracker.filter(0).unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_configuration() {
        assert_eq!(
            JointTracker::new([], 3, 1e-3).err(),
            Some(ConfigError::NoJoints)
        );
        assert_eq!(
            JointTracker::new(ARM_JOINTS.iter().copied(), 0, 1e-3).err(),
            Some(ConfigError::ZeroWindow)
        );
        assert!(JointTracker::new(ARM_JOINTS.iter().copied(), 3, f32::NAN).is_err());
    }
}
