//! Segment angles, slopes and the angle between two segments.
//!
//! All angles are in degrees. Image coordinates have Y pointing *down*, so an angle measured with
//! [`segment_angle`] increases clockwise on screen.

use crate::landmark::Point;

/// Reduces `degrees` to the range `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let r = degrees.rem_euclid(360.0);
    // `rem_euclid` can round up to exactly 360.0 for tiny negative inputs.
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Computes the direction of the segment from `start` to `end`, in `[0, 360)` degrees.
///
/// 0° points along the positive X axis. A zero-length segment has an angle of 0°.
pub fn segment_angle(start: Point, end: Point) -> f32 {
    let d = end - start;
    let angle = d.y.atan2(d.x).to_degrees();
    let angle = if angle < 0.0 { angle + 360.0 } else { angle };
    normalize_degrees(angle)
}

/// Rotates angles so that 0° corresponds to a convenient reference pose.
///
/// With the default offset of 270°, a segment pointing straight up on screen (eg. an arm raised
/// above the shoulder) reads as 0°, and one pointing to the right reads as 90°.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleOffset(pub f32);

impl AngleOffset {
    pub const DEFAULT: Self = Self(270.0);
    pub const NONE: Self = Self(0.0);

    /// Subtracts the offset from `angle`, reducing the result to `[0, 360)`.
    pub fn apply(self, angle: f32) -> f32 {
        normalize_degrees(angle - self.0)
    }
}

impl Default for AngleOffset {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Computes the slope `dy / dx` of the segment from `start` to `end`.
///
/// Returns [`None`] if the segment is (nearly) vertical, ie. when `|dx| <= epsilon`.
pub fn segment_slope(start: Point, end: Point, epsilon: f32) -> Option<f32> {
    let d = end - start;
    if d.x.abs() > epsilon {
        Some(d.y / d.x)
    } else {
        None
    }
}

/// Computes the angle between two segments given their slopes, in `[0, 360)` degrees.
///
/// Uses the tangent subtraction identity `tan(a - b) = (tan a - tan b) / (1 + tan a tan b)`.
///
/// Returns [`None`] if either slope is not finite, or if the segments are (nearly) perpendicular,
/// where `|1 + s1 * s2| <= epsilon` and the identity is singular.
pub fn inter_segment_angle(s1: f32, s2: f32, epsilon: f32) -> Option<f32> {
    if !s1.is_finite() || !s2.is_finite() {
        return None;
    }
    let denom = 1.0 + s1 * s2;
    if denom.abs() <= epsilon {
        return None;
    }
    Some(normalize_degrees(((s1 - s2) / denom).atan().to_degrees()))
}
