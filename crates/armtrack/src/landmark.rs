//! Per-frame landmark positions.

use std::fmt;

use nalgebra::Point2;

use crate::body::LandmarkIdx;

/// A 2D landmark position, in normalized or pixel image coordinates.
pub type Point = Point2<f32>;

/// The landmarks detected in a single frame.
///
/// Detectors do not report every landmark in every frame, so each landmark may be absent.
#[derive(Clone, PartialEq)]
pub struct FrameLandmarks {
    positions: [Option<Point>; LandmarkIdx::COUNT],
}

impl Default for FrameLandmarks {
    fn default() -> Self {
        Self {
            positions: [None; LandmarkIdx::COUNT],
        }
    }
}

impl FrameLandmarks {
    /// Creates an empty set of landmarks.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, landmark: LandmarkIdx) -> Option<Point> {
        self.positions[landmark.index()]
    }

    #[inline]
    pub fn contains(&self, landmark: LandmarkIdx) -> bool {
        self.positions[landmark.index()].is_some()
    }

    pub fn set(&mut self, landmark: LandmarkIdx, position: Point) {
        self.positions[landmark.index()] = Some(position);
    }

    /// Builder-style variant of [`FrameLandmarks::set`].
    pub fn with(mut self, landmark: LandmarkIdx, x: f32, y: f32) -> Self {
        self.set(landmark, Point::new(x, y));
        self
    }

    pub fn remove(&mut self, landmark: LandmarkIdx) -> Option<Point> {
        self.positions[landmark.index()].take()
    }

    /// Returns the number of landmarks present.
    pub fn len(&self) -> usize {
        self.positions.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.iter().all(Option::is_none)
    }

    /// Iterates over the present landmarks in index order.
    pub fn iter(&self) -> impl Iterator<Item = (LandmarkIdx, Point)> + '_ {
        LandmarkIdx::ALL
            .into_iter()
            .zip(&self.positions)
            .filter_map(|(lm, pos)| pos.map(|pos| (lm, pos)))
    }

    pub fn map_positions(&mut self, mut f: impl FnMut(Point) -> Point) {
        for pos in self.positions.iter_mut().flatten() {
            *pos = f(*pos);
        }
    }

    /// Converts normalized coordinates (0.0 to 1.0) to whole pixels in a `width`x`height` image.
    ///
    /// Coordinates are truncated towards zero, like the pixel positions used for drawing.
    pub fn to_pixels(&self, width: u32, height: u32) -> Self {
        let mut out = self.clone();
        out.map_positions(|p| {
            Point::new(
                (p.x * width as f32).trunc(),
                (p.y * height as f32).trunc(),
            )
        });
        out
    }

    /// Converts normalized coordinates to pixels relative to the center of a `width`x`height`
    /// image.
    ///
    /// The center is at (`width / 2`, `height / 2`), using integer division.
    pub fn centered(&self, width: u32, height: u32) -> Self {
        let (cx, cy) = ((width / 2) as f32, (height / 2) as f32);
        let mut out = self.to_pixels(width, height);
        out.map_positions(|p| Point::new(p.x - cx, p.y - cy));
        out
    }
}

impl fmt::Debug for FrameLandmarks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(lm, p)| (lm.name(), [p.x, p.y])))
            .finish()
    }
}

impl FromIterator<(LandmarkIdx, Point)> for FrameLandmarks {
    fn from_iter<T: IntoIterator<Item = (LandmarkIdx, Point)>>(iter: T) -> Self {
        let mut landmarks = Self::new();
        for (lm, pos) in iter {
            landmarks.set(lm, pos);
        }
        landmarks
    }
}

/// A frame delivered by a landmark detector.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// The detector found a pose. Some landmarks may still be missing.
    Landmarks(FrameLandmarks),
    /// No pose was detected, or the frame could not be processed.
    Lost,
}

impl Frame {
    pub fn landmarks(&self) -> Option<&FrameLandmarks> {
        match self {
            Frame::Landmarks(lms) => Some(lms),
            Frame::Lost => None,
        }
    }
}

impl From<Option<FrameLandmarks>> for Frame {
    fn from(lms: Option<FrameLandmarks>) -> Self {
        match lms {
            Some(lms) => Frame::Landmarks(lms),
            None => Frame::Lost,
        }
    }
}
