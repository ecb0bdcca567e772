//! Frame-by-frame tracking.

use crate::{
    config::{Coordinates, TrackerConfig},
    error::ConfigError,
    extractor::{AngleExtractor, Measurement, SmoothedMeasurement},
    joint::{JointMeasurement, JointTracker},
    landmark::{Frame, FrameLandmarks},
    timer::{FpsCounter, Timer},
};

/// The measurements computed for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Zero-based index of the frame within the session.
    pub frame_index: u64,
    /// Smoothed connection measurements, in configuration order.
    pub segments: Vec<SmoothedMeasurement>,
    /// Smoothed joint angles (slope mode only).
    pub joints: Vec<JointMeasurement>,
}

impl FrameReport {
    /// Returns `true` if nothing could be measured in this frame.
    ///
    /// This happens when detection was lost or all measured landmarks were missing. It does *not*
    /// mean that all measurements are zero.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.joints.is_empty()
    }

    /// Returns the smoothed values of all measurements, segments first.
    pub fn values(&self) -> Vec<f32> {
        self.segments
            .iter()
            .map(|m| m.value)
            .chain(self.joints.iter().map(|j| j.value))
            .collect()
    }
}

/// A tracking session, processing one frame at a time.
///
/// The session owns all state that persists across frames: the per-connection moving average
/// windows, remembered slopes, frame counters and profiling timers. Frames must be passed in
/// order.
pub struct TrackingSession {
    extractor: AngleExtractor,
    joints: Option<JointTracker>,
    coordinates: Coordinates,
    resolution: [u32; 2],
    frames: u64,
    frames_lost: u64,
    t_measure: Timer,
    fps: FpsCounter,
}

impl TrackingSession {
    /// Creates a session from a validated configuration.
    pub fn new(config: &TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mode = config.measurement()?;
        let extractor = AngleExtractor::new(config.connections()?, mode, config.window_size)?;
        let joints = match mode {
            Measurement::Slope { epsilon } => Some(JointTracker::new(
                config.joints()?,
                config.window_size,
                epsilon,
            )?),
            Measurement::Angle { .. } => None,
        };

        log::debug!(
            "tracking {} connections over {} frames ({:?})",
            extractor.connections().len(),
            config.window_size,
            mode,
        );

        Ok(Self {
            extractor,
            joints,
            coordinates: config.coordinates,
            resolution: config.resolution,
            frames: 0,
            frames_lost: 0,
            t_measure: Timer::new("measure"),
            fps: FpsCounter::new("tracking"),
        })
    }

    pub fn extractor(&self) -> &AngleExtractor {
        &self.extractor
    }

    pub fn joint_tracker(&self) -> Option<&JointTracker> {
        self.joints.as_ref()
    }

    /// Returns the number of frames processed so far, including lost ones.
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    /// Returns the number of frames in which nothing was detected.
    pub fn frames_lost(&self) -> u64 {
        self.frames_lost
    }

    /// Processes the next frame.
    ///
    /// Landmarks are expected in the detector's normalized coordinates, and are converted to the
    /// configured coordinate system before measuring.
    pub fn process_frame(&mut self, frame: &Frame) -> FrameReport {
        let frame_index = self.frames;
        self.frames += 1;

        let landmarks = frame.landmarks().filter(|lms| !lms.is_empty());
        let report = match landmarks {
            Some(lms) => {
                let lms = self.convert(lms);
                let guard = self.t_measure.start();
                let segments = self.extractor.process(Some(&lms));
                let joints = match &mut self.joints {
                    Some(tracker) => tracker.process(&segments),
                    None => Vec::new(),
                };
                drop(guard);
                FrameReport {
                    frame_index,
                    segments,
                    joints,
                }
            }
            None => {
                log::debug!("frame {frame_index}: detection is lost");
                self.frames_lost += 1;
                FrameReport {
                    frame_index,
                    segments: Vec::new(),
                    joints: Vec::new(),
                }
            }
        };

        for m in &report.segments {
            log::debug!("{}\t: {}", m.connection, m.value);
        }
        for j in &report.joints {
            log::debug!("{}\t: {}", j.joint, j.value);
        }

        self.fps.tick_with([&self.t_measure]);
        report
    }

    fn convert(&self, lms: &FrameLandmarks) -> FrameLandmarks {
        let [width, height] = self.resolution;
        match self.coordinates {
            Coordinates::Normalized => lms.clone(),
            Coordinates::Pixels => lms.to_pixels(width, height),
            Coordinates::Centered => lms.centered(width, height),
        }
    }
}
