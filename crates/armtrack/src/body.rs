//! Body pose landmark labels and the skeleton connections measured between them.

use std::{fmt, str::FromStr};

use crate::error::ConfigError;

/// The landmarks output by the MediaPipe pose model, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LandmarkIdx {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIdx {
    pub const COUNT: usize = 33;

    /// All landmarks, in index order.
    pub const ALL: [LandmarkIdx; Self::COUNT] = {
        use LandmarkIdx::*;
        [
            Nose,
            LeftEyeInner,
            LeftEye,
            LeftEyeOuter,
            RightEyeInner,
            RightEye,
            RightEyeOuter,
            LeftEar,
            RightEar,
            MouthLeft,
            MouthRight,
            LeftShoulder,
            RightShoulder,
            LeftElbow,
            RightElbow,
            LeftWrist,
            RightWrist,
            LeftPinky,
            RightPinky,
            LeftIndex,
            RightIndex,
            LeftThumb,
            RightThumb,
            LeftHip,
            RightHip,
            LeftKnee,
            RightKnee,
            LeftAnkle,
            RightAnkle,
            LeftHeel,
            RightHeel,
            LeftFootIndex,
            RightFootIndex,
        ]
    };

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the upper-case display name, eg. `LEFT SHOULDER`.
    pub fn name(self) -> &'static str {
        use LandmarkIdx::*;
        match self {
            Nose => "NOSE",
            LeftEyeInner => "LEFT EYE INNER",
            LeftEye => "LEFT EYE",
            LeftEyeOuter => "LEFT EYE OUTER",
            RightEyeInner => "RIGHT EYE INNER",
            RightEye => "RIGHT EYE",
            RightEyeOuter => "RIGHT EYE OUTER",
            LeftEar => "LEFT EAR",
            RightEar => "RIGHT EAR",
            MouthLeft => "MOUTH LEFT",
            MouthRight => "MOUTH RIGHT",
            LeftShoulder => "LEFT SHOULDER",
            RightShoulder => "RIGHT SHOULDER",
            LeftElbow => "LEFT ELBOW",
            RightElbow => "RIGHT ELBOW",
            LeftWrist => "LEFT WRIST",
            RightWrist => "RIGHT WRIST",
            LeftPinky => "LEFT PINKY",
            RightPinky => "RIGHT PINKY",
            LeftIndex => "LEFT INDEX",
            RightIndex => "RIGHT INDEX",
            LeftThumb => "LEFT THUMB",
            RightThumb => "RIGHT THUMB",
            LeftHip => "LEFT HIP",
            RightHip => "RIGHT HIP",
            LeftKnee => "LEFT KNEE",
            RightKnee => "RIGHT KNEE",
            LeftAnkle => "LEFT ANKLE",
            RightAnkle => "RIGHT ANKLE",
            LeftHeel => "LEFT HEEL",
            RightHeel => "RIGHT HEEL",
            LeftFootIndex => "LEFT FOOT INDEX",
            RightFootIndex => "RIGHT FOOT INDEX",
        }
    }
}

impl fmt::Display for LandmarkIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a landmark from its display name or its numeric index.
///
/// Names are matched case-insensitively, and `_` may be used instead of spaces, so
/// `LEFT SHOULDER`, `left_shoulder` and `11` all refer to [`LandmarkIdx::LeftShoulder`].
impl FromStr for LandmarkIdx {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Self::from_index(index).ok_or_else(|| ConfigError::UnknownLandmark(s.into()));
        }

        let normalized = s.replace('_', " ").to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|lm| lm.name() == normalized)
            .ok_or_else(|| ConfigError::UnknownLandmark(s.into()))
    }
}

/// A "bone" between two landmarks, measured from `start` towards `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub start: LandmarkIdx,
    pub end: LandmarkIdx,
}

impl Connection {
    pub const fn new(start: LandmarkIdx, end: LandmarkIdx) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Two connections meeting at a joint, whose relative angle is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Joint {
    pub first: Connection,
    pub second: Connection,
}

impl Joint {
    pub const fn new(first: Connection, second: Connection) -> Self {
        Self { first, second }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.first, self.second)
    }
}

/// Arm segments and the shoulder line.
pub const UPPER_BODY_CONNECTIONS: &[Connection] = {
    use LandmarkIdx::*;
    &[
        Connection::new(LeftShoulder, LeftElbow),
        Connection::new(LeftElbow, LeftWrist),
        Connection::new(RightShoulder, RightElbow),
        Connection::new(RightElbow, RightWrist),
        Connection::new(LeftShoulder, RightShoulder),
    ]
};

/// Coarse full-body skeleton, including legs and feet.
pub const FULL_BODY_CONNECTIONS: &[Connection] = {
    use LandmarkIdx::*;
    &[
        Connection::new(LeftShoulder, RightShoulder),
        Connection::new(LeftShoulder, LeftElbow),
        Connection::new(LeftElbow, LeftWrist),
        Connection::new(RightShoulder, RightElbow),
        Connection::new(RightElbow, RightWrist),
        Connection::new(LeftShoulder, LeftHip),
        Connection::new(LeftHip, LeftAnkle),
        Connection::new(LeftAnkle, LeftHeel),
        Connection::new(LeftAnkle, LeftFootIndex),
        Connection::new(RightShoulder, RightHip),
        Connection::new(RightHip, RightAnkle),
        Connection::new(RightAnkle, RightHeel),
        Connection::new(RightAnkle, RightFootIndex),
    ]
};

/// Left and right elbow.
pub const ARM_JOINTS: &[Joint] = {
    use LandmarkIdx::*;
    &[
        Joint::new(
            Connection::new(LeftShoulder, LeftElbow),
            Connection::new(LeftElbow, LeftWrist),
        ),
        Joint::new(
            Connection::new(RightShoulder, RightElbow),
            Connection::new(RightElbow, RightWrist),
        ),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_model_order() {
        for (i, lm) in LandmarkIdx::ALL.into_iter().enumerate() {
            assert_eq!(lm.index(), i);
            assert_eq!(LandmarkIdx::from_index(i), Some(lm));
        }
        assert_eq!(LandmarkIdx::from_index(LandmarkIdx::COUNT), None);
    }

    #[test]
    fn parse_names() {
        assert_eq!("LEFT SHOULDER".parse::<LandmarkIdx>(), Ok(LandmarkIdx::LeftShoulder));
        assert_eq!("right_wrist".parse::<LandmarkIdx>(), Ok(LandmarkIdx::RightWrist));
        assert_eq!(" 13 ".parse::<LandmarkIdx>(), Ok(LandmarkIdx::LeftElbow));
        assert_eq!(
            "LEFT TENTACLE".parse::<LandmarkIdx>(),
            Err(ConfigError::UnknownLandmark("LEFT TENTACLE".into()))
        );
        assert!("33".parse::<LandmarkIdx>().is_err());

        for lm in LandmarkIdx::ALL {
            assert_eq!(lm.name().parse::<LandmarkIdx>(), Ok(lm));
        }
    }

    #[test]
    fn connection_display() {
        assert_eq!(
            UPPER_BODY_CONNECTIONS[0].to_string(),
            "LEFT SHOULDER - LEFT ELBOW"
        );
    }
}
