//! Landmark sources.
//!
//! Landmark detection itself happens outside of this crate. A [`LandmarkSource`] delivers the
//! detector's output one frame at a time. [`ReplaySource`] replays recorded detector output from a
//! JSON Lines file.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str,
};

use anyhow::{bail, Context};

use crate::{
    body::LandmarkIdx,
    landmark::{Frame, FrameLandmarks, Point},
};

/// A source of per-frame landmark detections.
pub trait LandmarkSource {
    /// Reads the next frame.
    ///
    /// Returns `Ok(None)` at the end of the stream. An error whose root cause is a
    /// [`std::io::Error`] means that the stream itself failed and has ended. Any other error
    /// indicates that only this frame could not be read; callers should treat it like
    /// [`Frame::Lost`] and may keep reading.
    fn read(&mut self) -> anyhow::Result<Option<Frame>>;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn read(&mut self) -> anyhow::Result<Option<Frame>> {
        (**self).read()
    }
}

/// Replays recorded landmarks from a [JSON Lines] stream.
///
/// Every line holds one frame: either `null` (nothing detected) or an object mapping landmark
/// names or indices to `[x, y]` coordinates, for example:
///
/// ```text
/// {"LEFT SHOULDER": [0.41, 0.32], "LEFT ELBOW": [0.47, 0.51], "12": [0.58, 0.33]}
/// null
/// ```
///
/// Blank lines are skipped. A line naming the same landmark twice (eg. by name and by index) is
/// rejected.
///
/// [JSON Lines]: https://jsonlines.org/
pub struct ReplaySource<R> {
    reader: R,
    buf: Vec<u8>,
    line_number: usize,
    failed: bool,
}

impl ReplaySource<BufReader<File>> {
    /// Opens a JSON Lines file for replay.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open landmark file '{}'", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_number: 0,
            failed: false,
        }
    }
}

impl<R: BufRead> LandmarkSource for ReplaySource<R> {
    fn read(&mut self) -> anyhow::Result<Option<Frame>> {
        if self.failed {
            return Ok(None);
        }

        loop {
            self.buf.clear();
            let n = match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(n) => n,
                Err(e) => {
                    self.failed = true;
                    return Err(anyhow::Error::new(e).context(format!(
                        "failed to read landmarks after line {}",
                        self.line_number
                    )));
                }
            };
            if n == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let frame = parse_line(&self.buf)
                .with_context(|| format!("invalid frame on line {}", self.line_number))?;
            if let Some(frame) = frame {
                return Ok(Some(frame));
            }
        }
    }
}

/// Parses one line of input, returning `None` for blank lines.
fn parse_line(bytes: &[u8]) -> anyhow::Result<Option<Frame>> {
    let line = str::from_utf8(bytes)?.trim();
    if line.is_empty() {
        return Ok(None);
    }
    parse_frame(line).map(Some)
}

fn parse_frame(line: &str) -> anyhow::Result<Frame> {
    let raw: Option<HashMap<String, [f32; 2]>> = serde_json::from_str(line)?;
    let Some(raw) = raw else {
        return Ok(Frame::Lost);
    };

    let mut landmarks = FrameLandmarks::new();
    for (name, [x, y]) in raw {
        let lm = name.parse::<LandmarkIdx>()?;
        if landmarks.contains(lm) {
            bail!("duplicate landmark {lm}");
        }
        if !(x.is_finite() && y.is_finite()) {
            bail!("non-finite position for {lm}");
        }
        landmarks.set(lm, Point::new(x, y));
    }
    Ok(Frame::Landmarks(landmarks))
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read};

    use super::*;
    use crate::body::LandmarkIdx::*;

    #[test]
    fn replay() {
        let data = r#"{"LEFT SHOULDER": [0.5, 0.25], "13": [0.75, 0.25]}

null
{}
"#;
        let mut source = ReplaySource::new(Cursor::new(data));

        let frame = source.read().unwrap().unwrap();
        let lms = frame.landmarks().unwrap();
        assert_eq!(lms.get(LeftShoulder), Some(Point::new(0.5, 0.25)));
        assert_eq!(lms.get(LeftElbow), Some(Point::new(0.75, 0.25)));
        assert_eq!(lms.len(), 2);

        assert_eq!(source.read().unwrap(), Some(Frame::Lost));
        let empty = source.read().unwrap().unwrap();
        assert!(empty.landmarks().unwrap().is_empty());
        assert_eq!(source.read().unwrap(), None);
    }

    #[test]
    fn bad_lines_fail_individually() {
        let data = "{\"LEFT TOE\": [1, 2]}\nnot json\n{\"NOSE\": [1, 2]}\n";
        let mut source = ReplaySource::new(Cursor::new(data));

        let err = source.read().unwrap_err();
        assert!(format!("{err:#}").contains("line 1"), "{err:#}");
        assert!(source.read().is_err());
        let frame = source.read().unwrap().unwrap();
        assert!(frame.landmarks().unwrap().contains(Nose));
        assert!(source.read().unwrap().is_none());
    }

    #[test]
    fn landmark_given_twice() {
        let data = "{\"LEFT SHOULDER\": [1, 2], \"11\": [3, 4]}\n{\"11\": [3, 4]}\n";
        let mut source = ReplaySource::new(Cursor::new(data));

        let err = source.read().unwrap_err();
        assert!(format!("{err:#}").contains("duplicate landmark"), "{err:#}");
        let frame = source.read().unwrap().unwrap();
        assert_eq!(frame.landmarks().unwrap().get(LeftShoulder), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn line_numbers_count_invalid_utf8() {
        let data: &[u8] = b"\xff\xfe\n{\"LEFT TOE\": [1, 2]}\n";
        let mut source = ReplaySource::new(data);

        let err = source.read().unwrap_err();
        assert!(format!("{err:#}").contains("line 1"), "{err:#}");
        assert!(!err.is::<io::Error>());
        let err = source.read().unwrap_err();
        assert!(format!("{err:#}").contains("line 2"), "{err:#}");
        assert!(source.read().unwrap().is_none());
    }

    struct Unreadable;

    impl Read for Unreadable {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device unplugged"))
        }
    }

    #[test]
    fn io_error_ends_stream() {
        let mut source = ReplaySource::new(BufReader::new(Unreadable));

        let err = source.read().unwrap_err();
        assert!(err.is::<io::Error>(), "{err:#}");
        assert!(source.read().unwrap().is_none());
        assert!(source.read().unwrap().is_none());
    }
}
