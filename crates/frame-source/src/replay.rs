//! JSON-lines replay of recorded detections
//!
//! Each non-empty line is one frame:
//!
//! ```json
//! {"width": 640, "height": 480, "detections": [{"class": 1, "rects": [[300, 200, 12, 12]]}]}
//! ```
//!
//! A detection may also carry `rows`: one string per frame row, `1`/`#` for
//! a set pixel and `0`/`.` otherwise. Rows must match the frame size.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::{DetectionSource, EyeMask, FrameDetections, FrameError};

#[derive(Debug, Deserialize)]
struct ReplayRecord {
    width: u32,
    height: u32,
    #[serde(default)]
    detections: Vec<ReplayDetection>,
}

#[derive(Debug, Deserialize)]
struct ReplayDetection {
    class: u32,
    #[serde(default)]
    rects: Vec<[usize; 4]>,
    #[serde(default)]
    rows: Vec<String>,
}

/// Detection source backed by a recorded JSON-lines stream
pub struct ReplaySource {
    reader: Option<Box<dyn BufRead + Send>>,
    line: usize,
    sequence: u64,
    mirror: bool,
}

impl ReplaySource {
    /// Open a recording on disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FrameError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| FrameError::Open(format!("{}: {}", path.display(), e)))?;
        info!("Replaying detections from {}", path.display());
        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Replay from any buffered reader
    pub fn from_reader(reader: impl BufRead + Send + 'static) -> Self {
        Self {
            reader: Some(Box::new(reader)),
            line: 0,
            sequence: 0,
            mirror: false,
        }
    }

    /// Flip each frame as it is read (see [`FrameDetections::mirrored`])
    pub fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    fn parse(&self, text: &str) -> Result<FrameDetections, FrameError> {
        let record: ReplayRecord =
            serde_json::from_str(text).map_err(|e| FrameError::Malformed {
                line: self.line,
                reason: e.to_string(),
            })?;

        let (width, height) = (record.width as usize, record.height as usize);
        let masks = record
            .detections
            .into_iter()
            .map(|d| Ok((d.class, self.rasterize(width, height, &d)?)))
            .collect::<Result<Vec<_>, FrameError>>()?;
        let frame = FrameDetections::from_indexed(record.width, record.height, self.sequence, masks);

        Ok(if self.mirror { frame.mirrored() } else { frame })
    }
}

impl ReplaySource {
    fn rasterize(
        &self,
        width: usize,
        height: usize,
        detection: &ReplayDetection,
    ) -> Result<EyeMask, FrameError> {
        let mut pixels = EyeMask::from_rects(width, height, &detection.rects).into_pixels();
        if detection.rows.is_empty() {
            return Ok(EyeMask::new(pixels));
        }

        let row_width = detection.rows[0].chars().count();
        if detection.rows.len() != height
            || detection.rows.iter().any(|r| r.chars().count() != width)
        {
            return Err(FrameError::ShapeMismatch {
                expected: (width, height),
                got: (row_width, detection.rows.len()),
            });
        }

        for (y, row) in detection.rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    '1' | '#' => pixels[[y, x]] = true,
                    '0' | '.' => {}
                    other => {
                        return Err(FrameError::Malformed {
                            line: self.line,
                            reason: format!("unexpected mask character '{}'", other),
                        })
                    }
                }
            }
        }
        Ok(EyeMask::new(pixels))
    }
}

impl DetectionSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Option<FrameDetections>, FrameError> {
        let mut text = String::new();
        loop {
            let reader = self.reader.as_mut().ok_or(FrameError::Released)?;
            text.clear();
            if reader.read_line(&mut text)? == 0 {
                debug!("Replay exhausted after {} frames", self.sequence);
                return Ok(None);
            }
            self.line += 1;
            if !text.trim().is_empty() {
                break;
            }
        }

        let frame = self.parse(text.trim())?;
        self.sequence += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        if self.reader.take().is_some() {
            info!("Replay source released after {} frames", self.sequence);
        }
    }
}
