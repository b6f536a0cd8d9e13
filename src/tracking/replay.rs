// SPDX-License-Identifier: GPL-3.0-only

//! Recorded pose streams
//!
//! A recording is newline-delimited JSON, one [`TrackingSample`] per line.
//! [`PoseRecorder`] writes it, [`ReplaySource`] plays it back one sample per
//! grab and reports [`ReturnCode::EndOfStream`] once the data runs out.

use super::PoseSource;
use super::types::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

enum Input {
    /// Opened lazily on `open`
    Path(PathBuf),
    Reader(Box<dyn BufRead + Send>),
}

pub struct ReplaySource {
    name: String,
    input: Option<Input>,
    reader: Option<Box<dyn BufRead + Send>>,
    tracking: bool,
    line_no: usize,
    current: TrackingSample,
}

impl ReplaySource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::with_input(path.display().to_string(), Input::Path(path))
    }

    pub fn from_reader(reader: impl BufRead + Send + 'static) -> Self {
        Self::with_input("replay".to_string(), Input::Reader(Box::new(reader)))
    }

    fn with_input(name: String, input: Input) -> Self {
        Self {
            name,
            input: Some(input),
            reader: None,
            tracking: false,
            line_no: 0,
            current: TrackingSample::default(),
        }
    }

    /// Next non-blank line, `Ok(None)` at end of input
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
    }
}

impl PoseSource for ReplaySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self, _config: &SessionConfig) -> ReturnCode {
        let reader: Box<dyn BufRead + Send> = match self.input.take() {
            Some(Input::Reader(reader)) => reader,
            Some(Input::Path(path)) => match File::open(&path) {
                Ok(file) => Box::new(BufReader::new(file)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cannot open recording");
                    return ReturnCode::CameraNotDetected;
                }
            },
            // Reopening a consumed stream is not supported
            None => return ReturnCode::CameraNotDetected,
        };

        self.reader = Some(reader);
        self.line_no = 0;
        info!(recording = %self.name, "Replay opened");
        ReturnCode::Success
    }

    fn enable_positional_tracking(&mut self) -> ReturnCode {
        if self.reader.is_none() {
            return ReturnCode::CameraNotOpened;
        }
        self.tracking = true;
        ReturnCode::Success
    }

    fn grab(&mut self) -> ReturnCode {
        if self.reader.is_none() {
            return ReturnCode::CameraNotOpened;
        }
        if !self.tracking {
            return ReturnCode::TrackingNotEnabled;
        }

        match self.next_line() {
            Ok(Some(line)) => match serde_json::from_str::<TrackingSample>(&line) {
                Ok(sample) => {
                    self.current = sample;
                    ReturnCode::Success
                }
                Err(e) => {
                    error!(line = self.line_no, error = %e, "Malformed pose record");
                    ReturnCode::CorruptedData
                }
            },
            Ok(None) => {
                debug!(lines = self.line_no, "Recording exhausted");
                ReturnCode::EndOfStream
            }
            Err(e) => {
                error!(error = %e, "Reading recording failed");
                ReturnCode::Failure
            }
        }
    }

    fn pose(&self) -> PoseSample {
        self.current.pose
    }

    fn imu(&self) -> Option<ImuSample> {
        self.current.imu
    }

    fn close(&mut self) {
        self.reader = None;
        self.tracking = false;
    }
}

/// Writes polled samples as newline-delimited JSON
pub struct PoseRecorder<W: Write> {
    writer: W,
    written: usize,
}

impl PoseRecorder<BufWriter<File>> {
    /// Create (or truncate) a recording file
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        info!(path = %path.display(), "Recording poses");
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> PoseRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn record(&mut self, sample: &TrackingSample) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, sample)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Number of samples written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample(x: f64, y: f64) -> TrackingSample {
        TrackingSample {
            pose: PoseSample {
                translation: Translation::new(x, y, 0.0),
                ..Default::default()
            },
            imu: None,
        }
    }

    fn opened(data: &str) -> ReplaySource {
        let mut source = ReplaySource::from_reader(Cursor::new(data.as_bytes().to_vec()));
        assert!(source.open(&SessionConfig::default()).is_success());
        assert!(source.enable_positional_tracking().is_success());
        source
    }

    #[test]
    fn test_recorded_samples_play_back_in_order() {
        let mut recorder = PoseRecorder::new(Vec::new());
        recorder.record(&sample(1.0, 2.0)).unwrap();
        recorder.record(&sample(-0.5, 0.25)).unwrap();
        assert_eq!(recorder.written(), 2);
        let bytes = recorder.finish().unwrap();

        let mut source = opened(std::str::from_utf8(&bytes).unwrap());
        assert!(source.grab().is_success());
        assert_eq!(source.pose().translation, Translation::new(1.0, 2.0, 0.0));
        assert!(source.grab().is_success());
        assert_eq!(source.pose().translation, Translation::new(-0.5, 0.25, 0.0));
        assert_eq!(source.grab(), ReturnCode::EndOfStream);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let line = serde_json::to_string(&sample(3.0, 0.0)).unwrap();
        let mut source = opened(&format!("\n\n{}\n\n", line));
        assert!(source.grab().is_success());
        assert_eq!(source.grab(), ReturnCode::EndOfStream);
    }

    #[test]
    fn test_malformed_line_is_corrupted_data() {
        let mut source = opened("{not json}\n");
        assert_eq!(source.grab(), ReturnCode::CorruptedData);
    }

    #[test]
    fn test_missing_file_is_not_detected() {
        let mut source = ReplaySource::from_path("/nonexistent/posegrid/recording.jsonl");
        assert_eq!(
            source.open(&SessionConfig::default()),
            ReturnCode::CameraNotDetected
        );
    }

    #[test]
    fn test_tracking_state_is_played_back() {
        let mut relocalizing = sample(0.0, 0.0);
        relocalizing.pose.state = TrackingState::Searching;
        let line = serde_json::to_string(&relocalizing).unwrap();
        assert!(line.contains("\"Searching\""));

        let mut source = opened(&line);
        assert!(source.grab().is_success());
        assert_eq!(source.pose().state, TrackingState::Searching);
        assert_eq!(source.pose().state.to_string(), "SEARCHING");
    }

    #[test]
    fn test_grab_before_open() {
        let mut source = ReplaySource::from_reader(Cursor::new(Vec::new()));
        assert_eq!(source.grab(), ReturnCode::CameraNotOpened);
    }
}
