// SPDX-License-Identifier: GPL-3.0-only

//! Polling without a display
//!
//! Runs the tick loop on the calling thread and writes one line per sample.
//! The loop ends on the tick limit, on an interrupt request or on the first
//! failed grab. The recording and the snapshot are written in every case.

use crate::display::{DisplayState, sample_line};
use crate::errors::{AppResult, TrackingError};
use crate::render::save_png;
use crate::terminal::next_deadline;
use crate::tracking::{PoseRecorder, TrackingSession};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Why polling ended
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// The requested number of samples was polled
    TickLimit,
    /// Stop was requested (Ctrl+C)
    Interrupted,
    /// A grab failed; the end of a recording lands here too
    Failed(TrackingError),
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    pub interval: Duration,
    /// Stop after this many samples
    pub ticks: Option<u64>,
    /// JSON-lines recording of every polled sample
    pub record: Option<PathBuf>,
    /// PNG of the last frame, written on exit
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessReport {
    pub polled: u64,
    /// Samples written to the recording, if one was requested
    pub recorded: Option<usize>,
    pub stop: StopReason,
}

/// Poll `session` until a stop condition, writing progress lines to `out`
///
/// The session is left open; closing it is up to the caller.
pub fn run(
    session: &mut TrackingSession,
    display: &mut DisplayState,
    options: &HeadlessOptions,
    stop: &AtomicBool,
    out: &mut impl Write,
) -> AppResult<HeadlessReport> {
    let mut recorder = options
        .record
        .as_deref()
        .map(PoseRecorder::create)
        .transpose()?;

    writeln!(
        out,
        "Polling {} every {} ms (Ctrl+C to stop)",
        session.source_name(),
        options.interval.as_millis()
    )?;

    let mut deadline = Instant::now();
    let reason = loop {
        if options.ticks.is_some_and(|limit| session.ticks() >= limit) {
            break StopReason::TickLimit;
        }
        if stop.load(Ordering::SeqCst) {
            writeln!(out)?;
            writeln!(out, "Stopping early...")?;
            break StopReason::Interrupted;
        }

        std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
        let sample = match session.poll() {
            Ok(sample) => sample,
            Err(e) => break StopReason::Failed(e),
        };
        deadline = next_deadline(deadline, Instant::now(), options.interval);

        display.update(&sample);
        writeln!(
            out,
            "{} | canvas {}",
            sample_line(session.ticks(), &sample),
            display.labels().canvas
        )?;
        if let Some(recorder) = recorder.as_mut() {
            recorder.record(&sample)?;
        }
    };

    if let StopReason::Failed(e) = &reason {
        warn!(error = %e, polled = session.ticks(), "Polling stopped by failed grab");
    }

    let recorded = match (recorder, &options.record) {
        (Some(recorder), Some(path)) => {
            let written = recorder.written();
            recorder.finish()?;
            writeln!(out, "Recorded {} samples to {}", written, path.display())?;
            Some(written)
        }
        _ => None,
    };

    if let Some(path) = &options.snapshot {
        save_png(display.frame(), path)?;
        writeln!(out, "Frame saved: {}", path.display())?;
    }

    info!(polled = session.ticks(), reason = ?reason, "Headless run finished");
    Ok(HeadlessReport {
        polled: session.ticks(),
        recorded,
        stop: reason,
    })
}
