use serde::Serialize;

use super::export::{self, ExportError};
use super::extractor;
use super::history;
use super::peak::{PeakTracker, TrackerMode};
use super::samples::{Reading, SampleLog};
use crate::audio::frame::{CaptureParameters, SpectrumFrame};

/// Everything presentation needs after one tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TickResult {
    /// Reading appended this tick, if the frame had a usable peak.
    pub reading: Option<Reading>,
    /// Last valid instantaneous frequency; `None` until the first reading.
    pub frequency: Option<f64>,
    pub peak: f64,
    pub mode: TrackerMode,
    /// Most recent readings, newest first.
    pub history: Vec<Reading>,
}

/// One capture session: owns the peak tracker, the sample log and the
/// parameters it was started with.
#[derive(Debug)]
pub struct Session {
    params: CaptureParameters,
    tracker: PeakTracker,
    samples: SampleLog,
    history_size: usize,
    last_frequency: Option<f64>,
    /// Added to capture timestamps so a resumed log stays monotonic.
    time_offset_ms: u64,
}

impl Session {
    pub fn new(params: CaptureParameters, history_size: usize) -> Self {
        Self {
            params,
            tracker: PeakTracker::new(),
            samples: SampleLog::new(),
            history_size,
            last_frequency: None,
            time_offset_ms: 0,
        }
    }

    /// Continue this session's log and peak under new capture parameters.
    /// Later timestamps are shifted past the last recorded reading.
    pub fn resume(self, params: CaptureParameters) -> Self {
        let time_offset_ms = self.samples.last().map_or(0, |r| r.timestamp_ms);
        Self {
            params,
            last_frequency: None,
            time_offset_ms,
            ..self
        }
    }

    /// Run one frame through extraction, peak tracking and logging.
    pub fn process_tick(&mut self, frame: &SpectrumFrame, timestamp_ms: u64) -> TickResult {
        let reading = extractor::extract(frame, &self.params).map(|frequency| {
            self.tracker.observe(frequency);
            let reading = Reading {
                timestamp_ms: self.time_offset_ms + timestamp_ms,
                frequency,
                peak: self.tracker.current_peak(),
            };
            self.samples.append(reading);
            self.last_frequency = Some(frequency);
            reading
        });

        if reading.is_none() {
            log::trace!("No reading at {} ms", timestamp_ms);
        }

        TickResult {
            reading,
            frequency: self.last_frequency,
            peak: self.tracker.current_peak(),
            mode: self.tracker.mode(),
            history: self.history(),
        }
    }

    pub fn toggle_freeze(&mut self) -> TrackerMode {
        self.tracker.toggle_freeze()
    }

    pub fn history(&self) -> Vec<Reading> {
        history::project(self.samples.snapshot_all(), self.history_size)
    }

    pub fn export(&self) -> Result<String, ExportError> {
        export::serialize(self.samples.snapshot_all())
    }

    pub fn params(&self) -> &CaptureParameters {
        &self.params
    }

    pub fn samples(&self) -> &SampleLog {
        &self.samples
    }

    pub fn frequency(&self) -> Option<f64> {
        self.last_frequency
    }

    pub fn peak(&self) -> f64 {
        self.tracker.current_peak()
    }

    pub fn mode(&self) -> TrackerMode {
        self.tracker.mode()
    }
}
