use std::collections::VecDeque;
use std::path::PathBuf;

use thiserror::Error;

use super::analyser::{self, AnalyserSettings};
use super::decode;
use super::frame::{CaptureParameters, SpectrumFrame};
use super::tone;

/// Capture failures. A failed start means no session was created.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Capture unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid capture parameters: {0}")]
    InvalidParameters(String),
}

/// One frame handed to the pipeline, stamped with ms since capture start.
#[derive(Clone, Debug)]
pub struct Tick {
    pub frame: SpectrumFrame,
    pub timestamp_ms: u64,
}

/// Supplies spectrum frames once per tick between `start` and `stop`.
pub trait CaptureSource {
    /// Acquire the source. Errors leave the source stopped and may be retried.
    fn start(&mut self) -> Result<CaptureParameters, CaptureError>;

    /// Next frame, or `None` once the source is stopped or exhausted.
    fn next_tick(&mut self) -> Option<Tick>;

    fn stop(&mut self);
}

/// Where the signal comes from.
#[derive(Clone, Debug)]
pub enum Signal {
    File(PathBuf),
    Tone {
        frequency: f32,
        duration: f32,
        sample_rate: u32,
    },
}

/// Decodes or synthesises the whole signal on start, then replays its
/// analysed frames at a fixed tick rate.
pub struct AnalysedCapture {
    signal: Signal,
    settings: AnalyserSettings,
    tick_rate: u32,
    pending: VecDeque<SpectrumFrame>,
    ticks_emitted: u64,
    running: bool,
}

impl AnalysedCapture {
    pub fn new(signal: Signal, settings: AnalyserSettings, tick_rate: u32) -> Self {
        Self {
            signal,
            settings,
            tick_rate,
            pending: VecDeque::new(),
            ticks_emitted: 0,
            running: false,
        }
    }

    /// Frames still queued; known after a successful `start`.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    fn load(&self) -> Result<(Vec<f32>, u32), CaptureError> {
        match &self.signal {
            Signal::File(path) => {
                let audio = decode::decode_audio(path)
                    .map_err(|e| CaptureError::Unavailable(format!("{:#}", e)))?;
                Ok((audio.samples, audio.sample_rate))
            }
            Signal::Tone {
                frequency,
                duration,
                sample_rate,
            } => {
                let samples = tone::sine(*frequency, *duration, *sample_rate)?;
                Ok((samples, *sample_rate))
            }
        }
    }
}

impl CaptureSource for AnalysedCapture {
    fn start(&mut self) -> Result<CaptureParameters, CaptureError> {
        if self.tick_rate == 0 {
            return Err(CaptureError::InvalidParameters(
                "tick rate must be positive".into(),
            ));
        }
        let (samples, sample_rate) = self.load()?;
        let params = CaptureParameters::new(sample_rate as f64, self.settings.fft_size)?;
        let frames = analyser::analyse(&samples, sample_rate, self.tick_rate, &self.settings)?;

        log::debug!(
            "Capture started: {} frames of {} bins at {} Hz",
            frames.len(),
            params.bin_count(),
            sample_rate
        );

        self.pending = frames.into();
        self.ticks_emitted = 0;
        self.running = true;
        Ok(params)
    }

    fn next_tick(&mut self) -> Option<Tick> {
        if !self.running {
            return None;
        }
        let frame = self.pending.pop_front()?;
        self.ticks_emitted += 1;
        Some(Tick {
            frame,
            timestamp_ms: self.ticks_emitted * 1000 / self.tick_rate as u64,
        })
    }

    fn stop(&mut self) {
        if self.running {
            log::debug!("Capture stopped after {} ticks", self.ticks_emitted);
        }
        self.running = false;
        self.pending.clear();
    }
}
