use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::TickObserver;
use crate::audio::frame::SpectrumFrame;
use crate::tracking::peak::TrackerMode;
use crate::tracking::samples::Reading;
use crate::tracking::session::TickResult;

#[derive(Serialize)]
struct TickEvent<'a> {
    tick: u64,
    reading: Option<&'a Reading>,
    frequency: Option<f64>,
    peak: f64,
    mode: TrackerMode,
    target_frequency: f64,
}

/// Writes one JSON object per tick.
pub struct JsonLinesWriter<W: Write> {
    out: W,
    ticks: u64,
}

/// Buffered writer over a freshly created file.
pub fn create_file(path: &Path) -> Result<JsonLinesWriter<BufWriter<File>>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create event file: {}", path.display()))?;
    Ok(JsonLinesWriter::new(BufWriter::new(file)))
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, ticks: 0 }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TickObserver for JsonLinesWriter<W> {
    fn on_tick(&mut self, _frame: &SpectrumFrame, result: &TickResult, target: f64) -> Result<()> {
        let event = TickEvent {
            tick: self.ticks,
            reading: result.reading.as_ref(),
            frequency: result.frequency,
            peak: result.peak,
            mode: result.mode,
            target_frequency: target,
        };
        serde_json::to_writer(&mut self.out, &event).context("Failed to encode tick event")?;
        self.out.write_all(b"\n")?;
        self.ticks += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().context("Failed to flush event file")
    }
}
