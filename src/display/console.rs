use anyhow::Result;

use super::TickObserver;
use crate::audio::frame::SpectrumFrame;
use crate::tracking::peak::TrackerMode;
use crate::tracking::samples::Reading;
use crate::tracking::session::TickResult;

pub const NO_DATA: &str = "-- Hz";

/// `440.0 Hz`, or the placeholder before the first reading.
pub fn format_frequency(frequency: Option<f64>) -> String {
    match frequency {
        Some(f) => format!("{:.1} Hz", f),
        None => NO_DATA.to_string(),
    }
}

/// The tracked peak, or the placeholder while the log is still empty.
///
/// The tracker starts at 0 Hz, which is not a frequency anyone heard.
pub fn format_peak(peak: f64, readings: usize) -> String {
    if readings == 0 {
        NO_DATA.to_string()
    } else {
        format_frequency(Some(peak))
    }
}

/// Fixed-width table of readings in the order given.
pub fn format_history(readings: &[Reading]) -> String {
    let mut lines = vec![format!(
        "{:>10}  {:>12}  {:>12}",
        "time (ms)", "freq (Hz)", "peak (Hz)"
    )];
    lines.extend(readings.iter().map(|r| {
        format!(
            "{:>10}  {:>12.2}  {:>12.2}",
            r.timestamp_ms, r.frequency, r.peak
        )
    }));
    lines.join("\n")
}

/// Logs a status line per tick and counts what it saw.
#[derive(Default)]
pub struct ConsoleStatus {
    pub ticks: usize,
    pub readings: usize,
    last_mode: TrackerMode,
}

impl TickObserver for ConsoleStatus {
    fn on_tick(&mut self, _frame: &SpectrumFrame, result: &TickResult, target: f64) -> Result<()> {
        self.ticks += 1;
        if result.reading.is_some() {
            self.readings += 1;
        }
        if result.mode != self.last_mode {
            log::info!("Peak {:?} at {}", result.mode, format_frequency(Some(result.peak)));
            self.last_mode = result.mode;
        }
        log::debug!(
            "freq {} | peak {} | target {:.1} Hz{}",
            format_frequency(result.frequency),
            format_frequency(Some(result.peak)),
            target,
            if result.mode == TrackerMode::Frozen { " [frozen]" } else { "" }
        );
        Ok(())
    }
}
