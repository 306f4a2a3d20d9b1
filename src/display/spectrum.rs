use anyhow::Result;

use super::TickObserver;
use crate::audio::frame::{CaptureParameters, SpectrumFrame, MAX_MAGNITUDE};
use crate::tracking::session::TickResult;

const BAR: char = '#';
const MARKER: char = '^';

/// Render a frame as `height` rows of `width` columns of bars, plus a
/// marker row pointing at `target` Hz when it falls inside the spectrum.
/// Each column shows the loudest bin it covers.
pub fn render_bars(
    frame: &SpectrumFrame,
    params: &CaptureParameters,
    target: f64,
    width: usize,
    height: usize,
) -> String {
    if frame.is_empty() || width == 0 || height == 0 {
        return String::new();
    }

    let bins_per_column = frame.len().div_ceil(width);
    let columns: Vec<f32> = frame
        .magnitudes
        .chunks(bins_per_column)
        .map(|chunk| chunk.iter().copied().fold(0.0f32, f32::max))
        .collect();

    let mut rows: Vec<String> = (0..height)
        .rev()
        .map(|row| {
            let threshold = row as f32 / height as f32;
            columns
                .iter()
                .map(|&m| if m / MAX_MAGNITUDE > threshold { BAR } else { ' ' })
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect();

    let target_bin = params.frequency_to_bin(target);
    if target_bin.is_finite() && target_bin >= 0.0 {
        let column = target_bin as usize / bins_per_column;
        if column < columns.len() {
            rows.push(format!("{}{}", " ".repeat(column), MARKER));
        }
    }

    rows.join("\n")
}

/// Keeps the latest frame so it can be drawn on demand.
pub struct SpectrumView {
    params: CaptureParameters,
    width: usize,
    height: usize,
    latest: Option<(SpectrumFrame, f64)>,
}

impl SpectrumView {
    pub fn new(params: CaptureParameters, width: usize, height: usize) -> Self {
        Self {
            params,
            width,
            height,
            latest: None,
        }
    }

    pub fn render(&self) -> Option<String> {
        self.latest.as_ref().map(|(frame, target)| {
            render_bars(frame, &self.params, *target, self.width, self.height)
        })
    }
}

impl TickObserver for SpectrumView {
    fn on_tick(&mut self, frame: &SpectrumFrame, _result: &TickResult, target: f64) -> Result<()> {
        self.latest = Some((frame.clone(), target));
        Ok(())
    }
}
