use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

use super::capture::CaptureError;
use super::frame::{SpectrumFrame, MAX_MAGNITUDE};

const MIN_FFT_SIZE: usize = 32;
const MAX_FFT_SIZE: usize = 32768;

/// Analyser settings, mirroring a browser analyser node.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyserSettings {
    pub fft_size: usize,
    /// Per-bin smoothing time constant (0.0-1.0)
    pub smoothing: f32,
    pub min_decibels: f32,
    pub max_decibels: f32,
}

impl Default for AnalyserSettings {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserSettings {
    pub fn validate(&self) -> Result<(), CaptureError> {
        if !self.fft_size.is_power_of_two()
            || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size)
        {
            return Err(CaptureError::InvalidParameters(format!(
                "fft size must be a power of two in {}..={}, got {}",
                MIN_FFT_SIZE, MAX_FFT_SIZE, self.fft_size
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(CaptureError::InvalidParameters(format!(
                "smoothing must be within 0.0-1.0, got {}",
                self.smoothing
            )));
        }
        if !(self.min_decibels < self.max_decibels) {
            return Err(CaptureError::InvalidParameters(format!(
                "min decibels ({}) must be below max decibels ({})",
                self.min_decibels, self.max_decibels
            )));
        }
        Ok(())
    }
}

/// Turn mono samples into one byte-scaled spectrum frame per tick.
///
/// Tick `i` analyses the `fft_size` samples ending at `(i + 1) / tick_rate` seconds,
/// zero-padded before the start of the signal.
pub fn analyse(
    samples: &[f32],
    sample_rate: u32,
    tick_rate: u32,
    settings: &AnalyserSettings,
) -> Result<Vec<SpectrumFrame>, CaptureError> {
    settings.validate()?;
    if sample_rate == 0 || tick_rate == 0 {
        return Err(CaptureError::InvalidParameters(
            "sample rate and tick rate must be positive".into(),
        ));
    }

    let samples_per_tick = sample_rate as f64 / tick_rate as f64;
    let total_ticks = (samples.len() as f64 / samples_per_tick).floor() as usize;

    log::debug!(
        "Analysing {} ticks (fft_size={}, smoothing={:.2})",
        total_ticks,
        settings.fft_size,
        settings.smoothing
    );

    let raw = raw_magnitudes(samples, samples_per_tick, total_ticks, settings.fft_size);
    Ok(smooth_and_scale(&raw, settings))
}

fn raw_magnitudes(
    samples: &[f32],
    samples_per_tick: f64,
    total_ticks: usize,
    fft_size: usize,
) -> Vec<Vec<f32>> {
    let window = blackman_window(fft_size);
    let half = fft_size / 2;

    (0..total_ticks)
        .into_par_iter()
        .map(|tick| {
            let end = (((tick + 1) as f64 * samples_per_tick).round() as usize).min(samples.len());
            let start = end.saturating_sub(fft_size);
            let offset = fft_size - (end - start);

            let mut fft_input: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); fft_size];
            for (i, &s) in samples[start..end].iter().enumerate() {
                fft_input[offset + i] = Complex::new(s * window[offset + i], 0.0);
            }

            // Per-thread FFT planner (rayon-safe)
            let mut planner = FftPlanner::<f32>::new();
            let fft = planner.plan_fft_forward(fft_size);
            fft.process(&mut fft_input);

            fft_input[..half]
                .iter()
                .map(|c| c.norm() / fft_size as f32)
                .collect::<Vec<f32>>()
        })
        .collect()
}

fn smooth_and_scale(raw: &[Vec<f32>], settings: &AnalyserSettings) -> Vec<SpectrumFrame> {
    let Some(first) = raw.first() else {
        return Vec::new();
    };

    let tau = settings.smoothing;
    let range = settings.max_decibels - settings.min_decibels;
    let mut smoothed = vec![0.0f32; first.len()];
    let mut frames = Vec::with_capacity(raw.len());

    for magnitudes in raw {
        let bytes = magnitudes
            .iter()
            .zip(smoothed.iter_mut())
            .map(|(&mag, prev)| {
                *prev = tau * *prev + (1.0 - tau) * mag;
                let db = 20.0 * prev.log10();
                let scaled = (MAX_MAGNITUDE / range * (db - settings.min_decibels)).floor();
                // NaN input samples read as silence
                if scaled.is_nan() {
                    0.0
                } else {
                    scaled.clamp(0.0, MAX_MAGNITUDE)
                }
            })
            .collect();
        frames.push(SpectrumFrame::new(bytes));
    }

    frames
}

fn blackman_window(size: usize) -> Vec<f32> {
    let a0 = 0.42f32;
    let a1 = 0.5f32;
    let a2 = 0.08f32;
    (0..size)
        .map(|i| {
            let x = 2.0 * std::f32::consts::PI * i as f32 / size as f32;
            a0 - a1 * x.cos() + a2 * (2.0 * x).cos()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, amplitude: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * seconds) as usize;
        (0..n)
            .map(|i| {
                amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin()
            })
            .collect()
    }

    #[test]
    fn frame_count_follows_tick_rate() {
        let samples = vec![0.0; 48000];
        let frames = analyse(&samples, 48000, 60, &AnalyserSettings::default()).unwrap();
        assert_eq!(frames.len(), 60);
        assert!(frames.iter().all(|f| f.len() == 1024));
    }

    #[test]
    fn silence_scales_to_zero() {
        let samples = vec![0.0; 4800];
        let frames = analyse(&samples, 48000, 10, &AnalyserSettings::default()).unwrap();
        assert!(frames
            .iter()
            .all(|f| f.magnitudes.iter().all(|&m| m == 0.0)));
    }

    #[test]
    fn sine_peaks_at_its_bin() {
        // Quiet enough that neighbouring bins stay below the 255 ceiling
        let freq = 100.0 * 44100.0 / 2048.0;
        let samples = sine(freq, 0.01, 44100, 0.5);
        let frames = analyse(&samples, 44100, 30, &AnalyserSettings::default()).unwrap();
        let last = frames.last().unwrap();
        let (peak_bin, _) = last
            .magnitudes
            .iter()
            .enumerate()
            .fold((0, -1.0f32), |best, (i, &m)| if m > best.1 { (i, m) } else { best });
        assert_eq!(peak_bin, 100);
        assert!(last.magnitudes.iter().all(|&m| (0.0..=255.0).contains(&m)));
    }

    #[test]
    fn rejects_invalid_settings() {
        let bad_size = AnalyserSettings {
            fft_size: 1000,
            ..Default::default()
        };
        assert!(analyse(&[0.0; 100], 44100, 60, &bad_size).is_err());

        let bad_range = AnalyserSettings {
            min_decibels: -30.0,
            max_decibels: -100.0,
            ..Default::default()
        };
        assert!(bad_range.validate().is_err());
        assert!(analyse(&[0.0; 100], 0, 60, &AnalyserSettings::default()).is_err());
    }
}
