use serde::Serialize;

use super::capture::CaptureError;

/// Largest value a byte-scaled magnitude can take.
pub const MAX_MAGNITUDE: f32 = 255.0;

/// One tick's magnitude spectrum, one value per bin (0.0-255.0).
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumFrame {
    pub magnitudes: Vec<f32>,
}

impl SpectrumFrame {
    pub fn new(magnitudes: Vec<f32>) -> Self {
        Self { magnitudes }
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

/// Sampling parameters that map a bin index to a frequency.
/// Fixed for the lifetime of a capture session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CaptureParameters {
    /// Hz
    pub sample_rate: f64,
    pub transform_size: usize,
}

impl CaptureParameters {
    pub fn new(sample_rate: f64, transform_size: usize) -> Result<Self, CaptureError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(CaptureError::InvalidParameters(format!(
                "sample rate must be a positive number, got {}",
                sample_rate
            )));
        }
        if transform_size == 0 {
            return Err(CaptureError::InvalidParameters(
                "transform size must be positive".into(),
            ));
        }
        Ok(Self {
            sample_rate,
            transform_size,
        })
    }

    /// Number of bins in each frame produced for these parameters.
    pub fn bin_count(&self) -> usize {
        self.transform_size / 2
    }

    pub fn bin_to_frequency(&self, bin: usize) -> f64 {
        bin as f64 * self.sample_rate / self.transform_size as f64
    }

    /// Fractional bin position of `frequency`, used for overlay placement.
    pub fn frequency_to_bin(&self, frequency: f64) -> f64 {
        frequency * self.transform_size as f64 / self.sample_rate
    }
}
