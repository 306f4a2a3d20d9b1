use std::f32::consts::PI;

use super::capture::CaptureError;

/// Peak amplitude of generated tones. Kept below full scale so the
/// analyser's byte range does not flatten the spectral peak.
const TONE_AMPLITUDE: f32 = 0.05;

/// Linear fade at each end, in seconds.
const FADE_SECONDS: f32 = 0.01;

/// Generate a mono sine tone with a short fade in and out.
pub fn sine(frequency: f32, duration: f32, sample_rate: u32) -> Result<Vec<f32>, CaptureError> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(CaptureError::InvalidParameters(format!(
            "tone frequency must be positive, got {}",
            frequency
        )));
    }
    if !duration.is_finite() || duration <= 0.0 || sample_rate == 0 {
        return Err(CaptureError::InvalidParameters(format!(
            "tone needs a positive duration and sample rate, got {}s at {} Hz",
            duration, sample_rate
        )));
    }

    let total = (duration * sample_rate as f32) as usize;
    let phase_delta = 2.0 * PI * frequency / sample_rate as f32;
    let mut samples: Vec<f32> = (0..total)
        .map(|i| TONE_AMPLITUDE * (phase_delta * i as f32).sin())
        .collect();

    apply_fade(&mut samples, (FADE_SECONDS * sample_rate as f32) as usize);

    log::debug!(
        "Generated {:.1} Hz tone: {} samples at {} Hz",
        frequency,
        samples.len(),
        sample_rate
    );
    Ok(samples)
}

fn apply_fade(samples: &mut [f32], fade_samples: usize) {
    let fade = fade_samples.min(samples.len() / 2);
    let total = samples.len();
    for i in 0..fade {
        let factor = i as f32 / fade as f32;
        samples[i] *= factor;
        samples[total - 1 - i] *= factor;
    }
}
