use crate::audio::frame::{CaptureParameters, SpectrumFrame};

/// Sits below every valid magnitude, so any real bin beats it.
const NO_SIGNAL: f32 = -1.0;

/// Dominant frequency of one frame in Hz.
///
/// The first bin holding the maximum magnitude wins ties. Returns `None` for
/// empty frames and whenever the winning bin maps to a frequency that is not
/// finite and positive, so silence (everything in bin 0) never yields a
/// 0 Hz reading.
pub fn extract(frame: &SpectrumFrame, params: &CaptureParameters) -> Option<f64> {
    let mut max_val = NO_SIGNAL;
    let mut max_index = None;

    for (i, &v) in frame.magnitudes.iter().enumerate() {
        if v > max_val {
            max_val = v;
            max_index = Some(i);
        }
    }

    let frequency = params.bin_to_frequency(max_index?);
    (frequency.is_finite() && frequency > 0.0).then_some(frequency)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CaptureParameters {
        CaptureParameters::new(44100.0, 2048).unwrap()
    }

    fn frame_with(len: usize, peaks: &[(usize, f32)]) -> SpectrumFrame {
        let mut magnitudes = vec![0.0; len];
        for &(bin, value) in peaks {
            magnitudes[bin] = value;
        }
        SpectrumFrame::new(magnitudes)
    }

    #[test]
    fn silence_has_no_reading() {
        for len in [0, 1, 16, 1024] {
            assert_eq!(extract(&frame_with(len, &[]), &params()), None);
        }
    }

    #[test]
    fn unique_maximum_maps_exactly() {
        let p = params();
        for bin in [1, 7, 100, 511, 1023] {
            let frame = frame_with(1024, &[(bin, 200.0), (0, 10.0)]);
            assert_eq!(extract(&frame, &p), Some(bin as f64 * 44100.0 / 2048.0));
        }
    }

    #[test]
    fn ties_keep_the_first_bin() {
        let frame = frame_with(1024, &[(40, 180.0), (90, 180.0)]);
        assert_eq!(extract(&frame, &params()), Some(40.0 * 44100.0 / 2048.0));
    }

    #[test]
    fn dominant_dc_bin_is_no_reading() {
        let frame = frame_with(1024, &[(0, 255.0), (12, 100.0)]);
        assert_eq!(extract(&frame, &params()), None);
    }

    #[test]
    fn non_finite_conversion_is_no_reading() {
        let broken = CaptureParameters {
            sample_rate: f64::INFINITY,
            transform_size: 2048,
        };
        assert_eq!(extract(&frame_with(8, &[(3, 50.0)]), &broken), None);

        let zero_size = CaptureParameters {
            sample_rate: 44100.0,
            transform_size: 0,
        };
        assert_eq!(extract(&frame_with(8, &[(3, 50.0)]), &zero_size), None);
    }

    #[test]
    fn nan_magnitudes_are_skipped() {
        let mut frame = frame_with(16, &[(5, 30.0)]);
        frame.magnitudes[2] = f32::NAN;
        assert_eq!(extract(&frame, &params()), Some(5.0 * 44100.0 / 2048.0));
    }
}
