use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerMode {
    #[default]
    Tracking,
    Frozen,
}

/// Running maximum of observed frequencies.
///
/// The peak never decreases. Freezing suspends updates without touching the
/// held value; unfreezing resumes from it.
#[derive(Clone, Debug, Default)]
pub struct PeakTracker {
    current_peak: f64,
    mode: TrackerMode,
}

impl PeakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the peak was raised.
    pub fn observe(&mut self, frequency: f64) -> bool {
        if self.mode == TrackerMode::Tracking && frequency > self.current_peak {
            self.current_peak = frequency;
            return true;
        }
        false
    }

    /// Flip between tracking and frozen; returns the new mode.
    pub fn toggle_freeze(&mut self) -> TrackerMode {
        self.mode = match self.mode {
            TrackerMode::Tracking => TrackerMode::Frozen,
            TrackerMode::Frozen => TrackerMode::Tracking,
        };
        log::debug!("Peak tracker {:?} at {:.1} Hz", self.mode, self.current_peak);
        self.mode
    }

    pub fn current_peak(&self) -> f64 {
        self.current_peak
    }

    pub fn mode(&self) -> TrackerMode {
        self.mode
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn never_decreases_while_tracking(
            freqs in proptest::collection::vec(0.0f64..24_000.0, 0..500)
        ) {
            let mut tracker = PeakTracker::new();
            let mut previous = 0.0;
            for &f in &freqs {
                tracker.observe(f);
                prop_assert!(tracker.current_peak() >= previous);
                prop_assert!(tracker.current_peak() >= f);
                previous = tracker.current_peak();
            }
            let max = freqs.iter().copied().fold(0.0f64, f64::max);
            prop_assert_eq!(tracker.current_peak(), max);
        }

        #[test]
        fn frozen_ignores_everything(
            start in 1.0f64..1_000.0,
            freqs in proptest::collection::vec(0.0f64..24_000.0, 1..200)
        ) {
            let mut tracker = PeakTracker::new();
            tracker.observe(start);
            tracker.toggle_freeze();
            for &f in &freqs {
                prop_assert!(!tracker.observe(f));
                prop_assert_eq!(tracker.current_peak(), start);
            }
            tracker.toggle_freeze();
            tracker.observe(start + 1.0);
            prop_assert_eq!(tracker.current_peak(), start + 1.0);
        }
    }
}
