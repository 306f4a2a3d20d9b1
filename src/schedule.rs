use crate::tracking::monitor::Monitor;
use crate::tracking::peak::TrackerMode;

/// Timed freeze and unfreeze requests, replayed against tick timestamps.
pub struct FreezeSchedule {
    /// (time ms, desired mode), sorted by time
    events: Vec<(u64, TrackerMode)>,
    next: usize,
}

impl FreezeSchedule {
    pub fn new(freeze_at: &[u64], unfreeze_at: &[u64]) -> Self {
        let mut events: Vec<(u64, TrackerMode)> = freeze_at
            .iter()
            .map(|&t| (t, TrackerMode::Frozen))
            .chain(unfreeze_at.iter().map(|&t| (t, TrackerMode::Tracking)))
            .collect();
        events.sort_by_key(|&(t, _)| t);
        Self { events, next: 0 }
    }

    /// Start over for a new capture pass.
    pub fn rewind(&mut self) {
        self.next = 0;
    }

    /// Toggle the monitor for every request due at `timestamp_ms` whose
    /// mode differs from the current one.
    pub fn apply(&mut self, timestamp_ms: u64, monitor: &mut Monitor) {
        while let Some(&(at, wanted)) = self.events.get(self.next) {
            if at > timestamp_ms {
                break;
            }
            self.next += 1;
            let current = monitor.session().map(|s| s.mode());
            if current.is_some_and(|mode| mode != wanted) {
                monitor.toggle_freeze();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::capture::{AnalysedCapture, Signal};
    use crate::audio::analyser::AnalyserSettings;
    use crate::tracking::monitor::MonitorSettings;

    fn running_monitor() -> (Monitor, AnalysedCapture) {
        let mut capture = AnalysedCapture::new(
            Signal::Tone {
                frequency: 1000.0,
                duration: 0.2,
                sample_rate: 8000,
            },
            AnalyserSettings::default(),
            10,
        );
        let mut monitor = Monitor::new(MonitorSettings::default());
        monitor.start(&mut capture).unwrap();
        (monitor, capture)
    }

    fn mode(monitor: &Monitor) -> TrackerMode {
        monitor.session().unwrap().mode()
    }

    #[test]
    fn applies_requests_in_time_order() {
        let (mut monitor, mut capture) = running_monitor();
        let mut schedule = FreezeSchedule::new(&[300, 100], &[200]);

        schedule.apply(50, &mut monitor);
        assert_eq!(mode(&monitor), TrackerMode::Tracking);
        schedule.apply(100, &mut monitor);
        assert_eq!(mode(&monitor), TrackerMode::Frozen);
        schedule.apply(250, &mut monitor);
        assert_eq!(mode(&monitor), TrackerMode::Tracking);
        schedule.apply(1000, &mut monitor);
        assert_eq!(mode(&monitor), TrackerMode::Frozen);

        monitor.stop(&mut capture);
    }

    #[test]
    fn redundant_requests_do_not_toggle() {
        let (mut monitor, _capture) = running_monitor();
        let mut schedule = FreezeSchedule::new(&[10, 20], &[]);
        schedule.apply(30, &mut monitor);
        assert_eq!(mode(&monitor), TrackerMode::Frozen);

        schedule.rewind();
        schedule.apply(30, &mut monitor);
        assert_eq!(mode(&monitor), TrackerMode::Frozen);
    }
}
