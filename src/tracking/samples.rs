use serde::Serialize;

/// One valid tick: instantaneous frequency plus the peak held at that moment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Reading {
    /// ms since the session reference point
    pub timestamp_ms: u64,
    pub frequency: f64,
    pub peak: f64,
}

/// Append-only, insertion-ordered record of readings.
///
/// Unbounded: it grows for as long as the session lives.
#[derive(Clone, Debug, Default)]
pub struct SampleLog {
    readings: Vec<Reading>,
}

impl SampleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, reading: Reading) {
        self.readings.push(reading);
    }

    /// Every reading, oldest first.
    pub fn snapshot_all(&self) -> &[Reading] {
        &self.readings
    }

    pub fn last(&self) -> Option<&Reading> {
        self.readings.last()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
