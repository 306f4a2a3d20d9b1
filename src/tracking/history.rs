use super::samples::Reading;

/// Rows shown in the history table unless configured otherwise.
pub const DEFAULT_HISTORY_SIZE: usize = 10;

/// The last `k` readings, most recent first.
pub fn project(readings: &[Reading], k: usize) -> Vec<Reading> {
    readings.iter().rev().take(k).copied().collect()
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn min_of_len_and_k_newest_first(len in 0usize..300, k in 0usize..400) {
            let log: Vec<Reading> = (0..len)
                .map(|i| Reading {
                    timestamp_ms: i as u64,
                    frequency: 1.0 + i as f64,
                    peak: 1.0 + i as f64,
                })
                .collect();
            let view = project(&log, k);
            prop_assert_eq!(view.len(), len.min(k));
            for (pos, r) in view.iter().enumerate() {
                prop_assert_eq!(*r, log[len - 1 - pos]);
            }
        }
    }
}
