use std::path::{Path, PathBuf};

use thiserror::Error;

use super::samples::Reading;

pub const CSV_HEADER: &str = "timestamp_ms,frequency_hz,peak_hz";
pub const DEFAULT_EXPORT_PREFIX: &str = "frequencies";
const EXPORT_EXTENSION: &str = "csv";
const DELIMITER: char = ',';
const SEPARATOR_SUBSTITUTE: char = '-';

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export: no readings recorded")]
    Empty,
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Render readings as CSV: header, then one row per reading, oldest first.
///
/// Frequencies carry exactly two decimals and the timestamp is written as a
/// raw integer. Lines are joined by `\n` with no trailing newline. An empty
/// log is an error rather than a header-only document.
pub fn serialize(readings: &[Reading]) -> Result<String, ExportError> {
    if readings.is_empty() {
        return Err(ExportError::Empty);
    }

    let rows = readings.iter().map(|r| {
        format!(
            "{}{d}{:.2}{d}{:.2}",
            r.timestamp_ms,
            r.frequency,
            r.peak,
            d = DELIMITER
        )
    });
    let lines: Vec<String> = std::iter::once(CSV_HEADER.to_string()).chain(rows).collect();
    Ok(lines.join("\n"))
}

/// `<prefix>_<stamp>.csv`, with every non-alphanumeric character of `stamp`
/// replaced so the name sorts and survives any filesystem.
pub fn export_filename(prefix: &str, stamp: &str) -> String {
    let stamp: String = stamp
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else {
                SEPARATOR_SUBSTITUTE
            }
        })
        .collect();
    format!("{}_{}.{}", prefix, stamp, EXPORT_EXTENSION)
}

/// Export filename stamped with the current UTC time.
pub fn timestamped_filename(prefix: &str) -> String {
    export_filename(prefix, &jiff::Timestamp::now().to_string())
}

/// Serialize and write to `dir/filename`. Nothing is written when empty.
pub fn write_export(
    readings: &[Reading],
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    let payload = serialize(readings)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, payload)?;
    log::debug!("Exported {} readings to {}", readings.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(timestamp_ms: u64, frequency: f64, peak: f64) -> Reading {
        Reading {
            timestamp_ms,
            frequency,
            peak,
        }
    }

    #[test]
    fn empty_log_is_an_error() {
        assert!(matches!(serialize(&[]), Err(ExportError::Empty)));
    }

    #[test]
    fn single_reading() {
        let csv = serialize(&[reading(1000, 440.0, 440.0)]).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines, vec![CSV_HEADER, "1000,440.00,440.00"]);
    }

    #[test]
    fn rows_joined_without_trailing_newline() {
        let csv = serialize(&[reading(16, 2153.3203125, 2153.3203125), reading(33, 99.999, 2153.3203125)])
            .unwrap();
        assert_eq!(
            csv,
            "timestamp_ms,frequency_hz,peak_hz\n16,2153.32,2153.32\n33,100.00,2153.32"
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn one_line_per_reading_with_two_decimals() {
        let readings: Vec<Reading> = (0..25)
            .map(|i| reading(i * 17, 21.533203125 * i as f64 + 1.0, 2152.34375))
            .collect();
        let csv = serialize(&readings).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), readings.len() + 1);
        assert_eq!(lines[0], CSV_HEADER);

        for (line, r) in lines[1..].iter().zip(&readings) {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields.len(), 3);
            assert_eq!(fields[0], r.timestamp_ms.to_string());
            for field in &fields[1..] {
                let (_, decimals) = field.split_once('.').unwrap();
                assert_eq!(decimals.len(), 2);
            }
        }
        assert_eq!(lines[1], "0,1.00,2152.34");
    }

    #[test]
    fn filename_normalizes_separators() {
        assert_eq!(
            export_filename("frequencies", "2026-10-16T09:41:07.123Z"),
            "frequencies_2026-10-16T09-41-07-123Z.csv"
        );
        let name = timestamped_filename(DEFAULT_EXPORT_PREFIX);
        assert!(name.starts_with("frequencies_"));
        assert!(name.ends_with(".csv"));
        assert!(!name.contains(':'));
    }

    #[test]
    fn writes_file_only_when_non_empty() {
        let dir = std::env::temp_dir().join(format!("freqscope-export-{}", std::process::id()));

        let err = write_export(&[], &dir, "empty.csv").unwrap_err();
        assert!(matches!(err, ExportError::Empty));
        assert!(!dir.join("empty.csv").exists());

        let path = write_export(&[reading(5, 1.0, 2.0)], &dir, "one.csv").unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, format!("{}\n5,1.00,2.00", CSV_HEADER));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
