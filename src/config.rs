use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    #[serde(default = "default_min_decibels")]
    pub min_decibels: f32,
    #[serde(default = "default_max_decibels")]
    pub max_decibels: f32,
}

#[derive(Debug, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_size")]
    pub size: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    #[serde(default)]
    pub keep_on_restart: bool,
}

#[derive(Debug, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_target_frequency")]
    pub target_frequency: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            fft_size: default_fft_size(),
            smoothing: default_smoothing(),
            tick_rate: default_tick_rate(),
            min_decibels: default_min_decibels(),
            max_decibels: default_max_decibels(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            size: default_history_size(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            directory: default_directory(),
            keep_on_restart: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_frequency: default_target_frequency(),
        }
    }
}

pub fn default_fft_size() -> usize { 2048 }
pub fn default_smoothing() -> f32 { 0.8 }
pub fn default_tick_rate() -> u32 { 60 }
fn default_min_decibels() -> f32 { -100.0 }
fn default_max_decibels() -> f32 { -30.0 }
pub fn default_history_size() -> usize { 10 }
pub fn default_prefix() -> String { "frequencies".into() }
pub fn default_directory() -> PathBuf { PathBuf::from(".") }
pub fn default_target_frequency() -> f64 { 440.0 }

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `freqscope.toml` in the working directory, then the user config dir.
pub fn discover_config() -> Option<PathBuf> {
    let local = PathBuf::from("freqscope.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("freqscope").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("freqscope").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.capture.fft_size, 2048);
        assert_eq!(cfg.capture.smoothing, 0.8);
        assert_eq!(cfg.history.size, 10);
        assert_eq!(cfg.export.prefix, "frequencies");
        assert!(!cfg.export.keep_on_restart);
        assert_eq!(cfg.display.target_frequency, 440.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [capture]
            fft_size = 4096

            [export]
            keep_on_restart = true
            directory = "exports"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.capture.fft_size, 4096);
        assert_eq!(cfg.capture.tick_rate, 60);
        assert!(cfg.export.keep_on_restart);
        assert_eq!(cfg.export.directory, PathBuf::from("exports"));
        assert_eq!(cfg.export.prefix, "frequencies");
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let missing = load_config(Path::new("/nonexistent/freqscope.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let path = std::env::temp_dir().join(format!("freqscope-cfg-{}.toml", std::process::id()));
        std::fs::write(&path, "[history]\nsize = \"ten\"\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
        std::fs::remove_file(&path).unwrap();
    }
}
