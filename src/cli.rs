use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "freqscope", about = "Dominant-frequency tracker with CSV export")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Analyse a generated sine tone at this frequency (Hz) instead of a file
    #[arg(long, conflicts_with = "input")]
    pub tone: Option<f32>,

    /// Tone length in seconds
    #[arg(long, default_value_t = 3.0)]
    pub duration: f32,

    /// Tone sample rate in Hz
    #[arg(long, default_value_t = 44100)]
    pub tone_sample_rate: u32,

    /// FFT size (power of two, 32-32768)
    #[arg(long, default_value_t = 2048)]
    pub fft_size: usize,

    /// Per-bin smoothing time constant (0.0-1.0)
    #[arg(long, default_value_t = 0.8)]
    pub smoothing: f32,

    /// Analysis ticks per second
    #[arg(long, default_value_t = 60)]
    pub tick_rate: u32,

    /// Rows kept in the history view
    #[arg(long, default_value_t = 10)]
    pub history: usize,

    /// Target frequency overlay (Hz)
    #[arg(long, default_value_t = 440.0)]
    pub target: f64,

    /// Freeze the peak at these times (ms, comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub freeze_at: Vec<u64>,

    /// Unfreeze the peak at these times (ms, comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub unfreeze_at: Vec<u64>,

    /// Replay the capture this many times (stop and restart in between)
    #[arg(long, default_value_t = 1)]
    pub passes: u32,

    /// Keep readings and peak across restarts instead of starting fresh
    #[arg(long)]
    pub keep_on_restart: bool,

    /// Export file name (default: timestamped)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory for the CSV export
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Prefix for timestamped export names
    #[arg(long, default_value = "frequencies")]
    pub prefix: String,

    /// Skip writing the CSV export
    #[arg(long)]
    pub no_export: bool,

    /// Write every tick as JSON lines to this file
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Print a bar spectrum of the last frame
    #[arg(long)]
    pub spectrum: bool,

    /// Config file (default: ./freqscope.toml or the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
