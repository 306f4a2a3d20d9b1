mod audio;
mod cli;
mod config;
mod display;
mod schedule;
mod tracking;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use audio::analyser::AnalyserSettings;
use audio::capture::{AnalysedCapture, CaptureSource, Signal};
use cli::Cli;
use config::Config;
use display::console::{format_frequency, format_history, format_peak, ConsoleStatus};
use display::events;
use display::spectrum::SpectrumView;
use display::TickObserver;
use schedule::FreezeSchedule;
use tracking::export::{self, ExportError};
use tracking::monitor::{Monitor, MonitorSettings};

const SPECTRUM_WIDTH: usize = 64;
const SPECTRUM_HEIGHT: usize = 12;

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();

    // Explicit --config must load; an auto-detected one is best effort
    let config = match cli.config.clone() {
        Some(path) => {
            let cfg = config::load_config(&path)?;
            log::info!("Loaded config from {}", path.display());
            Some(cfg)
        }
        None => config::discover_config().and_then(|path| match config::load_config(&path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                Some(cfg)
            }
            Err(err) => {
                log::warn!("{}", err);
                None
            }
        }),
    };
    let mut analyser = AnalyserSettings::default();
    if let Some(cfg) = config {
        merge_config(&mut cli, &mut analyser, cfg);
    }
    analyser.fft_size = cli.fft_size;
    analyser.smoothing = cli.smoothing;

    let signal = match (&cli.input, cli.tone) {
        (Some(path), _) => Signal::File(path.clone()),
        (None, Some(frequency)) => Signal::Tone {
            frequency,
            duration: cli.duration,
            sample_rate: cli.tone_sample_rate,
        },
        (None, None) => anyhow::bail!("Provide an input audio file or --tone <HZ>"),
    };

    log::info!("freqscope - dominant frequency tracker");
    match &signal {
        Signal::File(path) => log::info!("Input: {}", path.display()),
        Signal::Tone { frequency, duration, .. } => {
            log::info!("Input: {:.1} Hz tone, {:.1}s", frequency, duration)
        }
    }
    log::info!(
        "FFT size {}, smoothing {:.2}, {} ticks/s",
        analyser.fft_size,
        analyser.smoothing,
        cli.tick_rate
    );

    let mut capture = AnalysedCapture::new(signal, analyser, cli.tick_rate);
    let mut monitor = Monitor::new(MonitorSettings {
        history_size: cli.history,
        keep_on_restart: cli.keep_on_restart,
        target_frequency: cli.target,
    });
    let mut schedule = FreezeSchedule::new(&cli.freeze_at, &cli.unfreeze_at);

    let mut status = ConsoleStatus::default();
    let mut event_log = cli.events.as_deref().map(events::create_file).transpose()?;
    let mut spectrum: Option<SpectrumView> = None;

    for pass in 0..cli.passes.max(1) {
        monitor
            .start(&mut capture)
            .context("Could not start capture")?;
        if cli.passes > 1 {
            log::info!("Pass {}/{}", pass + 1, cli.passes);
        }

        if cli.spectrum {
            if let Some(session) = monitor.session() {
                spectrum = Some(SpectrumView::new(
                    *session.params(),
                    SPECTRUM_WIDTH,
                    SPECTRUM_HEIGHT,
                ));
            }
        }

        let pb = ProgressBar::new(capture.remaining() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ticks ({eta} remaining)",
            )?
            .progress_chars("=>-"),
        );

        schedule.rewind();
        while let Some(tick) = capture.next_tick() {
            schedule.apply(tick.timestamp_ms, &mut monitor);
            if let Some(result) = monitor.process(&tick) {
                let target = monitor.target_frequency();
                let mut sinks: Vec<&mut dyn TickObserver> = vec![&mut status];
                if let Some(writer) = event_log.as_mut() {
                    sinks.push(writer);
                }
                if let Some(view) = spectrum.as_mut() {
                    sinks.push(view);
                }
                for sink in sinks {
                    sink.on_tick(&tick.frame, &result, target)?;
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        monitor.stop(&mut capture);
    }

    if let Some(writer) = event_log.as_mut() {
        writer.finish()?;
    }

    log::info!("Processed {} ticks, {} readings", status.ticks, status.readings);

    let Some(session) = monitor.session() else {
        anyhow::bail!("No capture session was started");
    };

    println!("Frequency: {}", format_frequency(session.frequency()));
    println!("Peak:      {}", format_peak(session.peak(), session.samples().len()));
    println!();
    println!("{}", format_history(&session.history()));

    if let Some(bars) = spectrum.as_ref().and_then(SpectrumView::render) {
        println!();
        println!("{}", bars);
    }

    if cli.no_export {
        return Ok(());
    }

    let filename = cli
        .output
        .clone()
        .unwrap_or_else(|| export::timestamped_filename(&cli.prefix));
    match export::write_export(session.samples().snapshot_all(), &cli.export_dir, &filename) {
        Ok(path) => log::info!("Exported {} readings to {}", session.samples().len(), path.display()),
        Err(ExportError::Empty) => log::warn!("{}", ExportError::Empty),
        Err(err) => return Err(err).context("CSV export failed"),
    }

    Ok(())
}

/// Config values apply only where the CLI is still at its default.
fn merge_config(cli: &mut Cli, analyser: &mut AnalyserSettings, cfg: Config) {
    if cli.fft_size == config::default_fft_size() { cli.fft_size = cfg.capture.fft_size; }
    if cli.smoothing == config::default_smoothing() { cli.smoothing = cfg.capture.smoothing; }
    if cli.tick_rate == config::default_tick_rate() { cli.tick_rate = cfg.capture.tick_rate; }
    if cli.history == config::default_history_size() { cli.history = cfg.history.size; }
    if cli.target == config::default_target_frequency() {
        cli.target = cfg.display.target_frequency;
    }
    if cli.prefix == config::default_prefix() { cli.prefix = cfg.export.prefix; }
    if cli.export_dir == config::default_directory() { cli.export_dir = cfg.export.directory; }
    if !cli.keep_on_restart { cli.keep_on_restart = cfg.export.keep_on_restart; }
    analyser.min_decibels = cfg.capture.min_decibels;
    analyser.max_decibels = cfg.capture.max_decibels;
}
