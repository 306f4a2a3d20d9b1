use super::export::ExportError;
use super::history::DEFAULT_HISTORY_SIZE;
use super::peak::TrackerMode;
use super::session::{Session, TickResult};
use crate::audio::capture::{CaptureError, CaptureSource, Tick};

pub const DEFAULT_TARGET_FREQUENCY: f64 = 440.0;

#[derive(Clone, Debug)]
pub struct MonitorSettings {
    pub history_size: usize,
    /// Carry the previous session's log and peak into the next start.
    pub keep_on_restart: bool,
    pub target_frequency: f64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_HISTORY_SIZE,
            keep_on_restart: false,
            target_frequency: DEFAULT_TARGET_FREQUENCY,
        }
    }
}

/// Session lifecycle around a capture source.
///
/// A session is created only after the source starts successfully. After
/// `stop` the finished session stays readable for display and export until
/// the next `start` replaces it.
pub struct Monitor {
    settings: MonitorSettings,
    session: Option<Session>,
    running: bool,
    target_frequency: f64,
}

impl Monitor {
    pub fn new(settings: MonitorSettings) -> Self {
        let mut monitor = Self {
            target_frequency: DEFAULT_TARGET_FREQUENCY,
            settings,
            session: None,
            running: false,
        };
        let target = monitor.settings.target_frequency;
        if !monitor.set_target_frequency(target) {
            log::warn!(
                "Ignoring target frequency {}; using {} Hz",
                target,
                DEFAULT_TARGET_FREQUENCY
            );
        }
        monitor
    }

    /// Start capturing. A no-op while already running; on failure nothing
    /// changes and the call may be retried.
    pub fn start(&mut self, source: &mut dyn CaptureSource) -> Result<(), CaptureError> {
        if self.running {
            return Ok(());
        }
        let params = source.start()?;

        let session = match self.session.take() {
            Some(previous) if self.settings.keep_on_restart => {
                log::debug!(
                    "Resuming session with {} readings",
                    previous.samples().len()
                );
                previous.resume(params)
            }
            _ => Session::new(params, self.settings.history_size),
        };
        log::debug!(
            "Session started: {} Hz, transform size {}",
            params.sample_rate,
            params.transform_size
        );

        self.session = Some(session);
        self.running = true;
        Ok(())
    }

    /// Feed one tick. `None` when not running.
    pub fn process(&mut self, tick: &Tick) -> Option<TickResult> {
        if !self.running {
            return None;
        }
        let session = self.session.as_mut()?;
        Some(session.process_tick(&tick.frame, tick.timestamp_ms))
    }

    pub fn stop(&mut self, source: &mut dyn CaptureSource) {
        if !self.running {
            return;
        }
        source.stop();
        self.running = false;
        if let Some(session) = &self.session {
            log::debug!("Session stopped with {} readings", session.samples().len());
        }
    }

    /// Toggle freeze on the current session; `None` before any session.
    pub fn toggle_freeze(&mut self) -> Option<TrackerMode> {
        self.session.as_mut().map(Session::toggle_freeze)
    }

    /// Accepts finite positive values only; returns whether it was applied.
    pub fn set_target_frequency(&mut self, value: f64) -> bool {
        if !value.is_finite() || value <= 0.0 {
            log::debug!("Rejected target frequency {}", value);
            return false;
        }
        self.target_frequency = value;
        true
    }

    pub fn target_frequency(&self) -> f64 {
        self.target_frequency
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn export(&self) -> Result<String, ExportError> {
        match &self.session {
            Some(session) => session.export(),
            None => Err(ExportError::Empty),
        }
    }
}
