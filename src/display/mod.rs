pub mod console;
pub mod events;
pub mod spectrum;

use anyhow::Result;

use crate::audio::frame::SpectrumFrame;
use crate::tracking::session::TickResult;

/// Receives every processed tick. Observers only read; nothing flows back
/// into the session.
pub trait TickObserver {
    fn on_tick(&mut self, frame: &SpectrumFrame, result: &TickResult, target_frequency: f64)
        -> Result<()>;

    /// Called once after the last tick.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
