use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ControlResult;

/// Startup configuration: board geometry, motion profile and clock default.
/// Loaded from JSON when a file is present, otherwise the built-in defaults
/// apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Square pitch of the playing surface.
    pub square_size_mm: f32,
    /// Offset of the a1 square center from the homed carriage position. The
    /// margin doubles as the discard lane for captured pieces.
    pub start_offset_x_mm: f32,
    pub start_offset_y_mm: f32,
    pub steps_per_mm: f32,
    /// Step pulse interval for calibration moves.
    pub step_delay_slow_us: u32,
    /// Step pulse interval for normal play moves.
    pub step_delay_fast_us: u32,
    /// Settle time after a multiplexer channel select before the signal
    /// line is valid.
    pub mux_settle_us: u32,
    /// Per-side clock default, carried as a raw mm:ss pair. Seconds above 59
    /// spill into whole minutes when the clock is built.
    pub clock_minutes: u8,
    pub clock_seconds: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            square_size_mm: 39.0,
            start_offset_x_mm: 58.5,
            start_offset_y_mm: 58.5,
            steps_per_mm: 5.0,
            step_delay_slow_us: 3000,
            step_delay_fast_us: 1000,
            mux_settle_us: 50,
            clock_minutes: 9,
            clock_seconds: 60,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> ControlResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> ControlResult<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hardware_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.step_delay_slow_us, 3000);
        assert_eq!(cfg.step_delay_fast_us, 1000);
        assert_eq!(cfg.clock_minutes, 9);
        assert_eq!(cfg.clock_seconds, 60);
    }

    #[test]
    fn json_round_trip() {
        let cfg = Config::default();
        let text = serde_json::to_string(&cfg).unwrap();
        let back: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"square_size_mm": 50.0}"#).unwrap();
        assert_eq!(cfg.square_size_mm, 50.0);
        assert_eq!(cfg.steps_per_mm, Config::default().steps_per_mm);
    }
}
