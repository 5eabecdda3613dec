//! Signal configuration: the fixed startup table.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{Color, LineId, Mode};

fn default_period() -> f64 {
    1.0
}

fn default_time_unit() -> f64 {
    1.0
}

/// Wiring and timing for one color.
///
/// Periods are half-cycles in time-units: a full on/off cycle takes twice
/// the period.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LineSpec {
    /// Physical output line for this color.
    pub line: LineId,

    /// Half-cycle of the blink variant.
    #[serde(default = "default_period")]
    pub blink_period: f64,

    /// Half-cycle of the solid variant.
    #[serde(default = "default_period")]
    pub solid_period: f64,
}

impl LineSpec {
    /// Half-cycle for one variant, in time-units.
    pub fn period(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Blink => self.blink_period,
            Mode::Solid => self.solid_period,
        }
    }
}

/// The signal table handed to the registry at startup.
///
/// Structure is immutable after construction: entries are never added or
/// removed, only their tasks' runtime state changes.
#[derive(Debug, Clone, Deserialize)]
pub struct SignalConfig {
    /// Color -> wiring/timing.
    pub signals: HashMap<Color, LineSpec>,

    /// Real seconds per time-unit. Scales every period at spawn; tests and
    /// demos compress time here instead of editing the table.
    #[serde(default = "default_time_unit")]
    pub time_unit: f64,
}

impl Default for SignalConfig {
    /// The stock four-color board. Solid red and solid blue run the faster
    /// half-unit cycle; every other variant cycles at one unit.
    fn default() -> Self {
        let mut signals = HashMap::new();
        signals.insert(
            Color::Red,
            LineSpec {
                line: LineId::new(1),
                blink_period: 1.0,
                solid_period: 0.5,
            },
        );
        signals.insert(
            Color::Yellow,
            LineSpec {
                line: LineId::new(2),
                blink_period: 1.0,
                solid_period: 1.0,
            },
        );
        signals.insert(
            Color::Green,
            LineSpec {
                line: LineId::new(3),
                blink_period: 1.0,
                solid_period: 1.0,
            },
        );
        signals.insert(
            Color::Blue,
            LineSpec {
                line: LineId::new(4),
                blink_period: 1.0,
                solid_period: 0.5,
            },
        );
        Self {
            signals,
            time_unit: 1.0,
        }
    }
}

impl SignalConfig {
    /// Parse a table from JSON, e.g.
    /// `{"signals": {"red": {"line": 1, "solid_period": 0.5}}}`.
    /// Omitted periods default to one time-unit.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Wall-clock half-cycle for one variant.
    pub fn scaled_period(&self, spec: &LineSpec, mode: Mode) -> Duration {
        Duration::from_secs_f64(spec.period(mode) * self.time_unit)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::red(Color::Red, 1, 0.5)]
    #[case::yellow(Color::Yellow, 2, 1.0)]
    #[case::green(Color::Green, 3, 1.0)]
    #[case::blue(Color::Blue, 4, 0.5)]
    fn default_table_matches_the_board(
        #[case] color: Color,
        #[case] line: u8,
        #[case] solid_period: f64,
    ) {
        let config = SignalConfig::default();
        let spec = config.signals[&color];
        assert_eq!(spec.line, LineId::new(line));
        assert_eq!(spec.period(Mode::Blink), 1.0);
        assert_eq!(spec.period(Mode::Solid), solid_period);
    }

    #[test]
    fn from_json_fills_period_defaults() {
        let config = SignalConfig::from_json(
            r#"{"signals": {"red": {"line": 9, "solid_period": 0.5}}}"#,
        )
        .unwrap();

        assert_eq!(config.signals.len(), 1);
        let spec = config.signals[&Color::Red];
        assert_eq!(spec.line, LineId::new(9));
        assert_eq!(spec.blink_period, 1.0);
        assert_eq!(spec.solid_period, 0.5);
        assert_eq!(config.time_unit, 1.0);
    }

    #[test]
    fn time_unit_scales_periods() {
        let mut config = SignalConfig::default();
        config.time_unit = 0.1;
        let spec = config.signals[&Color::Red];

        assert_eq!(
            config.scaled_period(&spec, Mode::Solid),
            Duration::from_millis(50)
        );
        assert_eq!(
            config.scaled_period(&spec, Mode::Blink),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn from_json_rejects_unknown_colors() {
        assert!(SignalConfig::from_json(r#"{"signals": {"purple": {"line": 5}}}"#).is_err());
    }
}
