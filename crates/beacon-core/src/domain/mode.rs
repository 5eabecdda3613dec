use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::line::Level;

/// Which variant of a color a task represents.
///
/// Both variants run the same cycle; they differ only in the level the line
/// is driven to after the on-pulse.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Periodic on/off: the line swings back off after each on-pulse.
    Blink,
    /// Stays lit: the line is held on between pulses.
    Solid,
}

impl Mode {
    /// Level the line is driven to after the on-pulse each cycle.
    pub fn rest_level(self) -> Level {
        match self {
            Mode::Blink => Level::Off,
            Mode::Solid => Level::On,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Blink => "blink",
            Mode::Solid => "solid",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown mode: {0} (expected blink or solid)")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blink" => Ok(Mode::Blink),
            "solid" => Ok(Mode::Solid),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_level_distinguishes_the_variants() {
        assert_eq!(Mode::Blink.rest_level(), Level::Off);
        assert_eq!(Mode::Solid.rest_level(), Level::On);
    }

    #[test]
    fn parse_roundtrips_both_modes() {
        assert_eq!("blink".parse::<Mode>().unwrap(), Mode::Blink);
        assert_eq!("solid".parse::<Mode>().unwrap(), Mode::Solid);
        assert!("flash".parse::<Mode>().is_err());
    }
}
