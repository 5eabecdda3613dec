use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one physical output line.
///
/// Fixed per color at configuration time; a task's line never changes after
/// creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LineId(u8);

impl LineId {
    pub fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Line level, inverted logic: the light is on when the line is driven low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Line driven low (0): light on.
    On,
    /// Line driven high (1): light off. Every line starts and ends here.
    Off,
}

impl Level {
    /// Wire value for this level.
    pub fn as_u8(self) -> u8 {
        match self {
            Level::On => 0,
            Level::Off => 1,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::On => f.write_str("on"),
            Level::Off => f.write_str("off"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_follow_the_inverted_wire_convention() {
        assert_eq!(Level::On.as_u8(), 0);
        assert_eq!(Level::Off.as_u8(), 1);
    }
}
