//! Read-only status views over the registry.

use serde::Serialize;

use crate::domain::{Color, Mode};

/// One signal's runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalStatus {
    pub color: Color,
    pub mode: Mode,
    /// Trigger currently set.
    pub armed: bool,
    /// Backing task has exited (after shutdown, or a port failure).
    pub terminated: bool,
}

/// Snapshot of every signal, ordered by (color, mode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStatus {
    pub signals: Vec<SignalStatus>,
}

impl RegistryStatus {
    pub fn get(&self, color: Color, mode: Mode) -> Option<&SignalStatus> {
        self.signals
            .iter()
            .find(|s| s.color == color && s.mode == mode)
    }

    pub fn armed_count(&self) -> usize {
        self.signals.iter().filter(|s| s.armed).count()
    }
}
