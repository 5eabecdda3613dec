//! Output port: the physical-line capability and an in-memory implementation.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::{Level, LineId};

/// Failure reported by an output port. Fatal to the task that hits it: the
/// task's loop propagates it and exits, nothing retries.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("line {0} is not configured as an output")]
    NotConfigured(LineId),

    #[error("driver error on line {line}: {message}")]
    Driver { line: LineId, message: String },
}

/// The physical-line capability injected into the registry.
///
/// Design intent:
/// - This is the seam for swapping the real driver (GPIO bank, port
///   expander, ...) without touching task or registry code.
/// - One shared instance serves every task. There is no locking around a
///   line: two armed variants of the same color race on their shared line,
///   which the registry documents rather than prevents.
#[async_trait]
pub trait OutputPort: Send + Sync {
    /// Configure a line for output. Each task calls this once before its
    /// first write; the power overrides call it again before theirs.
    async fn configure_output(&self, line: LineId) -> Result<(), PortError>;

    /// Drive a line to a level.
    async fn set_level(&self, line: LineId, level: Level) -> Result<(), PortError>;
}

/// In-memory port state.
#[derive(Default)]
struct MemoryPortState {
    configured: HashSet<LineId>,
    levels: HashMap<LineId, Level>,
    history: Vec<(LineId, Level)>,
    failing: HashSet<LineId>,
}

/// Recording implementation for tests and embedders without hardware.
///
/// Every write is kept in order, so observable behaviour (pulses, rest
/// levels, final states) can be asserted after the fact.
#[derive(Default)]
pub struct MemoryPort {
    state: Mutex<MemoryPortState>,
}

impl MemoryPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation on `line` fail with a driver error.
    pub async fn fail_line(&self, line: LineId) {
        let mut state = self.state.lock().await;
        state.failing.insert(line);
    }

    /// Current level of a line, if it has ever been driven.
    pub async fn level(&self, line: LineId) -> Option<Level> {
        let state = self.state.lock().await;
        state.levels.get(&line).copied()
    }

    /// Every level the line was driven to, oldest first.
    pub async fn history(&self, line: LineId) -> Vec<Level> {
        let state = self.state.lock().await;
        state
            .history
            .iter()
            .filter(|(l, _)| *l == line)
            .map(|(_, level)| *level)
            .collect()
    }

    /// Total number of writes across all lines.
    pub async fn write_count(&self) -> usize {
        let state = self.state.lock().await;
        state.history.len()
    }

    pub async fn is_configured(&self, line: LineId) -> bool {
        let state = self.state.lock().await;
        state.configured.contains(&line)
    }
}

#[async_trait]
impl OutputPort for MemoryPort {
    async fn configure_output(&self, line: LineId) -> Result<(), PortError> {
        let mut state = self.state.lock().await;
        if state.failing.contains(&line) {
            return Err(PortError::Driver {
                line,
                message: "injected failure".to_string(),
            });
        }
        state.configured.insert(line);
        Ok(())
    }

    async fn set_level(&self, line: LineId, level: Level) -> Result<(), PortError> {
        let mut state = self.state.lock().await;
        if state.failing.contains(&line) {
            return Err(PortError::Driver {
                line,
                message: "injected failure".to_string(),
            });
        }
        if !state.configured.contains(&line) {
            return Err(PortError::NotConfigured(line));
        }
        state.levels.insert(line, level);
        state.history.push((line, level));
        Ok(())
    }
}
