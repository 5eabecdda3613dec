//! Signal registry: owns every task and presents the control surface.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::SignalConfig;
use crate::domain::{Color, Level, Mode};
use crate::error::BeaconError;
use crate::port::OutputPort;
use crate::status::{RegistryStatus, SignalStatus};
use crate::task::SignalTask;

/// Owns the full set of signal tasks, keyed by (color, mode).
///
/// Design:
/// - Built once at startup: both variants of every configured color spawn
///   immediately and park idle. The map structure never changes afterwards,
///   only the runtime state behind each entry.
/// - Arming is per-entry and unordered across entries. Arming both variants
///   of one color leaves them racing on their shared line; `change` is the
///   caller's tool for exclusivity.
/// - Dropping the registry without `shutdown` lets tasks notice their
///   closed channels and exit, but only `shutdown` confirms they did.
pub struct SignalRegistry {
    signals: HashMap<(Color, Mode), SignalTask>,
    config: SignalConfig,
    port: Arc<dyn OutputPort>,
}

impl SignalRegistry {
    /// Spawn one blink and one solid task per configured color. Must run
    /// inside a tokio runtime; returns once everything is spawned (tasks
    /// drive their lines off on their own schedule).
    pub fn new(port: Arc<dyn OutputPort>, config: SignalConfig) -> Self {
        let mut signals = HashMap::new();
        for (&color, spec) in &config.signals {
            for mode in [Mode::Blink, Mode::Solid] {
                let period = config.scaled_period(spec, mode);
                let task = SignalTask::spawn(color, mode, spec.line, period, Arc::clone(&port));
                signals.insert((color, mode), task);
            }
        }
        info!(signals = signals.len(), "signal registry started");
        Self {
            signals,
            config,
            port,
        }
    }

    fn get(&self, color: Color, mode: Mode) -> Result<&SignalTask, BeaconError> {
        self.signals
            .get(&(color, mode))
            .ok_or(BeaconError::UnknownSignal(color, mode))
    }

    /// Arm one signal. No other entry is touched.
    pub fn start(&self, color: Color, mode: Mode) -> Result<(), BeaconError> {
        self.get(color, mode)?.arm();
        debug!(%color, %mode, "signal armed");
        Ok(())
    }

    /// Disarm everything, then arm `(color, mode)`: at most one signal is
    /// left armed. Not atomic; a concurrent `start` can interleave between
    /// the clear and the set.
    pub fn change(&self, color: Color, mode: Mode) -> Result<(), BeaconError> {
        // Resolve first: a failed lookup must not disarm the board.
        let task = self.get(color, mode)?;
        self.stop_all();
        task.arm();
        debug!(%color, %mode, "signal changed");
        Ok(())
    }

    /// Disarm one signal. A no-op if it is already idle.
    pub fn stop(&self, color: Color, mode: Mode) -> Result<(), BeaconError> {
        self.get(color, mode)?.disarm();
        debug!(%color, %mode, "signal disarmed");
        Ok(())
    }

    /// Disarm every signal. Active tasks settle back to idle once their
    /// in-flight cycle completes.
    pub fn stop_all(&self) {
        for task in self.signals.values() {
            task.disarm();
        }
        debug!("all signals disarmed");
    }

    /// Force a color's line on, bypassing the task machinery. Unknown colors
    /// are ignored; an armed task on the same line overwrites this at its
    /// next write.
    pub async fn power_on(&self, color: Color) -> Result<(), BeaconError> {
        self.force_level(color, Level::On).await
    }

    /// Force a color's line off, bypassing the task machinery. Unknown
    /// colors are ignored.
    pub async fn power_off(&self, color: Color) -> Result<(), BeaconError> {
        self.force_level(color, Level::Off).await
    }

    async fn force_level(&self, color: Color, level: Level) -> Result<(), BeaconError> {
        let Some(spec) = self.config.signals.get(&color) else {
            return Ok(());
        };
        self.port.configure_output(spec.line).await?;
        self.port.set_level(spec.line, level).await?;
        debug!(%color, line = %spec.line, %level, "line forced");
        Ok(())
    }

    /// Snapshot of every signal, ordered by (color, mode).
    pub fn status(&self) -> RegistryStatus {
        let mut signals: Vec<SignalStatus> = self
            .signals
            .values()
            .map(|task| SignalStatus {
                color: task.color(),
                mode: task.mode(),
                armed: task.is_armed(),
                terminated: task.is_finished(),
            })
            .collect();
        signals.sort_by_key(|s| (s.color, s.mode));
        RegistryStatus { signals }
    }

    /// Two-phase teardown: request stop on every task, then join them all.
    /// Signalling everything before joining anything keeps termination
    /// concurrent across tasks. Returns only once no task can touch the
    /// output port again; each line is driven off on the way out (barring a
    /// port failure).
    pub async fn shutdown(self) {
        for task in self.signals.values() {
            task.request_stop();
        }
        for (_, task) in self.signals {
            task.join().await;
        }
        info!("signal registry shut down");
    }
}
