//! Signal task: one cancellable periodic unit per (color, mode).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error};

use crate::domain::{Color, Level, LineId, Mode};
use crate::port::{OutputPort, PortError};

/// Handle to one spawned signal task.
///
/// The trigger is level-triggered and sticky: once `arm` sets it, the task
/// keeps cycling until `disarm` clears it, independent of when the task gets
/// around to looking. Trigger and stop channels are created with the task
/// and live exactly as long as it; nothing is ever recreated.
pub struct SignalTask {
    color: Color,
    mode: Mode,
    line: LineId,
    trigger_tx: watch::Sender<bool>,
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SignalTask {
    /// Spawn the task. Before its first idle park the line is configured as
    /// an output and driven off; `period` is the half-cycle sleep.
    pub fn spawn(
        color: Color,
        mode: Mode,
        line: LineId,
        period: Duration,
        port: Arc<dyn OutputPort>,
    ) -> Self {
        let (trigger_tx, trigger_rx) = watch::channel(false);
        let (stop_tx, stop_rx) = watch::channel(false);

        let join = tokio::spawn(async move {
            match signal_loop(line, mode.rest_level(), period, port, trigger_rx, stop_rx).await {
                Ok(()) => debug!(%color, %mode, %line, "signal task terminated"),
                // Port failures are fatal to this task only: no retry, no
                // restart, the rest of the board keeps running.
                Err(e) => {
                    error!(%color, %mode, %line, error = %e, "signal task died on port failure")
                }
            }
        });

        Self {
            color,
            mode,
            line,
            trigger_tx,
            stop_tx,
            join,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    /// Set the trigger. A task parked in idle wakes immediately; an already
    /// cycling task just keeps going.
    pub fn arm(&self) {
        // ignore send error: the receiver is only gone if the task exited
        let _ = self.trigger_tx.send(true);
    }

    /// Clear the trigger. Non-preemptive: an in-flight cycle finishes its
    /// sleeps before the task settles back to idle.
    pub fn disarm(&self) {
        let _ = self.trigger_tx.send(false);
    }

    /// Current trigger level.
    pub fn is_armed(&self) -> bool {
        *self.trigger_tx.borrow()
    }

    /// Request termination. Unblocks an idle park; a task mid-cycle exits at
    /// its next loop head. The line is driven off on the way out.
    pub fn request_stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// True once the backing task has exited (after `request_stop`, or after
    /// a port failure killed it).
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the backing task to exit. Call `request_stop` first, or this
    /// waits forever.
    pub async fn join(self) {
        let _ = self.join.await;
    }
}

/// The per-(color, mode) state machine.
///
/// Idle holds the line off and parks on the trigger; armed runs the on/rest
/// cycle; stop is observed at the loop head and on the idle park, never
/// mid-sleep. The two sleeps are deliberately plain `sleep` calls: a
/// disarm or stop request waits out the in-flight half-cycle, which bounds
/// teardown latency at roughly two periods per task.
async fn signal_loop(
    line: LineId,
    rest: Level,
    period: Duration,
    port: Arc<dyn OutputPort>,
    mut trigger_rx: watch::Receiver<bool>,
    mut stop_rx: watch::Receiver<bool>,
) -> Result<(), PortError> {
    port.configure_output(line).await?;
    port.set_level(line, Level::Off).await?;

    loop {
        if *stop_rx.borrow() {
            break;
        }

        // Idle: hold the line off until armed. Stop wins the park so a
        // disarmed task can still be torn down.
        port.set_level(line, Level::Off).await?;
        tokio::select! {
            armed = trigger_rx.wait_for(|armed| *armed) => {
                // A closed trigger means the owning handle is gone: stop.
                if armed.is_err() {
                    break;
                }
            }
            _ = stop_rx.wait_for(|stop| *stop) => break,
        }

        // Active: one full cycle. On-pulse, then the variant's rest level
        // (a solid task stays lit, a blink task swings back off).
        port.set_level(line, Level::On).await?;
        sleep(period).await;
        port.set_level(line, rest).await?;
        sleep(period).await;
    }

    port.set_level(line, Level::Off).await
}
