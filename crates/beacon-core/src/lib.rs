//! beacon-core
//!
//! Core building blocks for the beacon signal coordinator: a fixed board of
//! indicator lights, one cancellable periodic task per (color, mode) pair,
//! armed and disarmed through sticky level-triggered triggers, torn down by
//! a two-phase stop-all-then-join-all shutdown.
//!
//! # Module map
//! - **domain**: colors, modes, physical line ids and levels
//! - **config**: the startup table (color -> line, periods, time-unit scale)
//! - **port**: the output-line capability seam + in-memory recording impl
//! - **task**: the per-(color, mode) state machine and its handle
//! - **registry**: ownership of all tasks and the external control surface
//! - **status**: read-only snapshots for callers
//! - **error**: library error type

pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod registry;
pub mod status;
pub mod task;

pub use self::config::{LineSpec, SignalConfig};
pub use self::domain::{Color, Level, LineId, Mode};
pub use self::error::BeaconError;
pub use self::port::{MemoryPort, OutputPort, PortError};
pub use self::registry::SignalRegistry;
pub use self::status::{RegistryStatus, SignalStatus};
pub use self::task::SignalTask;
