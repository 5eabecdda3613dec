use thiserror::Error;

use crate::domain::{Color, Mode};
use crate::port::PortError;

#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("no signal registered for color={0} mode={1}")]
    UnknownSignal(Color, Mode),

    #[error(transparent)]
    Port(#[from] PortError),
}
