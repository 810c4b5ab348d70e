use std::io;

use thiserror::Error;

use super::car_status::{CarId, OperationalState};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ElevatorError {
    /// Move commanded on a car that cannot take it.
    #[error("car {car} cannot move while {state}")]
    InvalidState { car: CarId, state: OperationalState },

    /// Recoverable: the caller may retry once a car frees up.
    #[error("no car is in service with spare capacity")]
    NoAvailableCar,

    #[error("floor {floor} is outside 1..={top}")]
    InvalidFloor { floor: u8, top: u8 },

    #[error("hall request at floor {floor} has no direction")]
    InvalidDirection { floor: u8 },

    #[error("car {0} is not registered")]
    UnknownCar(CarId),

    #[error("load {load} exceeds capacity {capacity} of car {car}")]
    LoadExceedsCapacity { car: CarId, load: u32, capacity: u32 },
}

/// Raised by a single observer. Logged by the controller, never propagated.
#[derive(Debug, Error)]
#[error("observer failed: {0}")]
pub struct ObserverFailure(pub String);

impl ObserverFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        ObserverFailure(reason.into())
    }
}

impl<T> From<crossbeam_channel::SendError<T>> for ObserverFailure {
    fn from(_: crossbeam_channel::SendError<T>) -> Self {
        ObserverFailure::new("event channel disconnected")
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    Io(#[from] io::Error),

    #[error("could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
