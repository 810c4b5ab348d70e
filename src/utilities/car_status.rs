use std::fmt;

use super::direction::Direction;

pub type CarId = u32;

#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub enum OperationalState {
    Idle,
    Moving,
    OutOfService,
    Maintenance,
}

impl OperationalState {
    pub fn as_string(&self) -> String {
        match self {
            OperationalState::Idle => String::from("idle"),
            OperationalState::Moving => String::from("moving"),
            OperationalState::OutOfService => String::from("outOfService"),
            OperationalState::Maintenance => String::from("maintenance"),
        }
    }

    /// Out of service and maintenance cars take no requests and are never selected.
    pub fn is_in_service(&self) -> bool {
        matches!(self, OperationalState::Idle | OperationalState::Moving)
    }
}

impl fmt::Display for OperationalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.as_string())
    }
}

/// Point-in-time copy of one car, taken under that car's lock only.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct CarStatus {
    pub id: CarId,
    pub floor: u8,
    pub direction: Direction,
    pub state: OperationalState,
    pub capacity: u32,
    pub load: u32,
    pub target: Option<u8>,
    pub ascending: Vec<u8>,
    pub descending: Vec<u8>,
}

impl CarStatus {
    pub fn has_capacity(&self) -> bool {
        self.load < self.capacity
    }

    pub fn is_available(&self) -> bool {
        self.state.is_in_service() && self.has_capacity()
    }

    pub fn pending(&self) -> usize {
        self.ascending.len() + self.descending.len()
    }
}
