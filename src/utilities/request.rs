use std::time::Instant;

use super::direction::Direction;

/// Where a request was raised.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Destination button inside a car.
    Internal,
    /// Up/down button on a floor.
    External,
}

/// A pending stop. The timestamp only breaks ties between requests for the same floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub floor: u8,
    pub direction: Direction,
    pub origin: Origin,
    pub created_at: Instant,
}

impl Request {
    pub fn hall(floor: u8, direction: Direction) -> Self {
        Request {
            floor: floor,
            direction: direction,
            origin: Origin::External,
            created_at: Instant::now(),
        }
    }

    /// Car-panel press; the direction is derived from where the car is when the button is pressed.
    pub fn car_panel(floor: u8, car_floor: u8) -> Self {
        let direction = if car_floor < floor { Direction::Up } else { Direction::Down };
        Request {
            floor: floor,
            direction: direction,
            origin: Origin::Internal,
            created_at: Instant::now(),
        }
    }

    pub fn is_internal(&self) -> bool {
        self.origin == Origin::Internal
    }
}
