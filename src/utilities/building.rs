use super::error::ElevatorError;

/// Static floor topology. Requests may target floors `1..=num_floors`; floor 0 is where cars start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Building {
    num_floors: u8,
}

impl Building {
    pub fn new(num_floors: u8) -> Self {
        Building { num_floors: num_floors }
    }

    pub fn num_floors(&self) -> u8 {
        self.num_floors
    }

    pub fn validate_floor(&self, floor: u8) -> Result<u8, ElevatorError> {
        if floor < 1 || floor > self.num_floors {
            return Err(ElevatorError::InvalidFloor { floor: floor, top: self.num_floors })
        }
        Ok(floor)
    }
}
