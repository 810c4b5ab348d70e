/// ----- CAR MODULE -----
/// Physical state of one elevator car and its stepwise motion. The car does
/// not know about observers; every mutation returns the events it caused and
/// the owning controller publishes them.

use log::{debug, info};

use crate::utilities::car_status::{CarId, OperationalState};
use crate::utilities::direction::Direction;
use crate::utilities::error::ElevatorError;
use crate::utilities::events::CarEvent;

#[derive(Debug, Clone)]
pub struct Car {
    id: CarId,
    floor: u8,
    direction: Direction,
    state: OperationalState,
    capacity: u32,
    load: u32,
    target: Option<u8>,
}

impl Car {
    pub fn new(id: CarId, capacity: u32) -> Self {
        Car {
            id: id,
            floor: 0,
            direction: Direction::Stop,
            state: OperationalState::Idle,
            capacity: capacity,
            load: 0,
            target: None,
        }
    }

    pub fn id(&self) -> CarId {
        self.id
    }

    pub fn floor(&self) -> u8 {
        self.floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> OperationalState {
        self.state
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn load(&self) -> u32 {
        self.load
    }

    pub fn target(&self) -> Option<u8> {
        self.target
    }

    pub fn has_capacity(&self) -> bool {
        self.load < self.capacity
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn set_load(&mut self, load: u32) -> Result<(), ElevatorError> {
        if load > self.capacity {
            return Err(ElevatorError::LoadExceedsCapacity { car: self.id, load: load, capacity: self.capacity })
        }
        self.load = load;
        Ok(())
    }

    /// Commits the car to `destination`. Moving to the current floor completes at once
    /// without any floor change.
    pub fn move_to_floor(&mut self, destination: u8) -> Result<Vec<CarEvent>, ElevatorError> {
        if self.state != OperationalState::Idle {
            return Err(ElevatorError::InvalidState { car: self.id, state: self.state })
        }

        if destination == self.floor {
            info!("Car #{} already at floor {}", self.id, destination);
            return Ok(vec![CarEvent::RequestCompleted { car: self.id, floor: destination }])
        }

        self.direction = Direction::between(self.floor, destination);
        self.state = OperationalState::Moving;
        self.target = Some(destination);
        debug!("Car #{} leaving floor {} for floor {} ({})", self.id, self.floor, destination, self.direction);
        Ok(vec![CarEvent::StateChanged { car: self.id, state: OperationalState::Moving }])
    }

    /// Advances one floor towards the target. No-op unless moving.
    pub fn step(&mut self) -> Vec<CarEvent> {
        let target = match (self.state, self.target) {
            (OperationalState::Moving, Some(target)) => target,
            _ => return Vec::new(),
        };

        let mut events = Vec::new();
        if self.floor != target {
            self.floor = match self.direction {
                Direction::Up => self.floor + 1,
                _ => self.floor - 1,
            };
            events.push(CarEvent::FloorChanged { car: self.id, floor: self.floor, direction: self.direction });
        }

        if self.floor == target {
            info!("Car #{} arrived at floor {}", self.id, target);
            self.state = OperationalState::Idle;
            self.target = None;
            events.push(CarEvent::StateChanged { car: self.id, state: OperationalState::Idle });
            events.push(CarEvent::RequestCompleted { car: self.id, floor: target });
        }
        events
    }

    /// Takes the car out of service (or back in, with `Idle`). Any move in progress is abandoned
    /// where the car stands.
    pub fn set_operational_state(&mut self, state: OperationalState) -> Vec<CarEvent> {
        if state == self.state {
            return Vec::new()
        }
        if state != OperationalState::Moving {
            self.target = None;
            self.direction = Direction::Stop;
        }
        self.state = state;
        vec![CarEvent::StateChanged { car: self.id, state: state }]
    }
}
