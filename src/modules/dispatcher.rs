/// ----- DISPATCHER MODULE -----
/// Entry point for hall and car-panel presses. Hall requests are scored
/// against every available car and handed to the best one; car-panel requests
/// go straight to their car. The roster lock is only held long enough to copy
/// the list of controllers, and each car is read under its own lock, so a
/// scoring pass may see one car a tick older than another.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::{info, warn};

use crate::modules::car::Car;
use crate::modules::controller::CarController;
use crate::utilities::building::Building;
use crate::utilities::car_status::{CarId, CarStatus, OperationalState};
use crate::utilities::direction::Direction;
use crate::utilities::error::ElevatorError;
use crate::utilities::events::Observer;
use crate::utilities::request::Request;

pub type CarHandle = Arc<CarController>;

const IDLE_BONUS: i64 = 50;
const SAME_DIRECTION_BONUS: i64 = 30;
const LOAD_PENALTY: i64 = 5;

/// Lower is better.
pub fn score(car: &CarStatus, floor: u8, direction: Direction) -> i64 {
    let mut score = (floor as i64 - car.floor as i64).abs();
    if car.state == OperationalState::Idle {
        score -= IDLE_BONUS;
    }
    let on_the_way = match direction {
        Direction::Up => car.floor <= floor,
        Direction::Down => car.floor >= floor,
        Direction::Stop => false,
    };
    if car.direction == direction && on_the_way {
        score -= SAME_DIRECTION_BONUS;
    }
    score + LOAD_PENALTY * car.load as i64
}

pub struct ElevatorSystem {
    building: Building,
    controllers: RwLock<Vec<CarHandle>>,
    next_id: AtomicU32,
}

impl ElevatorSystem {
    pub fn new(building: Building) -> Self {
        ElevatorSystem {
            building: building,
            controllers: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(1),
        }
    }

    pub fn building(&self) -> Building {
        self.building
    }

    /// Registers a new car at floor 0. Ids are handed out in registration order starting at 1.
    pub fn register_car(&self, capacity: u32) -> CarHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let controller = Arc::new(CarController::new(Car::new(id, capacity)));
        self.controllers.write().unwrap_or_else(PoisonError::into_inner).push(controller.clone());
        info!("Registered car #{} with capacity {}", id, capacity);
        controller
    }

    /// Cars in registration order.
    pub fn cars(&self) -> Vec<CarHandle> {
        self.controllers.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn car(&self, id: CarId) -> Result<CarHandle, ElevatorError> {
        self.cars()
            .into_iter()
            .find(|car| car.id() == id)
            .ok_or(ElevatorError::UnknownCar(id))
    }

    pub fn statuses(&self) -> Vec<CarStatus> {
        self.cars().iter().map(|car| car.status()).collect()
    }

    /// Subscribes `observer` to every car registered so far.
    pub fn subscribe_all(&self, observer: Observer) {
        for car in self.cars() {
            car.subscribe(observer.clone());
        }
    }

    /// Best in-service car with spare capacity. Ties go to the car registered first.
    pub fn select_best_car(&self, floor: u8, direction: Direction) -> Result<CarHandle, ElevatorError> {
        let mut best: Option<(i64, CarHandle)> = None;
        for car in self.cars() {
            let status = car.status();
            if !status.is_available() {
                continue
            }
            let car_score = score(&status, floor, direction);
            if best.as_ref().map_or(true, |(best_score, _)| car_score < *best_score) {
                best = Some((car_score, car));
            }
        }
        best.map(|(_, car)| car).ok_or(ElevatorError::NoAvailableCar)
    }

    /// Hall press. A car that goes out of service between selection and
    /// admission drops the request; selection is then retried without it.
    pub fn submit_external_request(&self, floor: u8, direction: Direction) -> Result<CarHandle, ElevatorError> {
        self.building.validate_floor(floor)?;
        if !direction.is_travelling() {
            return Err(ElevatorError::InvalidDirection { floor: floor })
        }

        let request = Request::hall(floor, direction);
        for _ in 0..=self.cars().len() {
            let car = self.select_best_car(floor, direction)?;
            if car.add_request(request) {
                info!("Hall request floor {} {} assigned to car #{}", floor, direction, car.id());
                return Ok(car)
            }
            warn!("Car #{} left service before taking floor {}, selecting again", car.id(), floor);
        }
        Err(ElevatorError::NoAvailableCar)
    }

    /// Car-panel press inside car `car_id`.
    pub fn submit_internal_request(&self, floor: u8, car_id: CarId) -> Result<CarHandle, ElevatorError> {
        self.building.validate_floor(floor)?;
        let car = self.car(car_id)?;

        let request = Request::car_panel(floor, car.status().floor);
        if car.add_request(request) {
            info!("Internal request added: floor {} for car #{}", floor, car_id);
        } else {
            warn!("Car #{} is out of service, internal request for floor {} dropped", car_id, floor);
        }
        Ok(car)
    }

    pub fn set_load(&self, car_id: CarId, load: u32) -> Result<(), ElevatorError> {
        self.car(car_id)?.set_load(load)
    }

    /// Takes a car out of service. Its pending hall requests, including the one
    /// it was travelling to, are dispatched again to the remaining cars; its
    /// car-panel requests are dropped.
    pub fn set_out_of_service(&self, car_id: CarId, reason: OperationalState) -> Result<Vec<Request>, ElevatorError> {
        let drained = self.car(car_id)?.set_out_of_service(reason)?;
        for request in &drained {
            if request.is_internal() {
                warn!("Dropping car-panel request for floor {} in car #{}", request.floor, car_id);
            } else if let Err(e) = self.submit_external_request(request.floor, request.direction) {
                warn!("Could not reassign hall request for floor {} from car #{}: {}", request.floor, car_id, e);
            }
        }
        Ok(drained)
    }

    pub fn return_to_service(&self, car_id: CarId) -> Result<(), ElevatorError> {
        self.car(car_id)?.return_to_service();
        Ok(())
    }

    /// Advances every moving car one floor. Returns how many are still moving.
    pub fn tick(&self) -> usize {
        self.cars().iter().filter(|car| car.tick()).count()
    }
}
