/// ----- CONTROLLER MODULE -----
/// Owns one car and its request queues behind a single lock. Admission, the
/// SCAN decision step and each motion tick run inside that lock, so two
/// requests arriving together can never both see an idle car and dispatch it
/// twice. Only this car's lock is ever taken here; no code path holds two
/// cars' locks at once.
///
/// Events are queued in the same critical section that produced them and
/// delivered after the lock is released, in production order. Observers may
/// therefore call back into the controller.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use log::{debug, info, warn};

use crate::modules::car::Car;
use crate::utilities::car_status::{CarId, CarStatus, OperationalState};
use crate::utilities::direction::Direction;
use crate::utilities::error::ElevatorError;
use crate::utilities::events::{CarEvent, Observer, ObserverList, SubscriberId};
use crate::utilities::request::Request;
use crate::utilities::request_queues::{Bucket, RequestQueues};

struct ControllerState {
    car: Car,
    queues: RequestQueues,
    // request behind the car's current target, if the move came from one
    in_flight: Option<Request>,
    outbox: VecDeque<CarEvent>,
}

pub struct CarController {
    id: CarId,
    state: Mutex<ControllerState>,
    observers: RwLock<ObserverList>,
    delivering: AtomicBool,
}

impl CarController {
    pub fn new(car: Car) -> Self {
        CarController {
            id: car.id(),
            state: Mutex::new(ControllerState {
                car: car,
                queues: RequestQueues::new(),
                in_flight: None,
                outbox: VecDeque::new(),
            }),
            observers: RwLock::new(ObserverList::new()),
            delivering: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> CarId {
        self.id
    }

    pub fn status(&self) -> CarStatus {
        let state = self.lock_state();
        CarStatus {
            id: self.id,
            floor: state.car.floor(),
            direction: state.car.direction(),
            state: state.car.state(),
            capacity: state.car.capacity(),
            load: state.car.load(),
            target: state.car.target(),
            ascending: state.queues.ascending_floors(),
            descending: state.queues.descending_floors(),
        }
    }

    pub fn subscribe(&self, observer: Observer) -> SubscriberId {
        self.observers.write().unwrap_or_else(PoisonError::into_inner).add(observer)
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.observers.write().unwrap_or_else(PoisonError::into_inner).remove(id)
    }

    /// Queues `request` and runs the decision step. Returns `false` when the
    /// request was dropped because the car is out of service.
    pub fn add_request(&self, request: Request) -> bool {
        {
            let mut state = self.lock_state();
            if !state.car.state().is_in_service() {
                debug!("Car #{} is {}, dropping request for floor {}", self.id, state.car.state(), request.floor);
                return false
            }

            let current_floor = state.car.floor();
            if state.car.target() == Some(request.floor) {
                debug!("Car #{} is already on its way to floor {}", self.id, request.floor);
                state.in_flight.get_or_insert(request);
            } else if state.queues.insert(request, current_floor) {
                debug!("Car #{} queued floor {} ({} pending)", self.id, request.floor, state.queues.len());
            } else {
                debug!("Car #{} already has floor {} pending", self.id, request.floor);
            }
            Self::process_requests(&mut state);
        }
        self.flush_events();
        true
    }

    /// Direct move command outside the queues.
    pub fn move_to_floor(&self, floor: u8) -> Result<(), ElevatorError> {
        {
            let mut state = self.lock_state();
            match state.car.move_to_floor(floor) {
                Ok(events) => state.outbox.extend(events),
                Err(e) => {
                    warn!("Car #{} rejected move to floor {}: {}", self.id, floor, e);
                    return Err(e)
                },
            }
            Self::process_requests(&mut state);
        }
        self.flush_events();
        Ok(())
    }

    /// One simulation tick: advance a moving car one floor, and pick the next
    /// stop if that step completed a request. Returns whether the car is still moving.
    pub fn tick(&self) -> bool {
        let moving = {
            let mut state = self.lock_state();
            if state.car.state() != OperationalState::Moving {
                return false
            }
            let events = state.car.step();
            state.outbox.extend(events);
            if state.car.state() != OperationalState::Moving {
                state.in_flight = None;
            }
            Self::process_requests(&mut state);
            state.car.state() == OperationalState::Moving
        };
        self.flush_events();
        moving
    }

    pub fn set_load(&self, load: u32) -> Result<(), ElevatorError> {
        self.lock_state().car.set_load(load)
    }

    /// Moves the car to `OutOfService` or `Maintenance`, abandoning any move
    /// in progress. Returns the requests that were still pending, the one the
    /// car was travelling to first.
    pub fn set_out_of_service(&self, reason: OperationalState) -> Result<Vec<Request>, ElevatorError> {
        if reason.is_in_service() {
            return Err(ElevatorError::InvalidState { car: self.id, state: reason })
        }
        let drained = {
            let mut state = self.lock_state();
            let events = state.car.set_operational_state(reason);
            state.outbox.extend(events);
            let mut drained: Vec<Request> = state.in_flight.take().into_iter().collect();
            drained.extend(state.queues.drain());
            drained
        };
        info!("Car #{} is now {} with {} pending requests", self.id, reason, drained.len());
        self.flush_events();
        Ok(drained)
    }

    pub fn return_to_service(&self) {
        {
            let mut state = self.lock_state();
            if state.car.state().is_in_service() {
                return
            }
            let events = state.car.set_operational_state(OperationalState::Idle);
            state.outbox.extend(events);
        }
        info!("Car #{} returned to service", self.id);
        self.flush_events();
    }

    /// SCAN decision step. Keeps dispatching while the car is idle and work is
    /// pending; a stop at the current floor completes immediately and the loop
    /// goes on to the next one.
    fn process_requests(state: &mut ControllerState) {
        while state.car.state() == OperationalState::Idle && !state.queues.is_empty() {
            let next = match Self::next_request(state) {
                Some(request) => request,
                None => break,
            };
            match state.car.move_to_floor(next.floor) {
                Ok(events) => {
                    state.outbox.extend(events);
                    if state.car.state() == OperationalState::Moving {
                        state.in_flight = Some(next);
                    }
                },
                Err(e) => {
                    warn!("Dropping request for floor {}: {}", next.floor, e);
                    break
                },
            }
        }

        if state.car.state() == OperationalState::Idle {
            let direction = state.car.direction();
            let bucket = match direction {
                Direction::Up => Some(Bucket::Ascending),
                Direction::Down => Some(Bucket::Descending),
                Direction::Stop => None,
            };
            if bucket.map_or(false, |bucket| !state.queues.has_pending(bucket)) {
                state.car.set_direction(Direction::Stop);
            }
        }
    }

    fn next_request(state: &mut ControllerState) -> Option<Request> {
        match state.car.direction() {
            Direction::Up | Direction::Stop => {
                if let Some(request) = state.queues.pop_ascending() {
                    return Some(request)
                }
                let request = state.queues.pop_descending()?;
                state.car.set_direction(Direction::Down);
                Some(request)
            },
            Direction::Down => {
                if let Some(request) = state.queues.pop_descending() {
                    return Some(request)
                }
                let request = state.queues.pop_ascending()?;
                state.car.set_direction(Direction::Up);
                Some(request)
            },
        }
    }

    /// Delivers queued events. Whichever thread wins the `delivering` flag
    /// drains the outbox; a thread that loses returns and leaves its events to
    /// the winner.
    fn flush_events(&self) {
        loop {
            if self.delivering.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
                return
            }
            loop {
                let next = self.lock_state().outbox.pop_front();
                let event = match next {
                    Some(event) => event,
                    None => break,
                };
                let observers = self.observers.read().unwrap_or_else(PoisonError::into_inner).clone();
                observers.notify(&event);
            }
            self.delivering.store(false, Ordering::Release);
            if self.lock_state().outbox.is_empty() {
                return
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
