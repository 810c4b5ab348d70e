/// ----- EVENTS -----
/// Lifecycle notifications raised by a car controller and the subscribers
/// that receive them. A subscriber is either a callback or the sending half
/// of a channel; both see every event of the car in the order it happened.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crossbeam_channel::Sender;
use log::error;

use super::car_status::{CarId, OperationalState};
use super::direction::Direction;
use super::error::ObserverFailure;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CarEvent {
    StateChanged { car: CarId, state: OperationalState },
    FloorChanged { car: CarId, floor: u8, direction: Direction },
    RequestCompleted { car: CarId, floor: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    StateChanged,
    FloorChanged,
    RequestCompleted,
}

impl CarEvent {
    pub fn car(&self) -> CarId {
        match *self {
            CarEvent::StateChanged { car, .. }
            | CarEvent::FloorChanged { car, .. }
            | CarEvent::RequestCompleted { car, .. } => car,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            CarEvent::StateChanged { .. } => EventKind::StateChanged,
            CarEvent::FloorChanged { .. } => EventKind::FloorChanged,
            CarEvent::RequestCompleted { .. } => EventKind::RequestCompleted,
        }
    }
}

pub type EventHandler = Arc<dyn Fn(&CarEvent) -> Result<(), ObserverFailure> + Send + Sync>;

#[derive(Clone)]
pub enum Observer {
    Handler(EventHandler),
    Channel(Sender<CarEvent>),
}

impl Observer {
    pub fn handler<F>(handler: F) -> Self
    where
        F: Fn(&CarEvent) -> Result<(), ObserverFailure> + Send + Sync + 'static,
    {
        Observer::Handler(Arc::new(handler))
    }

    pub fn channel(sender: Sender<CarEvent>) -> Self {
        Observer::Channel(sender)
    }

    fn deliver(&self, event: &CarEvent) -> Result<(), ObserverFailure> {
        match self {
            Observer::Handler(handler) => handler(event),
            Observer::Channel(sender) => Ok(sender.send(*event)?),
        }
    }

    fn same_as(&self, other: &Observer) -> bool {
        match (self, other) {
            (Observer::Handler(a), Observer::Handler(b)) => Arc::ptr_eq(a, b),
            (Observer::Channel(a), Observer::Channel(b)) => a.same_channel(b),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

/// Subscribers in registration order. Registering the same handler or channel twice is a no-op.
#[derive(Clone, Default)]
pub struct ObserverList {
    next_id: u64,
    entries: Vec<(SubscriberId, Observer)>,
}

impl ObserverList {
    pub fn new() -> Self {
        ObserverList::default()
    }

    pub fn add(&mut self, observer: Observer) -> SubscriberId {
        if let Some((id, _)) = self.entries.iter().find(|(_, existing)| existing.same_as(&observer)) {
            return *id
        }
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub fn remove(&mut self, id: SubscriberId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    /// Delivers `event` to every subscriber. A failing or panicking subscriber is
    /// logged and skipped. Returns the number of failures.
    pub fn notify(&self, event: &CarEvent) -> usize {
        let mut failures = 0;
        for (id, observer) in &self.entries {
            match panic::catch_unwind(AssertUnwindSafe(|| observer.deliver(event))) {
                Ok(Ok(())) => {},
                Ok(Err(e)) => {
                    failures += 1;
                    error!("Error notifying observer {:?} of {:?}: {}", id, event.kind(), e);
                },
                Err(_) => {
                    failures += 1;
                    error!("Observer {:?} panicked while handling {:?}", id, event.kind());
                },
            }
        }
        failures
    }
}
