/// ----- TICKER MODULE -----
/// Shared tick source for the simulation. One thread advances every moving
/// car by one floor per period; each car is stepped under its own lock only.
/// Cars that are idle or out of service are skipped, so a car's motion ends
/// as soon as it reaches its target or leaves service.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{select, tick, unbounded, Sender};
use log::{debug, error};

use crate::modules::dispatcher::ElevatorSystem;

pub struct Ticker {
    shutdown_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start(system: Arc<ElevatorSystem>, period: Duration) -> io::Result<Self> {
        let (shutdown_tx, shutdown_rx) = unbounded::<()>();
        let handle = thread::Builder::new().name("ticker".to_string()).spawn(move || {
            let timer = tick(period);
            loop {
                select! {
                    recv(timer) -> _ => {
                        let moving = system.tick();
                        if moving > 0 {
                            debug!("{} cars moving", moving);
                        }
                    },
                    recv(shutdown_rx) -> _ => {
                        break;
                    },
                }
            }
        })?;

        Ok(Ticker {
            shutdown_tx: shutdown_tx,
            handle: Some(handle),
        })
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::building::Building;
    use crate::utilities::direction::Direction;
    use crate::utilities::events::{CarEvent, Observer};

    #[test]
    fn drives_cars_until_shut_down() {
        let system = Arc::new(ElevatorSystem::new(Building::new(4)));
        system.register_car(10);
        let (tx, rx) = unbounded();
        system.subscribe_all(Observer::channel(tx));

        let ticker = Ticker::start(system.clone(), Duration::from_millis(5)).unwrap();
        system.submit_external_request(3, Direction::Up).unwrap();

        let arrived = loop {
            match rx.recv_timeout(Duration::from_secs(5)) {
                Ok(CarEvent::RequestCompleted { floor, .. }) => break Some(floor),
                Ok(_) => continue,
                Err(_) => break None,
            }
        };
        ticker.shutdown();

        assert_eq!(arrived, Some(3));
        assert_eq!(system.car(1).unwrap().status().floor, 3);
    }
}
