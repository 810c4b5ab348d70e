use std::io;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::unbounded;
use log::{info, warn};

use crate::utilities::building::Building;
use crate::utilities::config::Config;
use crate::utilities::direction::Direction;
use crate::utilities::events::Observer;

pub mod car;
pub mod controller;
pub mod dispatcher;
pub mod display;
pub mod ticker;

use dispatcher::ElevatorSystem;
use ticker::Ticker;

/// Builds the building and its cars from `config`.
pub fn build_system(config: &Config) -> ElevatorSystem {
    let system = ElevatorSystem::new(Building::new(config.building.num_floors));
    for _ in 0..config.building.num_cars {
        system.register_car(config.car.capacity);
    }
    system
}

pub fn run(config: Config) -> io::Result<()> {
    // INITIALIZE SYSTEM
    let system = Arc::new(build_system(&config));
    info!("Building with {} floors and {} cars", config.building.num_floors, system.cars().len());

    // INITIALIZE THREAD FOR STATUS BOARD
    let (display_shutdown_tx, display_shutdown_rx) = unbounded();
    let display_handle = if config.simulation.status_board {
        let (events_tx, events_rx) = unbounded();
        system.subscribe_all(Observer::channel(events_tx));
        let system = system.clone();
        Some(thread::Builder::new().name("display".to_string()).spawn(move || display::main(
            system,
            events_rx,
            display_shutdown_rx,
        ))?)
    } else {
        None
    };

    // INITIALIZE TICK SOURCE
    let ticker = Ticker::start(system.clone(), config.tick_period())?;

    // REPLAY DEMO PRESSES
    info!("1st request: floor 2 calling up");
    match system.submit_external_request(2, Direction::Up) {
        Ok(car) => {
            info!("Inside car #{}, pressing floor 4", car.id());
            if let Err(e) = system.submit_internal_request(4, car.id()) {
                warn!("Car-panel request rejected: {}", e);
            }
        },
        Err(e) => warn!("Hall request rejected: {}", e),
    }
    info!("2nd request: floor 1 calling up");
    if let Err(e) = system.submit_external_request(1, Direction::Up) {
        warn!("Hall request rejected: {}", e);
    }

    thread::sleep(config.run_duration());

    // SHUT DOWN
    ticker.shutdown();
    let _ = display_shutdown_tx.send(());
    if let Some(handle) = display_handle {
        if handle.join().is_err() {
            warn!("Display thread panicked");
        }
    }
    info!("Simulation complete");
    Ok(())
}
