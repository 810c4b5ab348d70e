use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver};

use elevator_dispatch::modules::build_system;
use elevator_dispatch::utilities::building::Building;
use elevator_dispatch::utilities::config::Config;
use elevator_dispatch::{CarEvent, CarId, Direction, ElevatorError, ElevatorSystem, Observer, OperationalState};

fn system_with_events(num_floors: u8, num_cars: u32) -> (Arc<ElevatorSystem>, Receiver<CarEvent>) {
    let system = Arc::new(ElevatorSystem::new(Building::new(num_floors)));
    for _ in 0..num_cars {
        system.register_car(10);
    }
    let (tx, rx) = unbounded();
    system.subscribe_all(Observer::channel(tx));
    (system, rx)
}

fn run_until_idle(system: &ElevatorSystem) {
    let mut ticks = 0;
    while system.tick() > 0 {
        ticks += 1;
        assert!(ticks < 10_000, "cars never settled");
    }
}

fn completions(rx: &Receiver<CarEvent>) -> HashMap<CarId, Vec<u8>> {
    let mut served: HashMap<CarId, Vec<u8>> = HashMap::new();
    for event in rx.try_iter() {
        if let CarEvent::RequestCompleted { car, floor } = event {
            served.entry(car).or_default().push(floor);
        }
    }
    served
}

#[test]
fn demo_presses_are_served_by_both_cars() {
    let config = Config::from_json(r#"{ "building": { "num_floors": 4, "num_cars": 2 } }"#).unwrap();
    let system = build_system(&config);
    let (tx, rx) = unbounded();
    system.subscribe_all(Observer::channel(tx));

    let first = system.submit_external_request(2, Direction::Up).unwrap();
    system.submit_internal_request(4, first.id()).unwrap();
    let second = system.submit_external_request(1, Direction::Up).unwrap();
    assert_eq!(first.id(), 1);
    assert_eq!(second.id(), 2);

    run_until_idle(&system);
    let served = completions(&rx);
    assert_eq!(served[&1], vec![2, 4]);
    assert_eq!(served[&2], vec![1]);
    for status in system.statuses() {
        assert_eq!(status.state, OperationalState::Idle);
        assert_eq!(status.direction, Direction::Stop);
    }
}

#[test]
fn floor_events_step_by_one_up_to_each_destination() {
    let (system, rx) = system_with_events(12, 1);
    system.submit_external_request(9, Direction::Down).unwrap();
    system.submit_internal_request(3, 1).unwrap();
    run_until_idle(&system);

    let mut previous = 0u8;
    let mut served = Vec::new();
    for event in rx.try_iter() {
        match event {
            CarEvent::FloorChanged { floor, .. } => {
                assert_eq!((floor as i32 - previous as i32).abs(), 1);
                previous = floor;
            },
            CarEvent::RequestCompleted { floor, .. } => {
                assert_eq!(floor, previous);
                served.push(floor);
            },
            CarEvent::StateChanged { .. } => {},
        }
    }
    assert_eq!(served, vec![9, 3]);
}

#[test]
fn simultaneous_presses_dispatch_each_floor_once() {
    let (system, rx) = system_with_events(20, 1);

    let handles: Vec<_> = (0..8).map(|worker| {
        let system = system.clone();
        thread::spawn(move || {
            for floor in 1..=20u8 {
                if (floor as usize + worker) % 2 == 0 {
                    system.submit_external_request(floor, Direction::Up).unwrap();
                } else {
                    system.submit_internal_request(floor, 1).unwrap();
                }
            }
        })
    }).collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let moving_events = rx.try_iter()
        .filter(|event| *event == CarEvent::StateChanged { car: 1, state: OperationalState::Moving })
        .count();
    assert_eq!(moving_events, 1);

    run_until_idle(&system);
    let served = completions(&rx).remove(&1).unwrap_or_default();
    let mut distinct = served.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct, (1..=20).collect::<Vec<u8>>());
    assert_eq!(system.car(1).unwrap().status().pending(), 0);
}

#[test]
fn out_of_service_car_is_skipped_until_returned() {
    let (system, _rx) = system_with_events(6, 2);
    system.set_out_of_service(1, OperationalState::Maintenance).unwrap();
    assert_eq!(system.submit_external_request(5, Direction::Down).unwrap().id(), 2);

    system.set_out_of_service(2, OperationalState::OutOfService).unwrap();
    assert_eq!(system.submit_external_request(3, Direction::Up).err(), Some(ElevatorError::NoAvailableCar));

    system.return_to_service(1).unwrap();
    assert_eq!(system.submit_external_request(3, Direction::Up).unwrap().id(), 1);
}
