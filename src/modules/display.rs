/// ----- DISPLAY MODULE -----
/// Observer thread for the terminal. Receives car events over a channel and
/// redraws the status board after each one, until told to stop.

use std::sync::Arc;

use crossbeam_channel::{select, Receiver};
use log::{debug, error};

use crate::modules::dispatcher::ElevatorSystem;
use crate::utilities::debug::StatusBoard;
use crate::utilities::events::CarEvent;

pub fn main(
    system: Arc<ElevatorSystem>,
    events_rx: Receiver<CarEvent>,
    shutdown_rx: Receiver<()>,
) {
    let mut board = StatusBoard::stdout();

    loop {
        select! {
            recv(events_rx) -> msg => {
                match msg {
                    Ok(event) => {
                        debug!("Display: {:?}", event);
                        if let Err(e) = board.print_status(&system.statuses()) {
                            error!("Could not draw status board: {}", e);
                        }
                    },
                    Err(_) => return,
                }
            },
            recv(shutdown_rx) -> _ => {
                return;
            },
        }
    }
}
