use std::io::{self, Write};

use crossterm::{cursor, terminal, ExecutableCommand};

use super::car_status::CarStatus;

const HEADER_SIZE: u16 = 4;

/// Redraws a table of every car in place on the terminal.
pub struct StatusBoard<W: Write> {
    out: W,
    lines_drawn: u16,
}

impl StatusBoard<io::Stdout> {
    pub fn stdout() -> Self {
        StatusBoard::new(io::stdout())
    }
}

impl<W: Write> StatusBoard<W> {
    pub fn new(out: W) -> Self {
        StatusBoard { out: out, lines_drawn: 0 }
    }

    pub fn print_status(&mut self, cars: &[CarStatus]) -> io::Result<()> {
        if self.lines_drawn > 0 {
            self.out.execute(cursor::MoveUp(self.lines_drawn))?;
        }
        self.out.execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;

        writeln!(self.out, "+------+--------------+-------+-----------+----------+----------------------+")?;
        writeln!(self.out, "| {0:<4} | {1:<12} | {2:<5} | {3:<9} | {4:<8} | {5:<20} |", "CAR", "STATE", "FLOOR", "DIRECTION", "LOAD", "PENDING (UP | DOWN)")?;
        writeln!(self.out, "+------+--------------+-------+-----------+----------+----------------------+")?;
        for car in cars {
            writeln!(self.out, "| {0:<4} | {1:<12} | {2:<5} | {3:<9} | {4:>3}/{5:<4} | {6:<20} |",
                car.id,
                car.state,
                car.floor,
                car.direction,
                car.load,
                car.capacity,
                format!("{:?} | {:?}", car.ascending, car.descending))?;
        }
        writeln!(self.out, "+------+--------------+-------+-----------+----------+----------------------+")?;
        self.out.flush()?;

        self.lines_drawn = HEADER_SIZE + cars.len() as u16;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::car_status::OperationalState;
    use crate::utilities::direction::Direction;

    #[test]
    fn prints_one_row_per_car() {
        let car = CarStatus {
            id: 1,
            floor: 3,
            direction: Direction::Up,
            state: OperationalState::Moving,
            capacity: 10,
            load: 2,
            target: Some(4),
            ascending: vec![6],
            descending: vec![1],
        };
        let mut board = StatusBoard::new(Vec::new());
        board.print_status(&[car.clone(), CarStatus { id: 2, ..car }]).unwrap();

        let printed = String::from_utf8_lossy(&board.into_inner()).to_string();
        assert!(printed.contains("moving"));
        assert!(printed.contains("[6] | [1]"));
        assert_eq!(printed.lines().filter(|line| line.starts_with("| 1 ") || line.starts_with("| 2 ")).count(), 2);
    }
}
