use std::fmt;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Stop,
    Up,
}

impl Direction {
    /// Direction of travel needed to get from `from` to `to`. Equal floors give `Stop`.
    pub fn between(from: u8, to: u8) -> Self {
        if to > from {
            Direction::Up
        } else if to < from {
            Direction::Down
        } else {
            Direction::Stop
        }
    }

    pub fn is_travelling(self) -> bool {
        self != Direction::Stop
    }

    pub fn as_string(self) -> Option<String> {
        match self {
            Direction::Down => Some(String::from("down")),
            Direction::Up => Some(String::from("up")),
            Direction::Stop => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_string().as_deref().unwrap_or("stop"))
    }
}
