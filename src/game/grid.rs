// Grid geometry for the mouse & cheese board: cells, headings and the
// toroidal step.
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Neighbour one step along `dir` on an `n`x`n` torus.
    pub fn step(self, dir: Direction, n: u8) -> Cell {
        let (dx, dy) = dir.delta();
        let wrap = |v: u8, d: i8| ((v as i16 + d as i16).rem_euclid(n as i16)) as u8;
        Cell { x: wrap(self.x, dx), y: wrap(self.y, dy) }
    }
}

impl From<(u8, u8)> for Cell {
    fn from((x, y): (u8, u8)) -> Self {
        Cell { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    /// Unit vector, y grows downward.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
            Direction::Up => (0, -1),
        }
    }

    pub fn from_delta(dx: i8, dy: i8) -> Option<Direction> {
        match (dx, dy) {
            (1, 0) => Some(Direction::Right),
            (-1, 0) => Some(Direction::Left),
            (0, 1) => Some(Direction::Down),
            (0, -1) => Some(Direction::Up),
            _ => None,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
        }
    }

    /// Map a `KeyboardEvent.key` (or an on-screen button name) to a heading.
    /// Anything else is not a steering key.
    pub fn from_key(key: &str) -> Option<Direction> {
        match key {
            "ArrowUp" | "up" | "w" | "W" => Some(Direction::Up),
            "ArrowDown" | "down" | "s" | "S" => Some(Direction::Down),
            "ArrowLeft" | "left" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "right" | "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }
}
