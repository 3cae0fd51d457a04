use serde::{Deserialize, Serialize};

/// Identifier of a kitchen fixture ("pan_1", "fridge", "order_queue").
pub type ComponentId = String;

/// Milliseconds on the shared monotonic game clock.
pub type Millis = u64;

/// Screen-space coordinate of a fixture or an ingredient, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Taxicab distance, used for reach checks.
    pub fn manhattan_distance(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned footprint of a fixture, for hit testing by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub origin: Position,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(origin: Position, width: u32, height: u32) -> Self {
        Self { origin, width, height }
    }

    pub fn contains(&self, point: &Position) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.origin.x + self.width as i32
            && point.y < self.origin.y + self.height as i32
    }
}
