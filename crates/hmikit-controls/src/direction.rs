//! Direction attribute parsing and the per-widget quadrant tables.

/// A cardinal direction attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Left,
    Down,
}

impl Direction {
    /// Parse the canonical attribute string; anything else is unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Up" => Some(Self::Up),
            "Right" => Some(Self::Right),
            "Left" => Some(Self::Left),
            "Down" => Some(Self::Down),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Left => 2,
            Self::Down => 3,
        }
    }
}

/// Immutable direction-to-quadrant mapping, injected per widget kind.
///
/// A quadrant is a quarter-turn count in [0, 3]; the rendered rotation is
/// 90° times the quadrant. Unrecognized or absent directions fall back to
/// quadrant 0.
#[derive(Debug, Clone, Copy)]
pub struct QuadrantTable {
    quadrants: [u8; 4],
}

impl QuadrantTable {
    pub const fn new(up: u8, right: u8, left: u8, down: u8) -> Self {
        Self {
            quadrants: [up, right, left, down],
        }
    }

    pub fn quadrant(&self, direction: Option<Direction>) -> u8 {
        direction.map_or(0, |d| self.quadrants[d.index()])
    }

    pub fn angle_deg(&self, direction: Option<Direction>) -> f64 {
        f64::from(self.quadrant(direction)) * 90.0
    }
}
