use serde::{Deserialize, Serialize};

/// One of the eight compass headings. North is 0°, increasing clockwise in 45° steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

/// Minimum rotation in degrees between two headings, indexed by `Direction::index`.
const ANGULAR_DIFFERENCE: [[u16; 8]; 8] = [
    [0, 45, 90, 135, 180, 135, 90, 45],
    [45, 0, 45, 90, 135, 180, 135, 90],
    [90, 45, 0, 45, 90, 135, 180, 135],
    [135, 90, 45, 0, 45, 90, 135, 180],
    [180, 135, 90, 45, 0, 45, 90, 135],
    [135, 180, 135, 90, 45, 0, 45, 90],
    [90, 135, 180, 135, 90, 45, 0, 45],
    [45, 90, 135, 180, 135, 90, 45, 0],
];

impl Direction {
    /// All headings in clockwise order starting at North.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub fn angle(self) -> u16 {
        self.index() as u16 * 45
    }

    /// (row, col) step taken when moving one node in this heading. Rows grow southwards.
    #[inline(always)]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        Direction::ALL[(self.index() + 4) % 8]
    }

    /// Minimum rotation between `self` and `other`, one of 0, 45, 90, 135 or 180.
    #[inline(always)]
    pub fn angular_difference(self, other: Direction) -> u16 {
        ANGULAR_DIFFERENCE[self.index()][other.index()]
    }

    pub fn from_angle(angle: u16) -> Option<Direction> {
        if angle % 45 != 0 {
            return None;
        }
        Direction::ALL.get(usize::from(angle / 45)).copied()
    }
}
