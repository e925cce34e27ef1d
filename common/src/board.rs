use std::fmt;
use std::str::FromStr;

use crate::error::ControlError;

/// One of the 64 board positions. Files run a-h, ranks 1-8, both stored
/// zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Result<Self, ControlError> {
        if file > 7 || rank > 7 {
            return Err(ControlError::BadSquare(file, rank));
        }
        Ok(Self { file, rank })
    }

    pub const fn file(self) -> u8 {
        self.file
    }

    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Linear index in scan order: rank-major, a1 = 0, h8 = 63.
    pub const fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < 64);
        Self {
            file: (index % 8) as u8,
            rank: (index / 8) as u8,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file) as char,
            (b'1' + self.rank) as char
        )
    }
}

impl FromStr for Square {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b = s.as_bytes();
        if b.len() != 2 || !(b'a'..=b'h').contains(&b[0]) || !(b'1'..=b'8').contains(&b[1]) {
            return Err(ControlError::BadMoveRecord(s.to_string()));
        }
        Ok(Self {
            file: b[0] - b'a',
            rank: b[1] - b'1',
        })
    }
}

/// The four-character move being resolved or executed, e.g. "e2e4".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
}

impl MoveRecord {
    /// Wire form handed to the oracle: origin file, origin rank,
    /// destination file, destination rank.
    pub fn as_bytes(&self) -> [u8; 4] {
        [
            b'a' + self.from.file,
            b'1' + self.from.rank,
            b'a' + self.to.file,
            b'1' + self.to.rank,
        ]
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for MoveRecord {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.is_ascii() {
            return Err(ControlError::BadMoveRecord(s.to_string()));
        }
        Ok(Self {
            from: s[0..2].parse()?,
            to: s[2..4].parse()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

/// 8x8 grid of per-square sensed states. True = reed switch closed, a piece
/// sits on the square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyGrid([[bool; 8]; 8]);

impl OccupancyGrid {
    pub const fn empty() -> Self {
        Self([[false; 8]; 8])
    }

    /// The standard chess starting position: both back ranks and both pawn
    /// ranks occupied.
    pub fn standard_start() -> Self {
        let mut grid = Self::empty();
        for rank in [0u8, 1, 6, 7] {
            for file in 0..8u8 {
                grid.0[rank as usize][file as usize] = true;
            }
        }
        grid
    }

    pub fn get(&self, sq: Square) -> bool {
        self.0[sq.rank() as usize][sq.file() as usize]
    }

    pub fn set(&mut self, sq: Square, occupied: bool) {
        self.0[sq.rank() as usize][sq.file() as usize] = occupied;
    }

    pub fn squares() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }

    /// Squares occupied here but empty in `other`, in scan order.
    pub fn occupied_not_in(&self, other: &OccupancyGrid) -> Vec<Square> {
        Self::squares()
            .filter(|&sq| self.get(sq) && !other.get(sq))
            .collect()
    }
}
