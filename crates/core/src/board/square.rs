//! Square coordinates and coordinate notation
//!
//! Row 0 is rank 8 (black's back rank), column 0 is the a-file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    /// Checked constructor for coordinates coming from outside the engine.
    pub fn new(row: i32, col: i32) -> Result<Self> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Ok(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(Error::InvalidSquare { row, col })
        }
    }

    pub(crate) const fn at(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// All 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square::at(row, col)))
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Square> {
        Square::new(self.row as i32 + d_row, self.col as i32 + d_col).ok()
    }

    pub fn file(self) -> char {
        (b'a' + self.col) as char
    }

    pub fn rank(self) -> u8 {
        8 - self.row
    }

    /// "row,col" key used by callers that track destinations as strings.
    pub fn key(self) -> String {
        format!("{},{}", self.row, self.col)
    }

    pub fn is_light(self) -> bool {
        (self.row + self.col) % 2 == 0
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(Error::Notation(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(Error::Notation(s.to_string()));
        }
        Ok(Square::at(8 - (rank - b'0'), file - b'a'))
    }
}

/// A from/to pair. Also serves as the last-move record for en passant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    pub fn row_delta(&self) -> i32 {
        self.to.row as i32 - self.from.row as i32
    }

    pub fn col_delta(&self) -> i32 {
        self.to.col as i32 - self.from.col as i32
    }

    /// Coordinate notation, e.g. "e2-e4".
    pub fn notation(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = Error;

    /// Accepts "e2-e4" and "e2e4".
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (from, to) = match s.split_once('-') {
            Some(parts) => parts,
            None if s.len() == 4 && s.is_ascii() => s.split_at(2),
            None => return Err(Error::Notation(s.to_string())),
        };
        Ok(Move::new(from.parse()?, to.parse()?))
    }
}
