#[cfg(feature = "api")]
use serde::{Deserialize, Serialize};

use crate::{bitboard::BitBoard, hash::Hash};

/// Board points, named after the algebraic notation of the board (files a-g, ranks 1-7).
/// Index is `ring * 8 + rank`: ring 0 is the inner square, rank 0 is the top midpoint
/// and ranks advance clockwise.
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[rustfmt::skip]
pub enum Square {
  D5 = 0, E5, E4, E3, D3, C3, C4, C5,
  D6, F6, F4, F2, D2, B2, B4, B6,
  D7, G7, G4, G1, D1, A1, A4, A7,
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    White = 0,
    Black = 1,
}

/// What can sit on a square besides nothing. Banned markers only exist in rule sets
/// with banned locations, and only during the placing phase.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Occupant {
    White = 0,
    Black = 1,
    Banned = 2,
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Place(Square),
    Slide { from: Square, to: Square },
    Remove(Square),
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Placing,
    Moving,
    Flying,
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    LoseNoLegalMoves,
    LoseTimeout,
    DrawThreefoldRepetition,
    DrawFiftyMove,
    DrawEndgameFiftyMove,
    LoseFullBoard,
    DrawFullBoard,
    DrawStalemateCondition,
    LoseFewerThanThree,
    LoseResign,
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// `None` for draws
    pub winner: Option<Side>,
    pub reason: GameOverReason,
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Over(Outcome),
}

/// Piece placement of a position together with its incrementally maintained hash.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub bit_units: [BitBoard; 2],
    pub bit_banned: BitBoard,
    pub bit_all: BitBoard,
    pub hash: Hash,
}
