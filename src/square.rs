use std::{fmt, str::FromStr};

use crate::{
    constants::{NUM_RANKS, NUM_SQUARES},
    error::EngineError,
    types::Square,
};

impl Square {
    #[rustfmt::skip]
    pub const ALL: [Square; NUM_SQUARES] = [
        Square::D5, Square::E5, Square::E4, Square::E3, Square::D3, Square::C3, Square::C4, Square::C5,
        Square::D6, Square::F6, Square::F4, Square::F2, Square::D2, Square::B2, Square::B4, Square::B6,
        Square::D7, Square::G7, Square::G4, Square::G1, Square::D1, Square::A1, Square::A4, Square::A7,
    ];

    pub fn iter() -> impl Iterator<Item = Square> {
        Self::ALL.into_iter()
    }

    pub fn from_ring_rank(ring: usize, rank: usize) -> Square {
        Self::ALL[ring * NUM_RANKS + rank % NUM_RANKS]
    }

    #[inline]
    pub fn as_bit(self) -> u32 {
        1u32 << (self as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// 0 (inner) to 2 (outer)
    pub fn ring(self) -> usize {
        self as usize / NUM_RANKS
    }

    /// 0-7, clockwise from the top midpoint
    pub fn rank(self) -> usize {
        self as usize % NUM_RANKS
    }

    /// Midpoints connect across rings; corners only do so on boards with diagonal lines
    pub fn is_corner(self) -> bool {
        self.rank() % 2 == 1
    }

    /// Algebraic name, e.g. `d5`
    pub fn name(self) -> &'static str {
        #[rustfmt::skip]
        const NAMES: [&str; NUM_SQUARES] = [
            "d5", "e5", "e4", "e3", "d3", "c3", "c4", "c5",
            "d6", "f6", "f4", "f2", "d2", "b2", "b4", "b6",
            "d7", "g7", "g4", "g1", "d1", "a1", "a4", "a7",
        ];

        NAMES[self as usize]
    }
}

impl TryFrom<u8> for Square {
    type Error = EngineError;

    /// Converts from a number representing the square index
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| EngineError::ParseSquare(format!("index {value} out of range (0-23)")))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Square {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();

        Square::iter()
            .find(|square| square.name() == lowered)
            .ok_or_else(|| EngineError::ParseSquare(s.to_string()))
    }
}
