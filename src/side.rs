use crate::types::{Occupant, Side};

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub const fn occupant(self) -> Occupant {
        match self {
            Side::White => Occupant::White,
            Side::Black => Occupant::Black,
        }
    }

    pub fn iter() -> impl Iterator<Item = Side> {
        [Side::White, Side::Black].into_iter()
    }

    /// Single character used by the position notation
    pub const fn symbol(self) -> char {
        match self {
            Side::White => 'W',
            Side::Black => 'B',
        }
    }
}

impl Occupant {
    pub fn iter() -> impl Iterator<Item = Occupant> {
        [Occupant::White, Occupant::Black, Occupant::Banned].into_iter()
    }
}

impl TryFrom<u8> for Side {
    type Error = &'static str;

    /// Converts from a number representing the side
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Side::White),
            1 => Ok(Side::Black),
            _ => Err("Side index out of range (must be 0-1)"),
        }
    }
}
