use crate::{constants::NUM_SQUARES, types::Square};

// Bit `n` represents the square with index `n`
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct BitBoard(pub u32);

impl BitBoard {
    pub const EMPTY: BitBoard = BitBoard(0);
    pub const FULL: BitBoard = BitBoard((1u32 << NUM_SQUARES) - 1);

    pub fn set_bit(&mut self, square: Square) {
        self.0 |= square.as_bit();
    }

    pub fn clear_bit(&mut self, square: Square) {
        self.0 &= !square.as_bit();
    }

    pub fn is_bit_set(&self, square: Square) -> bool {
        (self.0 & square.as_bit()) != 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when every square of `mask` is set
    pub fn contains_all(&self, mask: BitBoard) -> bool {
        self.0 & mask.0 == mask.0
    }

    /// Pops the least significant set square
    pub fn next_bit(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }

        let index = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Square::try_from(index).ok()
    }

    /// Squares in ascending index order
    pub fn squares(self) -> impl Iterator<Item = Square> {
        let mut bits = self;
        std::iter::from_fn(move || bits.next_bit())
    }
}

impl std::ops::BitOr for BitBoard {
    type Output = BitBoard;

    fn bitor(self, rhs: BitBoard) -> BitBoard {
        BitBoard(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for BitBoard {
    type Output = BitBoard;

    fn bitand(self, rhs: BitBoard) -> BitBoard {
        BitBoard(self.0 & rhs.0)
    }
}

impl std::ops::Not for BitBoard {
    type Output = BitBoard;

    fn not(self) -> BitBoard {
        BitBoard(!self.0 & Self::FULL.0)
    }
}
