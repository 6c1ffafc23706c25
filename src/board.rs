use crate::{
    bitboard::BitBoard,
    hash::Hash,
    types::{Board, Occupant, Side, Square},
};

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// No pieces and no banned points; the hash covers only the occupancy
    pub const fn empty() -> Self {
        Self {
            bit_units: [BitBoard::EMPTY; 2],
            bit_banned: BitBoard::EMPTY,
            bit_all: BitBoard::EMPTY,
            hash: Hash::new(),
        }
    }

    pub fn units(&self, side: Side) -> BitBoard {
        self.bit_units[side as usize]
    }

    pub fn empty_squares(&self) -> BitBoard {
        !self.bit_all
    }

    pub fn occupant(&self, square: Square) -> Option<Occupant> {
        if self.bit_units[Side::White as usize].is_bit_set(square) {
            Some(Occupant::White)
        } else if self.bit_units[Side::Black as usize].is_bit_set(square) {
            Some(Occupant::Black)
        } else if self.bit_banned.is_bit_set(square) {
            Some(Occupant::Banned)
        } else {
            None
        }
    }

    pub fn add_piece(&mut self, side: Side, square: Square) {
        debug_assert!(!self.bit_all.is_bit_set(square), "{square} is occupied");

        self.hash.toggle_occupant(square, side.occupant());
        self.bit_units[side as usize].set_bit(square);
        self.bit_all.set_bit(square);
    }

    pub fn remove_piece(&mut self, side: Side, square: Square) {
        debug_assert!(self.bit_units[side as usize].is_bit_set(square));

        self.hash.toggle_occupant(square, side.occupant());
        self.bit_units[side as usize].clear_bit(square);
        self.bit_all.clear_bit(square);
    }

    pub fn update_piece(&mut self, side: Side, from: Square, to: Square) {
        self.remove_piece(side, from);
        self.add_piece(side, to);
    }

    pub fn add_ban(&mut self, square: Square) {
        self.hash.toggle_occupant(square, Occupant::Banned);
        self.bit_banned.set_bit(square);
        self.bit_all.set_bit(square);
    }

    /// Lift every banned marker (start of the moving phase)
    pub fn clear_bans(&mut self) {
        for square in self.bit_banned.squares() {
            self.hash.toggle_occupant(square, Occupant::Banned);
            self.bit_all.clear_bit(square);
        }

        self.bit_banned = BitBoard::EMPTY;
    }
}
