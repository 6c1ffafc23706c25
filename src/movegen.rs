//! Phase-aware legal move generation.
//!
//! Generation never mutates the position and fills a fixed-capacity
//! [`MoveList`], so a search node allocates nothing. Moves come out in square
//! index order, which keeps the search deterministic.

use crate::{
    bitboard::BitBoard,
    constants::MAX_MOVES,
    position::Position,
    stack::FixedStack,
    types::{Move, Square},
};

pub type MoveList = FixedStack<Move, MAX_MOVES>;

impl Position {
    pub fn legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();

        if self.pending_removals > 0 {
            for square in self.removable_squares().squares() {
                moves.push(Move::Remove(square));
            }
            return moves;
        }

        let empty = self.board.empty_squares();

        if self.in_hand[self.side as usize] > 0 {
            for square in empty.squares() {
                moves.push(Move::Place(square));
            }
            return moves;
        }

        for from in self.board.units(self.side).squares() {
            for to in self.destinations(from, empty).squares() {
                moves.push(Move::Slide { from, to });
            }
        }

        moves
    }

    /// Cheaper than generating the list when only existence matters
    pub fn has_legal_moves(&self) -> bool {
        if self.pending_removals > 0 {
            return !self.removable_squares().is_empty();
        }

        let empty = self.board.empty_squares();

        if self.in_hand[self.side as usize] > 0 {
            return !empty.is_empty();
        }

        self.board
            .units(self.side)
            .squares()
            .any(|from| !self.destinations(from, empty).is_empty())
    }

    /// Opponent pieces the side to move may remove. Pieces inside a mill are
    /// protected unless every opponent piece is inside one.
    pub fn removable_squares(&self) -> BitBoard {
        let theirs = self.board.units(self.side.opponent());

        if self.rules.may_remove_from_mills_always {
            return theirs;
        }

        let unprotected = theirs & !self.topology().squares_in_mills(theirs);

        if unprotected.is_empty() { theirs } else { unprotected }
    }

    /// Empty squares a piece on `from` may move to
    fn destinations(&self, from: Square, empty: BitBoard) -> BitBoard {
        if self.is_flying(self.side) {
            empty
        } else {
            self.topology().adjacent(from) & empty
        }
    }
}

/// Count the leaf nodes of the move tree to the given depth
pub fn perft(position: &Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    if position.outcome().is_some() {
        return 0;
    }

    let moves = position.legal_moves();

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|&mv| perft(&position.apply_move(mv), depth - 1))
        .sum()
}
