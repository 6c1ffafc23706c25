use crate::{
    types::{Occupant, Side, Square},
    zobrist_hash::{zobrist_keys, zobrist_locks},
};

/// Zobrist key of a position, updated incrementally as the position changes.
///
/// `current_key` indexes the transposition table; `current_lock` is built from an
/// independent set of constants and is used to verify a table hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hash {
    pub current_key: u64,
    pub current_lock: u64,
}

impl Hash {
    pub const fn new() -> Self {
        Self {
            current_key: 0,
            current_lock: 0,
        }
    }

    /// Update hash for an occupant appearing on or leaving a square
    pub fn toggle_occupant(&mut self, square: Square, occupant: Occupant) {
        self.current_key ^= zobrist_keys().occupant_key(square, occupant);
        self.current_lock ^= zobrist_locks().occupant_key(square, occupant);
    }

    /// Toggle side-to-move in the hash. Call this when switching turns.
    pub fn toggle_side_to_move(&mut self) {
        self.current_key ^= zobrist_keys().side_to_move;
        self.current_lock ^= zobrist_locks().side_to_move;
    }

    /// Swap the in-hand count component of one side
    pub fn update_in_hand(&mut self, side: Side, old_count: u8, new_count: u8) {
        if old_count == new_count {
            return;
        }

        let (keys, locks) = (zobrist_keys(), zobrist_locks());
        self.current_key ^= keys.in_hand_key(side, old_count) ^ keys.in_hand_key(side, new_count);
        self.current_lock ^=
            locks.in_hand_key(side, old_count) ^ locks.in_hand_key(side, new_count);
    }

    pub fn update_pending_removals(&mut self, old_count: u8, new_count: u8) {
        if old_count == new_count {
            return;
        }

        let (keys, locks) = (zobrist_keys(), zobrist_locks());
        self.current_key ^=
            keys.pending_removals_key(old_count) ^ keys.pending_removals_key(new_count);
        self.current_lock ^=
            locks.pending_removals_key(old_count) ^ locks.pending_removals_key(new_count);
    }
}
