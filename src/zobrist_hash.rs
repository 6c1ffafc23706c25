use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::sync::OnceLock;

use crate::{
    constants::{MAX_PIECES_PER_SIDE, NUM_OCCUPANTS, NUM_SIDES, NUM_SQUARES, ZOBRIST_SEED},
    types::{Occupant, Side, Square},
};

/// Most removals a single move can grant (a point lies on at most three mills)
pub const MAX_PENDING_REMOVALS: usize = 3;

/// One full set of random constants. Two independent sets exist: the hash keys,
/// which index the transposition table, and the locks, which verify a hit.
#[derive(Debug)]
pub struct ZobristTables {
    pub occupant: [[u64; NUM_OCCUPANTS]; NUM_SQUARES],
    pub side_to_move: u64,
    pub in_hand: [[u64; MAX_PIECES_PER_SIDE + 1]; NUM_SIDES],
    pub pending_removals: [u64; MAX_PENDING_REMOVALS + 1],
}

// Global tables for Zobrist hashing
pub static ZOBRIST_HASH_TABLE: OnceLock<ZobristTables> = OnceLock::new();
pub static ZOBRIST_LOCK_TABLE: OnceLock<ZobristTables> = OnceLock::new();

/// Non-zero 64-bit value from the generator
fn random(rng: &mut StdRng) -> u64 {
    loop {
        let value = rng.next_u64();
        if value != 0 {
            return value;
        }
    }
}

impl ZobristTables {
    fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut occupant = [[0u64; NUM_OCCUPANTS]; NUM_SQUARES];
        for square in &mut occupant {
            for key in square {
                *key = random(&mut rng);
            }
        }

        let side_to_move = random(&mut rng);

        let mut in_hand = [[0u64; MAX_PIECES_PER_SIDE + 1]; NUM_SIDES];
        for side in &mut in_hand {
            for key in side {
                *key = random(&mut rng);
            }
        }

        let mut pending_removals = [0u64; MAX_PENDING_REMOVALS + 1];
        for key in &mut pending_removals {
            *key = random(&mut rng);
        }

        Self {
            occupant,
            side_to_move,
            in_hand,
            pending_removals,
        }
    }

    pub fn occupant_key(&self, square: Square, occupant: Occupant) -> u64 {
        self.occupant[square as usize][occupant as usize]
    }

    pub fn in_hand_key(&self, side: Side, count: u8) -> u64 {
        self.in_hand[side as usize][count as usize]
    }

    pub fn pending_removals_key(&self, count: u8) -> u64 {
        self.pending_removals[count as usize]
    }
}

pub fn zobrist_keys() -> &'static ZobristTables {
    ZOBRIST_HASH_TABLE.get_or_init(|| ZobristTables::generate(ZOBRIST_SEED))
}

pub fn zobrist_locks() -> &'static ZobristTables {
    ZOBRIST_LOCK_TABLE.get_or_init(|| ZobristTables::generate(ZOBRIST_SEED.rotate_left(32) ^ 1))
}

/// Build both tables up front so the first search does not pay for it
pub fn initialize_zobrist_hash_tables() {
    zobrist_keys();
    zobrist_locks();
}
