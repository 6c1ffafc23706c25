//! Fixed board graph: adjacency of the 24 points and the mill triples.
//!
//! Two layouts exist, the standard one and one with diagonal lines joining the
//! ring corners. Each is built once and shared read-only.

use std::sync::OnceLock;

use crate::{
    bitboard::BitBoard,
    constants::{NUM_RANKS, NUM_RINGS, NUM_SQUARES},
    types::Square,
};

/// A square belongs to at most three mills (corners on a diagonal board).
const MAX_MILLS_PER_SQUARE: usize = 3;

#[derive(Debug)]
pub struct Topology {
    adjacent: [BitBoard; NUM_SQUARES],
    mills: Vec<BitBoard>,
    mills_through: [[BitBoard; MAX_MILLS_PER_SQUARE]; NUM_SQUARES],
}

static PLAIN: OnceLock<Topology> = OnceLock::new();
static DIAGONAL: OnceLock<Topology> = OnceLock::new();

/// Topology for the given line layout
pub fn topology(diagonal_lines: bool) -> &'static Topology {
    match diagonal_lines {
        true => DIAGONAL.get_or_init(|| Topology::build(true)),
        false => PLAIN.get_or_init(|| Topology::build(false)),
    }
}

impl Topology {
    fn build(diagonal_lines: bool) -> Self {
        let connects_rings = |rank: usize| rank % 2 == 0 || diagonal_lines;

        let mut adjacent = [BitBoard::EMPTY; NUM_SQUARES];

        for square in Square::iter() {
            let (ring, rank) = (square.ring(), square.rank());
            let neighbours = &mut adjacent[square.index()];

            neighbours.set_bit(Square::from_ring_rank(ring, rank + 1));
            neighbours.set_bit(Square::from_ring_rank(ring, rank + NUM_RANKS - 1));

            if connects_rings(rank) {
                if ring > 0 {
                    neighbours.set_bit(Square::from_ring_rank(ring - 1, rank));
                }
                if ring + 1 < NUM_RINGS {
                    neighbours.set_bit(Square::from_ring_rank(ring + 1, rank));
                }
            }
        }

        let mut mills = Vec::new();

        // Ring sides, centred on the midpoints
        for ring in 0..NUM_RINGS {
            for midpoint in (0..NUM_RANKS).step_by(2) {
                let mut mill = BitBoard::EMPTY;
                mill.set_bit(Square::from_ring_rank(ring, midpoint + NUM_RANKS - 1));
                mill.set_bit(Square::from_ring_rank(ring, midpoint));
                mill.set_bit(Square::from_ring_rank(ring, midpoint + 1));
                mills.push(mill);
            }
        }

        // Lines crossing the rings
        for rank in (0..NUM_RANKS).filter(|&rank| connects_rings(rank)) {
            let mut mill = BitBoard::EMPTY;
            for ring in 0..NUM_RINGS {
                mill.set_bit(Square::from_ring_rank(ring, rank));
            }
            mills.push(mill);
        }

        let mut mills_through = [[BitBoard::EMPTY; MAX_MILLS_PER_SQUARE]; NUM_SQUARES];

        for &mill in &mills {
            for square in mill.squares() {
                let slots = &mut mills_through[square.index()];
                if let Some(slot) = slots.iter_mut().find(|slot| slot.is_empty()) {
                    *slot = mill;
                }
            }
        }

        Self {
            adjacent,
            mills,
            mills_through,
        }
    }

    pub fn adjacent(&self, square: Square) -> BitBoard {
        self.adjacent[square.index()]
    }

    pub fn mills(&self) -> &[BitBoard] {
        &self.mills
    }

    /// Mill masks that contain `square`
    pub fn mills_through(&self, square: Square) -> impl Iterator<Item = BitBoard> + '_ {
        self.mills_through[square.index()]
            .iter()
            .copied()
            .filter(|mill| !mill.is_empty())
    }

    /// Number of complete mills of `units` passing through `square`
    pub fn mills_formed(&self, square: Square, units: BitBoard) -> u8 {
        self.mills_through(square)
            .filter(|&mill| units.contains_all(mill))
            .count() as u8
    }

    pub fn is_in_mill(&self, square: Square, units: BitBoard) -> bool {
        self.mills_formed(square, units) > 0
    }

    /// Every square of `units` that belongs to at least one complete mill of `units`
    pub fn squares_in_mills(&self, units: BitBoard) -> BitBoard {
        self.mills
            .iter()
            .filter(|&&mill| units.contains_all(mill))
            .fold(BitBoard::EMPTY, |acc, &mill| acc | mill)
    }
}
