//! Transposition table: a fixed-size, overwrite-on-collision cache of search results.
//!
//! The table is only ever a hint. Every hit is verified against a second,
//! independent signature (the lock) before it is used, and a table built with
//! zero bytes is a valid configuration in which nothing is ever cached.

use crate::{
    config::HashWidth,
    constants::WIN_THRESHOLD,
    hash::Hash,
    types::Move,
};

/// How the stored score relates to the true score of the node
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bound {
    /// All children searched inside the window
    Exact,
    /// Search failed high; true score is at least `score`
    Lower,
    /// No child raised alpha; true score is at most `score`
    Upper,
}

/// An entry in the transposition table
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TtEntry {
    /// Key as truncated to the configured width
    pub key: u64,
    /// Verification signature from the independent lock table
    pub lock: u32,
    pub best_move: Option<Move>,
    /// Remaining depth at which the score was established
    pub depth: u8,
    /// Score relative to the node (win distances counted from the node, not the root)
    pub score: i32,
    pub bound: Bound,
    /// The score holds for every path to the position. Entries without this
    /// still order moves but never settle a node.
    pub reusable: bool,
    pub generation: u8,
}

impl TtEntry {
    /// Score seen from a node `ply` plies below the root
    pub fn score_at(&self, ply: usize) -> i32 {
        score_from_tt(self.score, ply)
    }

    /// Score to return immediately, if this entry settles the node for the given
    /// depth and window. Bounds only prune when they prove a cutoff.
    ///
    /// The depth must match exactly: a deeper score would answer a different
    /// question than a search of `depth` plies.
    pub fn cutoff(&self, depth: u8, ply: usize, alpha: i32, beta: i32) -> Option<i32> {
        if !self.reusable || self.depth != depth {
            return None;
        }

        let score = self.score_at(ply);

        match self.bound {
            Bound::Exact => Some(score),
            Bound::Lower if score >= beta => Some(score),
            Bound::Upper if score <= alpha => Some(score),
            _ => None,
        }
    }
}

/// Re-base a win/loss score from root distance to node distance before storing
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score > WIN_THRESHOLD {
        score + ply as i32
    } else if score < -WIN_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score > WIN_THRESHOLD {
        score - ply as i32
    } else if score < -WIN_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// Transposition table for storing positions and their search results
pub struct TranspositionTable {
    entries: Vec<Option<TtEntry>>,
    width: HashWidth,
    generation: u8,
    pub probes: usize,
    pub hits: usize,
    pub stores: usize,
}

impl TranspositionTable {
    pub fn new(size_bytes: usize, width: HashWidth) -> Self {
        let slots = size_bytes / std::mem::size_of::<Option<TtEntry>>();

        Self {
            entries: vec![None; slots],
            width,
            generation: 0,
            probes: 0,
            hits: 0,
            stores: 0,
        }
    }

    /// Table that never stores anything
    pub fn disabled() -> Self {
        Self::new(0, HashWidth::Wide)
    }

    pub fn is_enabled(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn width(&self) -> HashWidth {
        self.width
    }

    fn index(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    /// Entries from earlier searches lose their replacement priority
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.probes = 0;
        self.hits = 0;
        self.stores = 0;
    }

    pub fn clear(&mut self) {
        self.entries.iter_mut().for_each(|slot| *slot = None);
        self.generation = 0;
    }

    /// Look up the entry for a position. Key and lock must both match.
    pub fn probe(&mut self, hash: Hash) -> Option<TtEntry> {
        if !self.is_enabled() {
            return None;
        }

        self.probes += 1;

        let key = self.width.truncate(hash.current_key);
        let lock = hash.current_lock as u32;

        match self.entries[self.index(key)] {
            Some(entry) if entry.key == key && entry.lock == lock => {
                self.hits += 1;
                Some(entry)
            }
            _ => None,
        }
    }

    /// Store a result. The slot is taken over when it is empty, holds the same
    /// position, was written by an older search, or was searched no deeper.
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        hash: Hash,
        best_move: Option<Move>,
        depth: u8,
        score: i32,
        bound: Bound,
        ply: usize,
        reusable: bool,
    ) {
        if !self.is_enabled() {
            return;
        }

        let key = self.width.truncate(hash.current_key);
        let lock = hash.current_lock as u32;
        let index = self.index(key);
        let generation = self.generation;

        let (replace, previous_move) = match &self.entries[index] {
            None => (true, None),
            Some(entry) => {
                let same_position = entry.key == key && entry.lock == lock;
                let replace =
                    same_position || entry.generation != generation || depth >= entry.depth;
                (replace, same_position.then_some(entry.best_move).flatten())
            }
        };

        if !replace {
            return;
        }

        self.stores += 1;
        self.entries[index] = Some(TtEntry {
            key,
            lock,
            best_move: best_move.or(previous_move),
            depth,
            score: score_to_tt(score, ply),
            bound,
            reusable,
            generation,
        });
    }

    /// Permille of occupied slots
    pub fn hashfull(&self) -> usize {
        if !self.is_enabled() {
            return 0;
        }

        let sample = self.entries.len().min(1000);
        let used = self.entries[..sample]
            .iter()
            .filter(|slot| slot.is_some())
            .count();

        used * 1000 / sample
    }
}
