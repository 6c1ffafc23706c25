#[cfg(feature = "api")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_MOVING_DEPTH, DEFAULT_PLACING_DEPTH, DEFAULT_TABLE_SIZE_BYTES, MAX_PLY},
    error::{EngineError, Result},
    position::Position,
};

/// Search depth used while the side to move is still placing pieces
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlacingDepth {
    Fixed(u8),
    /// Deepens as the pieces left to place run out
    Dynamic,
}

/// Width of the keys that reach the transposition table
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HashWidth {
    /// 32-bit keys, for memory constrained targets
    Narrow,
    Wide,
}

impl HashWidth {
    pub const fn truncate(self, key: u64) -> u64 {
        match self {
            HashWidth::Narrow => key & 0xFFFF_FFFF,
            HashWidth::Wide => key,
        }
    }
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub placing_depth: PlacingDepth,
    pub moving_depth: u8,
    /// Shuffle the children of every node. Off by default so results are reproducible.
    pub randomize_child_order: bool,
    /// 0 disables the transposition table
    pub table_size_bytes: usize,
    pub hash_width: HashWidth,
    /// Seed for the child-order shuffle; `None` seeds from the OS
    pub random_seed: Option<u64>,
    /// Log every visited node at trace level
    pub trace_tree: bool,
    pub time_limit_ms: Option<u64>,
    pub max_nodes: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            placing_depth: PlacingDepth::Fixed(DEFAULT_PLACING_DEPTH),
            moving_depth: DEFAULT_MOVING_DEPTH,
            randomize_child_order: false,
            table_size_bytes: DEFAULT_TABLE_SIZE_BYTES,
            hash_width: HashWidth::Wide,
            random_seed: None,
            trace_tree: false,
            time_limit_ms: None,
            max_nodes: None,
        }
    }
}

/// Deepest dynamic placing depth, reached with at most three pieces left to place
const MAX_DYNAMIC_PLACING_DEPTH: u8 = 6;

impl SearchConfig {
    /// Fixed depth for every phase
    pub fn with_depth(depth: u8) -> Self {
        Self {
            placing_depth: PlacingDepth::Fixed(depth),
            moving_depth: depth,
            ..Self::default()
        }
    }

    /// Depth budget for a search rooted at `position`
    pub fn depth_for(&self, position: &Position) -> u8 {
        if !position.is_placing_phase() {
            return self.moving_depth;
        }

        match self.placing_depth {
            PlacingDepth::Fixed(depth) => depth,
            PlacingDepth::Dynamic => {
                let remaining: u8 = position.in_hand.iter().sum();
                let depth = match remaining {
                    16.. => 2,
                    12..=15 => 3,
                    8..=11 => 4,
                    4..=7 => 5,
                    _ => MAX_DYNAMIC_PLACING_DEPTH,
                };
                depth.min(self.moving_depth.max(1))
            }
        }
    }

    /// Every depth must be at least one ply and leave room for the root frame on
    /// the search stack
    pub fn validate(&self) -> Result<()> {
        let shallowest = match self.placing_depth {
            PlacingDepth::Fixed(depth) => depth.min(self.moving_depth),
            PlacingDepth::Dynamic => self.moving_depth,
        };

        if shallowest == 0 {
            return Err(EngineError::InvalidConfig(
                "search depth must be at least 1".to_string(),
            ));
        }

        let deepest = match self.placing_depth {
            PlacingDepth::Fixed(depth) => depth.max(self.moving_depth),
            PlacingDepth::Dynamic => MAX_DYNAMIC_PLACING_DEPTH.max(self.moving_depth),
        };

        if deepest as usize >= MAX_PLY {
            return Err(EngineError::InvalidConfig(format!(
                "search depth {deepest} exceeds the supported maximum of {}",
                MAX_PLY - 1
            )));
        }

        Ok(())
    }
}
