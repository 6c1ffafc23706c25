/// NOTE: 1 ply = one action by a single player. A removal after closing a mill
/// is its own ply, played by the same side.

pub const NUM_SQUARES: usize = 24;
pub const NUM_SIDES: usize = 2;
pub const NUM_RINGS: usize = 3;
pub const NUM_RANKS: usize = 8;

/// White piece, black piece, banned marker. Empty squares contribute nothing to a hash.
pub const NUM_OCCUPANTS: usize = 3;

/// Largest supported number of pieces per side (Twelve Men's Morris).
pub const MAX_PIECES_PER_SIDE: usize = 12;

/// Hard limit for search depth (in ply). Sizes the per-ply search frame stack.
pub const MAX_PLY: usize = 64;

/// Upper bound on the legal moves of a single node, for any rule set.
/// `k` flying pieces reach at most `24 - k` empty points, which peaks at
/// `k = 12`. Slides along lines (4 neighbours per piece), placements and
/// removals all stay below that.
pub const MAX_MOVES: usize = (NUM_SQUARES / 2) * (NUM_SQUARES / 2);

// Scores
pub const INFINITY_SCORE: i32 = 1_000_000;
pub const WIN_SCORE: i32 = 100_000;
/// Scores beyond this are forced wins or losses found by the search.
pub const WIN_THRESHOLD: i32 = WIN_SCORE - MAX_PLY as i32 * 2;
pub const DRAW_SCORE: i32 = 0;

pub const PIECE_VALUE: i32 = 100;
/// Credited to a side that must remove an opponent piece on its next ply.
pub const PENDING_REMOVAL_SCORE: i32 = PIECE_VALUE;
pub const MOBILITY_WEIGHT: i32 = 4;

// Rules
pub const DEFAULT_PIECES_PER_SIDE: u8 = 9;
pub const DEFAULT_FLYING_PIECE_COUNT: u8 = 3;
pub const DEFAULT_PIECES_AT_LEAST: u8 = 3;
pub const DEFAULT_N_MOVE_RULE: u32 = 100;
pub const DEFAULT_ENDGAME_N_MOVE_RULE: u32 = 100;
pub const REPETITION_COUNT: usize = 3;

// Search defaults
pub const DEFAULT_PLACING_DEPTH: u8 = 2;
pub const DEFAULT_MOVING_DEPTH: u8 = 8;
pub const DEFAULT_TABLE_SIZE_BYTES: usize = 16 * 1024 * 1024;

/// Node count between checks of the wall clock.
pub const TIME_CHECK_INTERVAL: usize = 1024;

/// Seed for the Zobrist tables. Fixed so keys are reproducible across runs.
pub const ZOBRIST_SEED: u64 = 0x4D49_4C4C_4741_4D45;
