#[cfg(feature = "api")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFAULT_ENDGAME_N_MOVE_RULE, DEFAULT_FLYING_PIECE_COUNT, DEFAULT_N_MOVE_RULE,
        DEFAULT_PIECES_AT_LEAST, DEFAULT_PIECES_PER_SIDE, MAX_PIECES_PER_SIDE, NUM_SQUARES,
    },
    error::{EngineError, Result},
};

/// What happens when the placing phase fills every point
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoardFullAction {
    FirstPlayerLose,
    Draw,
}

/// What happens when the side to move has no legal move
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StalemateAction {
    Lose,
    Draw,
}

/// Rule variant of the mill game
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rules {
    pub pieces_per_side: u8,
    pub has_diagonal_lines: bool,
    pub may_fly: bool,
    /// On-board count at which a side starts flying
    pub flying_piece_count: u8,
    /// A side with fewer pieces (on board plus in hand) has lost
    pub pieces_at_least: u8,
    pub may_remove_from_mills_always: bool,
    /// Closing two mills with one move grants two removals
    pub may_remove_multiple: bool,
    /// Removals during the placing phase leave a banned marker until the moving phase
    pub has_banned_locations: bool,
    pub board_full_action: BoardFullAction,
    pub stalemate_action: StalemateAction,
    /// Plies without a removal before the game is drawn (0 disables)
    pub n_move_rule: u32,
    /// Same, while at least one side is flying (0 disables)
    pub endgame_n_move_rule: u32,
    pub threefold_repetition_rule: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self::nine_mens_morris()
    }
}

impl Rules {
    pub const fn nine_mens_morris() -> Self {
        Self {
            pieces_per_side: DEFAULT_PIECES_PER_SIDE,
            has_diagonal_lines: false,
            may_fly: true,
            flying_piece_count: DEFAULT_FLYING_PIECE_COUNT,
            pieces_at_least: DEFAULT_PIECES_AT_LEAST,
            may_remove_from_mills_always: false,
            may_remove_multiple: false,
            has_banned_locations: false,
            board_full_action: BoardFullAction::FirstPlayerLose,
            stalemate_action: StalemateAction::Lose,
            n_move_rule: DEFAULT_N_MOVE_RULE,
            endgame_n_move_rule: DEFAULT_ENDGAME_N_MOVE_RULE,
            threefold_repetition_rule: true,
        }
    }

    pub const fn twelve_mens_morris() -> Self {
        Self {
            pieces_per_side: 12,
            has_diagonal_lines: true,
            board_full_action: BoardFullAction::Draw,
            ..Self::nine_mens_morris()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.pieces_per_side < self.pieces_at_least
            || self.pieces_per_side as usize > MAX_PIECES_PER_SIDE
        {
            return Err(EngineError::InvalidConfig(format!(
                "pieces_per_side must be between {} and {}, got {}",
                self.pieces_at_least, MAX_PIECES_PER_SIDE, self.pieces_per_side
            )));
        }

        if self.pieces_per_side as usize * 2 > NUM_SQUARES {
            return Err(EngineError::InvalidConfig(format!(
                "{} pieces per side do not fit on {} points",
                self.pieces_per_side, NUM_SQUARES
            )));
        }

        if self.may_fly && self.flying_piece_count < self.pieces_at_least {
            return Err(EngineError::InvalidConfig(format!(
                "flying_piece_count ({}) is below pieces_at_least ({})",
                self.flying_piece_count, self.pieces_at_least
            )));
        }

        if self.flying_piece_count > self.pieces_per_side {
            return Err(EngineError::InvalidConfig(format!(
                "flying_piece_count ({}) exceeds pieces_per_side ({})",
                self.flying_piece_count, self.pieces_per_side
            )));
        }

        Ok(())
    }
}
