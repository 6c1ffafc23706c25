//! A game in progress: the position, the moves that led to it and the result.
//!
//! Positions are small `Copy` values, so the game keeps every position it passed
//! through. Undo pops the last one and repetition counting scans their keys.

use log::{debug, info};

use crate::{
    constants::REPETITION_COUNT,
    error::{EngineError, Result},
    position::Position,
    rules::Rules,
    types::{GameOverReason, GameStatus, Move, Outcome, Side},
};

#[derive(Clone, Debug)]
pub struct Game {
    /// Every position of the game, the current one last. Never empty.
    positions: Vec<Position>,
    moves: Vec<Move>,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl Game {
    pub fn new(rules: Rules) -> Self {
        Self::from_position(Position::new(rules))
    }

    /// Continue from an arbitrary position, e.g. one read from notation
    pub fn from_position(position: Position) -> Self {
        let mut game = Self {
            positions: vec![position],
            moves: Vec::new(),
            status: GameStatus::InProgress,
        };

        game.status = game.evaluate_status();
        game
    }

    pub fn position(&self) -> &Position {
        // `positions` always holds the starting position
        &self.positions[self.positions.len() - 1]
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Over(_))
    }

    /// Keys of the positions before the current one, oldest first. This is the
    /// history the search needs to score repetitions as draws.
    pub fn history_keys(&self) -> Vec<u64> {
        self.positions[..self.positions.len() - 1]
            .iter()
            .map(Position::key)
            .collect()
    }

    /// How often the current position has occurred, itself included
    pub fn repetition_count(&self) -> usize {
        let key = self.position().key();
        self.positions.iter().filter(|p| p.key() == key).count()
    }

    pub fn play(&mut self, mv: Move) -> Result<GameStatus> {
        if self.is_over() {
            return Err(EngineError::GameOver);
        }

        if !self.position().is_legal(mv) {
            return Err(EngineError::IllegalMove(mv));
        }

        let next = self.position().apply_move(mv);
        debug!("ply {}: {} plays {mv}", next.ply, self.position().side.symbol());

        self.positions.push(next);
        self.moves.push(mv);
        self.status = self.evaluate_status();

        if let GameStatus::Over(outcome) = self.status {
            info!("game over after {} plies: {outcome:?}", self.moves.len());
        }

        Ok(self.status)
    }

    /// Parse a move in text form and play it
    pub fn play_str(&mut self, text: &str) -> Result<GameStatus> {
        self.play(text.parse()?)
    }

    /// Take back the last move. Also reopens a game that move had finished.
    pub fn undo(&mut self) -> Option<Move> {
        let mv = self.moves.pop()?;
        self.positions.pop();
        self.status = self.evaluate_status();
        Some(mv)
    }

    pub fn resign(&mut self, side: Side) -> Result<GameStatus> {
        self.conclude(Outcome {
            winner: Some(side.opponent()),
            reason: GameOverReason::LoseResign,
        })
    }

    /// `side` ran out of time
    pub fn flag_timeout(&mut self, side: Side) -> Result<GameStatus> {
        self.conclude(Outcome {
            winner: Some(side.opponent()),
            reason: GameOverReason::LoseTimeout,
        })
    }

    fn conclude(&mut self, outcome: Outcome) -> Result<GameStatus> {
        if self.is_over() {
            return Err(EngineError::GameOver);
        }

        info!("game over after {} plies: {outcome:?}", self.moves.len());
        self.status = GameStatus::Over(outcome);
        Ok(self.status)
    }

    fn evaluate_status(&self) -> GameStatus {
        let position = self.position();

        if let Some(outcome) = position.outcome() {
            return GameStatus::Over(outcome);
        }

        if position.rules.threefold_repetition_rule
            && position.pending_removals == 0
            && self.repetition_count() >= REPETITION_COUNT
        {
            return GameStatus::Over(Outcome {
                winner: None,
                reason: GameOverReason::DrawThreefoldRepetition,
            });
        }

        GameStatus::InProgress
    }
}
