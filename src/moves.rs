use std::{fmt, str::FromStr};

use crate::{
    error::EngineError,
    types::{Move, Square},
};

/// Text form: `d5` places, `a1-a4` slides, `xg7` removes
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place(square) => write!(f, "{square}"),
            Move::Slide { from, to } => write!(f, "{from}-{to}"),
            Move::Remove(square) => write!(f, "x{square}"),
        }
    }
}

impl FromStr for Move {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        let invalid = || EngineError::ParseMove(s.to_string());

        if let Some(square) = text.strip_prefix('x') {
            return square.parse().map(Move::Remove).map_err(|_| invalid());
        }

        match text.split_once('-') {
            Some((from, to)) => {
                let from: Square = from.parse().map_err(|_| invalid())?;
                let to: Square = to.parse().map_err(|_| invalid())?;
                if from == to {
                    return Err(invalid());
                }
                Ok(Move::Slide { from, to })
            }
            None => text.parse().map(Move::Place).map_err(|_| invalid()),
        }
    }
}

impl Move {
    /// Square the moved or placed piece ends on; `None` for removals
    pub fn destination(self) -> Option<Square> {
        match self {
            Move::Place(square) | Move::Slide { to: square, .. } => Some(square),
            Move::Remove(_) => None,
        }
    }

    pub fn is_removal(self) -> bool {
        matches!(self, Move::Remove(_))
    }
}
