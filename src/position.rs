use crate::{
    bitboard::BitBoard,
    constants::NUM_SIDES,
    error::{EngineError, Result},
    hash::Hash,
    rules::{BoardFullAction, Rules, StalemateAction},
    topology::{Topology, topology},
    types::{Board, GameOverReason, Move, Occupant, Outcome, Phase, Side, Square},
    zobrist_hash::{MAX_PENDING_REMOVALS, zobrist_keys, zobrist_locks},
};

/// Complete game state. Small and `Copy`, so the search derives children by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub rules: Rules,
    pub board: Board,
    pub side: Side,
    pub in_hand: [u8; NUM_SIDES],
    /// Opponent pieces the side to move must remove before the turn passes
    pub pending_removals: u8,
    /// Plies since the last placement or removal (N-move rule)
    pub rule50: u32,
    /// Plies since the start of the game
    pub ply: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl Position {
    /// Starting position: empty board, white to place. `rules` must pass
    /// [`Rules::validate`], as the presets do; see [`Position::try_new`].
    pub fn new(rules: Rules) -> Self {
        let mut position = Self {
            rules,
            board: Board::empty(),
            side: Side::White,
            in_hand: [rules.pieces_per_side; NUM_SIDES],
            pending_removals: 0,
            rule50: 0,
            ply: 0,
        };

        position.board.hash = position.compute_hash();
        position
    }

    /// Starting position for rules from outside the crate
    pub fn try_new(rules: Rules) -> Result<Self> {
        rules.validate()?;
        Ok(Self::new(rules))
    }

    pub fn topology(&self) -> &'static Topology {
        topology(self.rules.has_diagonal_lines)
    }

    pub fn hash(&self) -> Hash {
        self.board.hash
    }

    pub fn key(&self) -> u64 {
        self.board.hash.current_key
    }

    pub fn pieces_on_board(&self, side: Side) -> u8 {
        self.board.units(side).count() as u8
    }

    pub fn pieces_in_hand(&self, side: Side) -> u8 {
        self.in_hand[side as usize]
    }

    /// On board plus still to place
    pub fn total_pieces(&self, side: Side) -> u8 {
        self.pieces_on_board(side) + self.pieces_in_hand(side)
    }

    /// Phase of the side to move
    pub fn phase(&self) -> Phase {
        if self.in_hand[self.side as usize] > 0 {
            Phase::Placing
        } else if self.is_flying(self.side) {
            Phase::Flying
        } else {
            Phase::Moving
        }
    }

    pub fn is_placing_phase(&self) -> bool {
        self.in_hand.iter().any(|&count| count > 0)
    }

    pub fn is_flying(&self, side: Side) -> bool {
        self.rules.may_fly
            && self.in_hand[side as usize] == 0
            && self.pieces_on_board(side) <= self.rules.flying_piece_count
    }

    /// Recompute the hash from scratch. Search relies on the incremental updates in
    /// [`Position::make_move`]; this is the reference they must agree with.
    pub fn compute_hash(&self) -> Hash {
        let (keys, locks) = (zobrist_keys(), zobrist_locks());
        let mut hash = Hash::new();

        for square in Square::iter() {
            if let Some(occupant) = self.board.occupant(square) {
                hash.current_key ^= keys.occupant_key(square, occupant);
                hash.current_lock ^= locks.occupant_key(square, occupant);
            }
        }

        if self.side == Side::Black {
            hash.current_key ^= keys.side_to_move;
            hash.current_lock ^= locks.side_to_move;
        }

        for side in Side::iter() {
            hash.current_key ^= keys.in_hand_key(side, self.in_hand[side as usize]);
            hash.current_lock ^= locks.in_hand_key(side, self.in_hand[side as usize]);
        }

        hash.current_key ^= keys.pending_removals_key(self.pending_removals);
        hash.current_lock ^= locks.pending_removals_key(self.pending_removals);

        hash
    }

    /// Hash of the position after `mv`, derived from the current hash
    pub fn hash_after(&self, mv: Move) -> Hash {
        self.apply_move(mv).hash()
    }

    pub fn apply_move(&self, mv: Move) -> Position {
        let mut next = *self;
        next.make_move(mv);
        next
    }

    /// Play a move that is legal in this position. Legality is the caller's
    /// responsibility; see [`Position::is_legal`].
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side;
        let them = us.opponent();

        match mv {
            Move::Place(square) => {
                self.board.add_piece(us, square);
                self.set_in_hand(us, self.in_hand[us as usize] - 1);
                self.rule50 = 0;

                let mills = self.topology().mills_formed(square, self.board.units(us));
                self.finish_action(mills);
            }
            Move::Slide { from, to } => {
                self.board.update_piece(us, from, to);
                self.rule50 += 1;

                let mills = self.topology().mills_formed(to, self.board.units(us));
                self.finish_action(mills);
            }
            Move::Remove(square) => {
                self.board.remove_piece(them, square);
                if self.rules.has_banned_locations && self.is_placing_phase() {
                    self.board.add_ban(square);
                }
                self.rule50 = 0;

                let remaining = self.pending_removals.saturating_sub(1);
                if remaining == 0 || self.board.units(them).is_empty() {
                    self.set_pending_removals(0);
                    self.end_turn();
                } else {
                    self.set_pending_removals(remaining);
                }
            }
        }

        self.ply += 1;
    }

    /// After a placement or slide: either owe removals or pass the turn
    fn finish_action(&mut self, mills_formed: u8) {
        let removals = match mills_formed {
            0 => 0,
            n if self.rules.may_remove_multiple => n.min(MAX_PENDING_REMOVALS as u8),
            _ => 1,
        };

        if removals > 0 && !self.board.units(self.side.opponent()).is_empty() {
            self.set_pending_removals(removals);
        } else {
            self.end_turn();
        }
    }

    fn end_turn(&mut self) {
        self.side = self.side.opponent();
        self.board.hash.toggle_side_to_move();

        if !self.is_placing_phase() && !self.board.bit_banned.is_empty() {
            self.board.clear_bans();
        }
    }

    fn set_in_hand(&mut self, side: Side, count: u8) {
        self.board
            .hash
            .update_in_hand(side, self.in_hand[side as usize], count);
        self.in_hand[side as usize] = count;
    }

    fn set_pending_removals(&mut self, count: u8) {
        self.board
            .hash
            .update_pending_removals(self.pending_removals, count);
        self.pending_removals = count;
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves().contains(&mv)
    }

    /// Terminal state that follows from the position alone. Repetition draws need the
    /// game history and are detected by [`crate::game::Game`] and the search.
    pub fn outcome(&self) -> Option<Outcome> {
        let us = self.side;

        for side in [us, us.opponent()] {
            if self.total_pieces(side) < self.rules.pieces_at_least {
                return Some(Outcome {
                    winner: Some(side.opponent()),
                    reason: GameOverReason::LoseFewerThanThree,
                });
            }
        }

        if self.pending_removals > 0 {
            return None;
        }

        if self.board.bit_all == BitBoard::FULL {
            return Some(match self.rules.board_full_action {
                BoardFullAction::FirstPlayerLose => Outcome {
                    winner: Some(Side::Black),
                    reason: GameOverReason::LoseFullBoard,
                },
                BoardFullAction::Draw => Outcome {
                    winner: None,
                    reason: GameOverReason::DrawFullBoard,
                },
            });
        }

        if !self.has_legal_moves() {
            return Some(match self.rules.stalemate_action {
                StalemateAction::Lose => Outcome {
                    winner: Some(us.opponent()),
                    reason: GameOverReason::LoseNoLegalMoves,
                },
                StalemateAction::Draw => Outcome {
                    winner: None,
                    reason: GameOverReason::DrawStalemateCondition,
                },
            });
        }

        let endgame = !self.is_placing_phase() && Side::iter().any(|side| self.is_flying(side));

        if endgame
            && self.rules.endgame_n_move_rule > 0
            && self.rule50 >= self.rules.endgame_n_move_rule
        {
            return Some(Outcome {
                winner: None,
                reason: GameOverReason::DrawEndgameFiftyMove,
            });
        }

        if self.rules.n_move_rule > 0 && self.rule50 >= self.rules.n_move_rule {
            return Some(Outcome {
                winner: None,
                reason: GameOverReason::DrawFiftyMove,
            });
        }

        None
    }

    /// Parse `<24 points> <w|b> <white in hand> <black in hand> [pending] [rule50]`.
    /// Points are listed in square index order as `W`, `B`, `X` (banned) or `.`.
    pub fn from_notation(notation: &str, rules: Rules) -> Result<Self> {
        rules.validate()?;

        let invalid = |reason: &str| EngineError::ParsePosition(format!("{reason}: {notation}"));
        let fields: Vec<&str> = notation.split_whitespace().collect();

        if fields.len() < 4 || fields.len() > 6 {
            return Err(invalid("expected 4 to 6 fields"));
        }

        let points: Vec<char> = fields[0].chars().collect();
        if points.len() != Square::ALL.len() {
            return Err(invalid("expected 24 points"));
        }

        let mut board = Board::empty();
        for (&square, &point) in Square::ALL.iter().zip(&points) {
            match point {
                'W' | 'w' => board.add_piece(Side::White, square),
                'B' | 'b' => board.add_piece(Side::Black, square),
                'X' | 'x' => board.add_ban(square),
                '.' | '-' => {}
                _ => return Err(invalid("unknown point symbol")),
            }
        }

        let side = match fields[1] {
            "w" | "W" => Side::White,
            "b" | "B" => Side::Black,
            _ => return Err(invalid("side must be w or b")),
        };

        let number = |field: &str| {
            field
                .parse::<u32>()
                .map_err(|_| invalid("counts must be non-negative integers"))
        };

        let in_hand = [number(fields[2])?, number(fields[3])?];
        let pending_removals = fields.get(4).map(|f| number(f)).transpose()?.unwrap_or(0);
        let rule50 = fields.get(5).map(|f| number(f)).transpose()?.unwrap_or(0);

        for side in Side::iter() {
            let on_board = board.units(side).count();
            if in_hand[side as usize] + on_board > rules.pieces_per_side as u32 {
                return Err(invalid("more pieces than the rules allow"));
            }
        }

        if pending_removals as usize > MAX_PENDING_REMOVALS {
            return Err(invalid("too many pending removals"));
        }

        let mut position = Self {
            rules,
            board,
            side,
            in_hand: [in_hand[0] as u8, in_hand[1] as u8],
            pending_removals: pending_removals as u8,
            rule50,
            ply: 0,
        };

        position.board.hash = position.compute_hash();
        Ok(position)
    }

    pub fn to_notation(&self) -> String {
        let points: String = Square::iter()
            .map(|square| match self.board.occupant(square) {
                Some(Occupant::White) => 'W',
                Some(Occupant::Black) => 'B',
                Some(Occupant::Banned) => 'X',
                None => '.',
            })
            .collect();

        format!(
            "{} {} {} {} {} {}",
            points,
            match self.side {
                Side::White => 'w',
                Side::Black => 'b',
            },
            self.in_hand[Side::White as usize],
            self.in_hand[Side::Black as usize],
            self.pending_removals,
            self.rule50
        )
    }
}
