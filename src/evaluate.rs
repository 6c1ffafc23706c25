use crate::{
    constants::{DRAW_SCORE, MOBILITY_WEIGHT, PENDING_REMOVAL_SCORE, PIECE_VALUE, WIN_SCORE},
    position::Position,
    types::{Outcome, Side},
};

/// Static score of a non-terminal position from the side to move's point of view
pub fn evaluate(position: &Position) -> i32 {
    let us = position.side;
    let them = us.opponent();

    let material = position.total_pieces(us) as i32 - position.total_pieces(them) as i32;
    let mut score = material * PIECE_VALUE;

    // The mover is about to take a piece
    score += position.pending_removals as i32 * PENDING_REMOVAL_SCORE;

    if !position.is_placing_phase() {
        score += (mobility(position, us) - mobility(position, them)) * MOBILITY_WEIGHT;
    }

    score
}

/// Adjacent empty points summed over a side's pieces. A flying side is not
/// constrained by adjacency and scores 0.
pub fn mobility(position: &Position, side: Side) -> i32 {
    if position.is_flying(side) {
        return 0;
    }

    let topology = position.topology();
    let empty = position.board.empty_squares();

    position
        .board
        .units(side)
        .squares()
        .map(|square| (topology.adjacent(square) & empty).count() as i32)
        .sum()
}

/// Score of a finished game for `side`. Wins found nearer the root score higher,
/// and every decided result outranks any heuristic score.
pub fn terminal_score(outcome: &Outcome, side: Side, ply: usize) -> i32 {
    match outcome.winner {
        Some(winner) if winner == side => WIN_SCORE - ply as i32,
        Some(_) => -(WIN_SCORE - ply as i32),
        None => DRAW_SCORE,
    }
}
