use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use log::{debug, trace, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    config::SearchConfig,
    constants::{DRAW_SCORE, INFINITY_SCORE, MAX_PLY, TIME_CHECK_INTERVAL},
    error::Result,
    evaluate::{evaluate, terminal_score},
    movegen::MoveList,
    position::Position,
    stack::FixedStack,
    time::TimeManager,
    transposition::{Bound, TranspositionTable},
    types::{GameStatus, Move},
};

/// Scratch state of one ply of the current search path
#[derive(Copy, Clone, Debug)]
pub struct SearchFrame {
    pub key: u64,
    pub current_move: Option<Move>,
    pub alpha: i32,
    pub beta: i32,
    pub depth: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` only when the searched position is already decided
    pub best_move: Option<Move>,
    pub evaluation: i32,
    pub depth: u8,
    pub nodes: usize,
    pub tt_hits: usize,
    pub beta_cutoffs: usize,
    pub time_ms: u64,
    /// Stopped early by the stop flag, the time limit or the node limit
    pub aborted: bool,
    /// Status of the searched position
    pub status: GameStatus,
}

pub struct Engine {
    config: SearchConfig,
    table: TranspositionTable,
    frames: FixedStack<SearchFrame, MAX_PLY>,
    /// Keys of the game positions preceding the root, oldest first
    history: Vec<u64>,
    rng: StdRng,
    stop: Arc<AtomicBool>,
    time_manager: TimeManager,
    nodes: usize,
    next_time_check: usize,
    beta_cutoffs: usize,
    aborted: bool,
}

impl Engine {
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            table: TranspositionTable::new(config.table_size_bytes, config.hash_width),
            config,
            frames: FixedStack::new(),
            history: Vec::new(),
            rng,
            stop: Arc::new(AtomicBool::new(false)),
            time_manager: TimeManager::default(),
            nodes: 0,
            next_time_check: TIME_CHECK_INTERVAL,
            beta_cutoffs: 0,
            aborted: false,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Swap the configuration; the table is rebuilt only when its shape changes
    pub fn set_config(&mut self, config: SearchConfig) -> Result<()> {
        config.validate()?;

        if config.table_size_bytes != self.config.table_size_bytes
            || config.hash_width != self.config.hash_width
        {
            self.table = TranspositionTable::new(config.table_size_bytes, config.hash_width);
        }

        if let Some(seed) = config.random_seed {
            self.rng = StdRng::seed_from_u64(seed);
        }

        self.config = config;
        Ok(())
    }

    /// Raising this flag makes the running search return at its next poll. The
    /// engine lowers it again when the search returns.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    pub fn clear_table(&mut self) {
        self.table.clear();
    }

    pub fn search(&mut self, position: &Position) -> SearchResult {
        self.search_with_history(position, &[])
    }

    /// Search with the keys of the earlier game positions, so lines that repeat
    /// one of them are scored as draws
    pub fn search_with_history(&mut self, position: &Position, history: &[u64]) -> SearchResult {
        let depth = self.config.depth_for(position);
        self.search_to_depth(position, history, depth)
    }

    pub fn search_to_depth(
        &mut self,
        position: &Position,
        history: &[u64],
        depth: u8,
    ) -> SearchResult {
        let depth = depth.max(1);

        self.time_manager = TimeManager::new(self.config.time_limit_ms);
        self.table.new_search();
        self.frames.clear();
        self.history.clear();
        self.history.extend_from_slice(history);

        // Reset all search statistics
        self.nodes = 0;
        self.next_time_check = TIME_CHECK_INTERVAL;
        self.beta_cutoffs = 0;
        self.aborted = false;

        let (best_move, evaluation, status) = match position.outcome() {
            Some(outcome) => (
                None,
                terminal_score(&outcome, position.side, 0),
                GameStatus::Over(outcome),
            ),
            None => {
                let (best_move, evaluation) = self.search_root(position, depth);
                (best_move, evaluation, GameStatus::InProgress)
            }
        };

        let result = SearchResult {
            best_move,
            evaluation,
            depth,
            nodes: self.nodes,
            tt_hits: self.table.hits,
            beta_cutoffs: self.beta_cutoffs,
            time_ms: self.time_manager.elapsed().as_millis() as u64,
            aborted: self.aborted,
            status,
        };

        // A stop raised during this search must not leak into the next one
        self.stop.store(false, Ordering::Relaxed);

        if result.aborted {
            warn!(
                "search aborted after {} nodes ({} ms)",
                result.nodes, result.time_ms
            );
        }

        debug!(
            "depth {} score {} nodes {} tt hits {} cutoffs {} time {} ms best {}",
            result.depth,
            result.evaluation,
            result.nodes,
            result.tt_hits,
            result.beta_cutoffs,
            result.time_ms,
            result
                .best_move
                .map_or_else(|| "(none)".to_string(), |mv| mv.to_string()),
        );

        result
    }

    /// Root moves keep generation order, so among equal scores the first
    /// generated move wins no matter what the table holds
    fn search_root(&mut self, position: &Position, depth: u8) -> (Option<Move>, i32) {
        let hash = position.hash();
        let moves = self.ordered_moves(position, None);

        let mut alpha = -INFINITY_SCORE;
        let beta = INFINITY_SCORE;
        let mut best_move = None;
        let mut best_score = -INFINITY_SCORE;

        self.nodes += 1;
        self.frames.push(SearchFrame {
            key: hash.current_key,
            current_move: None,
            alpha,
            beta,
            depth,
        });

        for &mv in &moves {
            if self.should_stop() {
                break;
            }

            if let Some(frame) = self.frames.top_mut() {
                frame.current_move = Some(mv);
                frame.alpha = alpha;
            }

            let child = position.apply_move(mv);
            let score = self.child_score(position, &child, depth, 0, alpha, beta);

            if self.aborted {
                break;
            }

            if self.config.trace_tree {
                trace!("{mv} depth {depth} score {score}");
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }

            if score > alpha {
                alpha = score;
            }
        }

        self.frames.pop();

        if self.aborted {
            // Nothing finished: fall back to the first candidate and its static score
            if best_move.is_none() {
                return (moves.get(0).copied(), evaluate(position));
            }
        } else {
            let reusable = is_path_independent(position, depth);
            self.table
                .store(hash, best_move, depth, best_score, Bound::Exact, 0, reusable);
        }

        (best_move, best_score)
    }

    fn negamax(
        &mut self,
        position: &Position,
        depth: u8,
        ply: usize,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.nodes += 1;

        if let Some(outcome) = position.outcome() {
            return terminal_score(&outcome, position.side, ply);
        }

        if self.is_repetition(position) {
            return DRAW_SCORE;
        }

        if depth == 0 {
            return evaluate(position);
        }

        let hash = position.hash();
        let reusable = is_path_independent(position, depth);
        let mut hash_move = None;

        if let Some(entry) = self.table.probe(hash) {
            if reusable {
                if let Some(score) = entry.cutoff(depth, ply, alpha, beta) {
                    return score;
                }
            }
            hash_move = entry.best_move;
        }

        let moves = self.ordered_moves(position, hash_move);
        let original_alpha = alpha;
        let mut best_score = -INFINITY_SCORE;
        let mut best_move = None;

        self.frames.push(SearchFrame {
            key: hash.current_key,
            current_move: None,
            alpha,
            beta,
            depth,
        });

        for &mv in &moves {
            if self.should_stop() {
                break;
            }

            if let Some(frame) = self.frames.top_mut() {
                frame.current_move = Some(mv);
                frame.alpha = alpha;
            }

            let child = position.apply_move(mv);
            let score = self.child_score(position, &child, depth, ply, alpha, beta);

            if self.aborted {
                break;
            }

            if self.config.trace_tree {
                trace!(
                    "{:indent$}{mv} depth {depth} score {score} [{alpha}, {beta}]",
                    "",
                    indent = (ply + 1) * 2
                );
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }

            if score > alpha {
                alpha = score;
            }

            if alpha >= beta {
                self.beta_cutoffs += 1;
                break;
            }
        }

        self.frames.pop();

        // A partial result must not reach the table
        if self.aborted {
            return best_score;
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if best_score > original_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };

        self.table
            .store(hash, best_move, depth, best_score, bound, ply, reusable);

        best_score
    }

    /// Negamax step. The score only flips when the turn passes; after closing a
    /// mill the same side also plays the removal.
    fn child_score(
        &mut self,
        parent: &Position,
        child: &Position,
        depth: u8,
        ply: usize,
        alpha: i32,
        beta: i32,
    ) -> i32 {
        if child.side == parent.side {
            self.negamax(child, depth - 1, ply + 1, alpha, beta)
        } else {
            -self.negamax(child, depth - 1, ply + 1, -beta, -alpha)
        }
    }

    /// Legal moves in search order: the table move first, the rest in generation
    /// order (or shuffled when configured)
    fn ordered_moves(&mut self, position: &Position, hash_move: Option<Move>) -> MoveList {
        let mut moves = position.legal_moves();

        if self.config.randomize_child_order {
            for i in (1..moves.len()).rev() {
                let j = self.rng.gen_range(0..=i);
                moves.swap(i, j);
            }
        }

        if let Some(index) = hash_move.and_then(|mv| moves.position(&mv)) {
            moves.move_to_front(index);
        }

        moves
    }

    /// The position already occurred on the current search path or in the game
    fn is_repetition(&self, position: &Position) -> bool {
        if !position.rules.threefold_repetition_rule || position.rule50 == 0 {
            return false;
        }

        let key = position.key();

        self.frames.iter().any(|frame| frame.key == key) || self.history.contains(&key)
    }

    /// Polled between sibling moves, never in the middle of a node
    fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }

        if self.stop.load(Ordering::Relaxed) {
            self.aborted = true;
        } else if self
            .config
            .max_nodes
            .is_some_and(|max_nodes| self.nodes >= max_nodes)
        {
            self.aborted = true;
        } else if self.nodes >= self.next_time_check {
            self.next_time_check = self.nodes + TIME_CHECK_INTERVAL;
            self.aborted = self.time_manager.is_limit_reached();
        }

        self.aborted
    }
}

/// Whether a search of `depth` plies below `position` scores the same on every
/// path to it. Repetition draws look at the positions before the node, and an
/// N-move draw depends on `rule50`, which the key leaves out. Neither can reach
/// below a placement or removal (`rule50 == 0`): every earlier position holds
/// more pieces in hand or on the board.
pub fn is_path_independent(position: &Position, depth: u8) -> bool {
    let rules = &position.rules;

    if rules.threefold_repetition_rule && position.rule50 > 0 {
        return false;
    }

    let horizon = position.rule50 + depth as u32;

    [rules.n_move_rule, rules.endgame_n_move_rule]
        .into_iter()
        .all(|limit| limit == 0 || horizon < limit)
}

/// One-shot search with a fresh engine
pub fn search(position: &Position, config: &SearchConfig) -> Result<(Option<Move>, i32)> {
    let mut engine = Engine::new(config.clone())?;
    let result = engine.search(position);
    Ok((result.best_move, result.evaluation))
}
