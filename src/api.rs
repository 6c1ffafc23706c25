#[cfg(feature = "api")]
use serde::{Deserialize, Serialize};

use crate::config::{PlacingDepth, SearchConfig};
use crate::engine::Engine;
use crate::position::Position;
use crate::rules::Rules;
use crate::types::GameStatus;

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct AnalyzeRequest {
    /// Position in the engine's text notation
    pub position: String,
    /// Rule variant; Nine Men's Morris when absent
    pub rules: Option<Rules>,
    /// Fixed depth for every phase, overriding the defaults
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
    pub max_nodes: Option<usize>,
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct AnalyzeResponse {
    pub best_move: String,         // e.g. d5, a1-a4, xg7
    pub evaluation: i32,           // From the side to move's point of view
    pub depth: u8,                 // Search depth used
    pub nodes: usize,              // Total nodes searched
    pub time_ms: u64,              // Time spent searching in milliseconds
    pub aborted: bool,             // Stopped by the time or node limit
    pub position_after_move: String,
    pub status_after_move: GameStatus,
}

/// Main entry point for API consumers
/// Analyzes a mill position and returns the best move
pub fn analyze_position(request: AnalyzeRequest) -> Result<AnalyzeResponse, String> {
    let rules = request.rules.unwrap_or_default();
    let position = Position::from_notation(&request.position, rules).map_err(|e| e.to_string())?;

    if let Some(outcome) = position.outcome() {
        return Err(format!("Game is already decided: {outcome:?}"));
    }

    let mut config = SearchConfig {
        time_limit_ms: request.movetime_ms,
        max_nodes: request.max_nodes,
        ..SearchConfig::default()
    };

    if let Some(depth) = request.depth {
        config.placing_depth = PlacingDepth::Fixed(depth);
        config.moving_depth = depth;
    }

    let mut engine = Engine::new(config).map_err(|e| e.to_string())?;
    let result = engine.search(&position);

    let best_move = result.best_move.ok_or("No best move found")?;
    let after = position.apply_move(best_move);

    Ok(AnalyzeResponse {
        best_move: best_move.to_string(),
        evaluation: result.evaluation,
        depth: result.depth,
        nodes: result.nodes,
        time_ms: result.time_ms,
        aborted: result.aborted,
        position_after_move: after.to_notation(),
        status_after_move: after
            .outcome()
            .map_or(GameStatus::InProgress, GameStatus::Over),
    })
}

/// Simpler interface with just the position and depth
pub fn get_best_move(position: &str, depth: u8) -> Result<AnalyzeResponse, String> {
    analyze_position(AnalyzeRequest {
        position: position.to_string(),
        depth: Some(depth),
        ..AnalyzeRequest::default()
    })
}

/// JSON in, JSON out
#[cfg(feature = "api")]
pub fn analyze_json(request: &str) -> Result<String, String> {
    let request: AnalyzeRequest =
        serde_json::from_str(request).map_err(|e| format!("Invalid request: {e}"))?;
    let response = analyze_position(request)?;
    serde_json::to_string(&response).map_err(|e| e.to_string())
}
