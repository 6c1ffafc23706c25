pub mod api;
pub mod bitboard;
pub mod board;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod game;
pub mod hash;
pub mod movegen;
pub mod moves;
pub mod position;
pub mod rules;
pub mod side;
pub mod square;
pub mod stack;
pub mod time;
pub mod topology;
pub mod transposition;
pub mod types;
pub mod worker;
pub mod zobrist_hash;
