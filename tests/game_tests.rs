use test_utils::*;

use mill_engine::{
    error::EngineError,
    game::Game,
    position::Position,
    rules::Rules,
    types::{GameOverReason, GameStatus, Move, Outcome, Side, Square},
};

/// White to close a7-d7-g7 with g4-g7 against a three-piece black side
fn nearly_won() -> Game {
    Game::from_position(moving_position(
        &[Square::A7, Square::D7, Square::G4, Square::B2],
        &[Square::C3, Square::E4, Square::B6],
        Side::White,
    ))
}

mod playing {
    use super::*;

    #[test]
    fn test_new_game_is_in_progress() {
        ensure_zobrist_initialized();
        let game = Game::default();

        assert_eq!(game.status(), GameStatus::InProgress);
        assert!(!game.is_over());
        assert!(game.moves().is_empty());
        assert_eq!(*game.position(), Position::default());
    }

    #[test]
    fn test_play_records_moves_and_positions() {
        ensure_zobrist_initialized();
        let mut game = Game::new(Rules::twelve_mens_morris());

        assert_eq!(game.play(Move::Place(Square::D5)), Ok(GameStatus::InProgress));
        assert_eq!(game.play_str("g7"), Ok(GameStatus::InProgress));

        assert_eq!(
            game.moves(),
            &[Move::Place(Square::D5), Move::Place(Square::G7)]
        );
        assert_eq!(game.position().side, Side::White);
        assert_eq!(game.position().in_hand, [11, 11]);
        assert_eq!(game.position().ply, 2);
    }

    #[test]
    fn test_illegal_move_is_rejected() {
        ensure_zobrist_initialized();
        let mut game = Game::default();
        game.play_str("d5").unwrap();
        let before = *game.position();

        assert_eq!(
            game.play(Move::Place(Square::D5)),
            Err(EngineError::IllegalMove(Move::Place(Square::D5))),
            "Occupied point"
        );
        assert_eq!(
            game.play_str("d5-e5"),
            Err(EngineError::IllegalMove(Move::Slide {
                from: Square::D5,
                to: Square::E5
            })),
            "No slides while placing"
        );
        assert!(matches!(
            game.play_str("nonsense"),
            Err(EngineError::ParseMove(_))
        ));

        assert_eq!(*game.position(), before, "Rejected moves change nothing");
        assert_eq!(game.moves().len(), 1);
    }

    #[test]
    fn test_history_keys_exclude_current_position() {
        ensure_zobrist_initialized();
        let mut game = Game::default();
        let start_key = game.position().key();
        assert!(game.history_keys().is_empty());

        game.play_str("d5").unwrap();
        game.play_str("g7").unwrap();

        let history = game.history_keys();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], start_key, "Oldest first");
        assert!(!history.contains(&game.position().key()));
    }
}

mod ending {
    use super::*;

    #[test]
    fn test_last_removal_wins() {
        let mut game = nearly_won();

        assert_eq!(game.play_str("g4-g7"), Ok(GameStatus::InProgress));
        assert_eq!(game.position().side, Side::White, "Removal still owed");

        let status = game.play_str("xc3");
        assert_eq!(
            status,
            Ok(GameStatus::Over(Outcome {
                winner: Some(Side::White),
                reason: GameOverReason::LoseFewerThanThree,
            }))
        );
        assert!(game.is_over());
        assert_eq!(
            game.play_str("e4-e5"),
            Err(EngineError::GameOver),
            "No moves after the end"
        );
    }

    #[test]
    fn test_decided_position_starts_over() {
        let game = Game::from_position(moving_position(
            &[Square::A7, Square::D7],
            &[Square::C3, Square::E4, Square::B6],
            Side::White,
        ));

        assert_eq!(
            game.status(),
            GameStatus::Over(Outcome {
                winner: Some(Side::Black),
                reason: GameOverReason::LoseFewerThanThree,
            })
        );
    }

    #[test]
    fn test_resign() {
        ensure_zobrist_initialized();
        let mut game = Game::default();
        game.play_str("d5").unwrap();

        assert_eq!(
            game.resign(Side::Black),
            Ok(GameStatus::Over(Outcome {
                winner: Some(Side::White),
                reason: GameOverReason::LoseResign,
            }))
        );
        assert_eq!(game.resign(Side::White), Err(EngineError::GameOver));
        assert_eq!(game.play_str("g7"), Err(EngineError::GameOver));
    }

    #[test]
    fn test_timeout() {
        ensure_zobrist_initialized();
        let mut game = Game::default();

        assert_eq!(
            game.flag_timeout(Side::White),
            Ok(GameStatus::Over(Outcome {
                winner: Some(Side::Black),
                reason: GameOverReason::LoseTimeout,
            }))
        );
        assert_eq!(game.flag_timeout(Side::Black), Err(EngineError::GameOver));
    }
}

mod undo {
    use super::*;

    #[test]
    fn test_undo_restores_previous_position() {
        ensure_zobrist_initialized();
        let mut game = Game::default();
        game.play_str("d5").unwrap();
        let after_first = *game.position();
        game.play_str("g7").unwrap();

        assert_eq!(game.undo(), Some(Move::Place(Square::G7)));
        assert_eq!(*game.position(), after_first);
        assert_eq!(game.moves(), &[Move::Place(Square::D5)]);

        assert_eq!(game.undo(), Some(Move::Place(Square::D5)));
        assert_eq!(*game.position(), Position::default());
        assert_eq!(game.undo(), None, "Nothing left to take back");
    }

    #[test]
    fn test_undo_reopens_finished_game() {
        let mut game = nearly_won();
        game.play_str("g4-g7").unwrap();
        game.play_str("xc3").unwrap();
        assert!(game.is_over());

        assert_eq!(game.undo(), Some(Move::Remove(Square::C3)));
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.position().pending_removals, 1);

        assert_eq!(
            game.play_str("xe4"),
            Ok(GameStatus::Over(Outcome {
                winner: Some(Side::White),
                reason: GameOverReason::LoseFewerThanThree,
            })),
            "A different removal also wins"
        );
    }
}
