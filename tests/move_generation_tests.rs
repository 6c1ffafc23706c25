use test_utils::*;

use mill_engine::{
    error::EngineError,
    position::Position,
    rules::Rules,
    types::{Move, Phase, Side, Square},
};

fn slides_from(position: &Position, from: Square) -> Vec<Square> {
    position
        .legal_moves()
        .iter()
        .filter_map(|mv| match *mv {
            Move::Slide { from: f, to } if f == from => Some(to),
            _ => None,
        })
        .collect()
}

fn removals(position: &Position) -> Vec<Square> {
    position
        .legal_moves()
        .iter()
        .map(|mv| match *mv {
            Move::Remove(square) => square,
            other => panic!("Expected only removals, got {other}"),
        })
        .collect()
}

mod placing {
    use super::*;

    #[test]
    fn test_start_position_places_on_every_point() {
        let position = Position::default();
        let moves = position.legal_moves();

        assert_eq!(moves.len(), 24, "Every point is free at the start");
        assert_eq!(moves.get(0), Some(&Move::Place(Square::D5)), "Square order");
        assert!(moves.iter().all(|mv| matches!(mv, Move::Place(_))));
        assert_eq!(position.phase(), Phase::Placing);
    }

    #[test]
    fn test_occupied_points_are_skipped() {
        let position = play(&Position::default(), &["d5", "g7"]);
        let moves = position.legal_moves();

        assert_eq!(moves.len(), 22);
        assert!(!position.is_legal(Move::Place(Square::D5)));
        assert!(!position.is_legal(Move::Place(Square::G7)));
        assert!(position.is_legal(Move::Place(Square::A1)));
    }

    #[test]
    fn test_banned_points_cannot_be_placed_on() {
        let rules = Rules {
            has_banned_locations: true,
            ..Rules::twelve_mens_morris()
        };

        // White closes a7-d7-g7 and removes black's b2
        let start = Position::new(rules);
        let position = play(&start, &["a7", "b2", "d7", "f2", "g7", "xb2"]);

        assert_eq!(position.side, Side::Black);
        assert!(
            !position.is_legal(Move::Place(Square::B2)),
            "Removed point is banned during placing"
        );
        assert_eq!(position.to_notation().matches('X').count(), 1);
        assert_eq!(position.hash(), position.compute_hash());
    }
}

mod moving {
    use super::*;

    fn position() -> Position {
        moving_position(
            &[Square::D5, Square::A7, Square::G1, Square::B4],
            &[Square::D3, Square::F6, Square::A4, Square::E3],
            Side::White,
        )
    }

    #[test]
    fn test_midpoint_slides_along_lines() {
        let position = position();
        assert_eq!(position.phase(), Phase::Moving);
        assert_eq!(
            slides_from(&position, Square::D5),
            vec![Square::E5, Square::C5, Square::D6],
            "Inner top midpoint connects to both ring neighbours and the middle ring"
        );
    }

    #[test]
    fn test_blocked_neighbours_are_skipped() {
        let position = position();
        // a7 neighbours: d7 (free) and a4 (black)
        assert_eq!(slides_from(&position, Square::A7), vec![Square::D7]);
    }

    #[test]
    fn test_corners_connect_only_with_diagonal_lines() {
        let plain = moving_position(
            &[Square::E5, Square::A7, Square::G1, Square::B4],
            &[Square::D3, Square::C3, Square::A4, Square::E3],
            Side::White,
        );
        assert_eq!(slides_from(&plain, Square::E5), vec![Square::D5, Square::E4]);

        let notation = plain.to_notation();
        let diagonal = position_with_rules(&notation, Rules::twelve_mens_morris());
        assert_eq!(
            slides_from(&diagonal, Square::E5),
            vec![Square::D5, Square::E4, Square::F6],
            "Diagonal line joins e5 and f6"
        );
    }

    #[test]
    fn test_only_side_to_move_generates() {
        let position = position();
        assert!(
            position.legal_moves().iter().all(|mv| match mv {
                Move::Slide { from, .. } => position.board.units(Side::White).is_bit_set(*from),
                _ => false,
            }),
            "Every move should slide a white piece"
        );
    }
}

mod flying {
    use super::*;

    #[test]
    fn test_three_pieces_fly_anywhere() {
        let position = moving_position(
            &[Square::D5, Square::A7, Square::G1],
            &[Square::D3, Square::F6, Square::A4, Square::E3],
            Side::White,
        );

        assert_eq!(position.phase(), Phase::Flying);
        assert_eq!(
            position.legal_moves().len(),
            3 * 17,
            "Three pieces times seventeen empty points"
        );
        assert!(position.is_legal(Move::Slide {
            from: Square::D5,
            to: Square::G7
        }));
    }

    #[test]
    fn test_no_flying_when_disabled() {
        let rules = Rules {
            may_fly: false,
            ..Rules::default()
        };
        let notation = notation(
            &[Square::D5, Square::A7, Square::G1],
            &[Square::D3, Square::F6, Square::A4, Square::E3],
            Side::White,
            (0, 0),
            0,
        );
        let position = position_with_rules(&notation, rules);

        assert_eq!(position.phase(), Phase::Moving);
        assert_eq!(
            slides_from(&position, Square::D5),
            vec![Square::E5, Square::C5, Square::D6]
        );
    }
}

mod rule_limits {
    use super::*;

    fn assert_invalid(rules: Rules) {
        assert!(
            matches!(rules.validate(), Err(EngineError::InvalidConfig(_))),
            "{rules:?} should be rejected"
        );
        assert!(Position::try_new(rules).is_err());
    }

    #[test]
    fn test_four_flying_pieces() {
        let rules = Rules {
            flying_piece_count: 4,
            ..Rules::default()
        };
        let notation = notation(
            &[Square::D5, Square::E3, Square::C3, Square::G7],
            &[Square::A1, Square::A4, Square::B2],
            Side::White,
            (0, 0),
            0,
        );
        let position = position_with_rules(&notation, rules);

        assert_eq!(position.phase(), Phase::Flying);
        assert_eq!(
            position.legal_moves().len(),
            4 * 17,
            "Four pieces times seventeen empty points"
        );
    }

    #[test]
    fn test_every_piece_flying_in_twelve_mens_morris() {
        let rules = Rules {
            flying_piece_count: 12,
            ..Rules::twelve_mens_morris()
        };
        let white: Vec<Square> = Square::iter().take(12).collect();
        let black: Vec<Square> = Square::iter().skip(12).take(3).collect();
        let notation = notation(&white, &black, Side::White, (0, 0), 0);
        let position = position_with_rules(&notation, rules);

        assert_eq!(position.legal_moves().len(), 12 * 9);
    }

    #[test]
    fn test_flying_count_above_piece_count_is_rejected() {
        assert_invalid(Rules {
            flying_piece_count: 10,
            ..Rules::default()
        });
    }

    #[test]
    fn test_too_many_pieces_are_rejected() {
        assert_invalid(Rules {
            pieces_per_side: 13,
            ..Rules::twelve_mens_morris()
        });
    }

    #[test]
    fn test_notation_checks_rules() {
        ensure_zobrist_initialized();
        let rules = Rules {
            pieces_per_side: 13,
            ..Rules::default()
        };
        let start = Position::default().to_notation();
        let result = Position::from_notation(&start, rules);

        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_default_rules_build_a_position() {
        ensure_zobrist_initialized();
        assert_eq!(Position::try_new(Rules::default()), Ok(Position::default()));
    }
}

mod mills_and_removal {
    use super::*;

    #[test]
    fn test_closing_a_mill_keeps_the_turn() {
        let position = moving_position(
            &[Square::A7, Square::D7, Square::G4, Square::B2],
            &[Square::C3, Square::E4, Square::B6, Square::D2],
            Side::White,
        );

        let next = position.apply_move(Move::Slide {
            from: Square::G4,
            to: Square::G7,
        });

        assert_eq!(next.side, Side::White, "Mill keeps the mover on turn");
        assert_eq!(next.pending_removals, 1);
        assert_eq!(
            removals(&next),
            vec![Square::E4, Square::C3, Square::D2, Square::B6],
            "Every black piece outside a mill, in square order"
        );
    }

    #[test]
    fn test_pieces_in_mills_are_protected() {
        let notation = notation(
            &[Square::A7, Square::D7, Square::G7, Square::B4],
            &[Square::G1, Square::D1, Square::A1, Square::D5],
            Side::White,
            (0, 0),
            1,
        );
        let position = position_from(&notation);

        assert_eq!(
            removals(&position),
            vec![Square::D5],
            "Only the black piece outside the g1-d1-a1 mill may be removed"
        );
    }

    #[test]
    fn test_all_in_mills_exception() {
        let notation = notation(
            &[Square::A7, Square::D7, Square::G7, Square::B4],
            &[Square::G1, Square::D1, Square::A1],
            Side::White,
            (0, 0),
            1,
        );
        let position = position_from(&notation);

        assert_eq!(
            removals(&position),
            vec![Square::G1, Square::D1, Square::A1],
            "With every black piece in a mill any of them may go"
        );
    }

    #[test]
    fn test_may_remove_from_mills_always() {
        let rules = Rules {
            may_remove_from_mills_always: true,
            ..Rules::default()
        };
        let notation = notation(
            &[Square::A7, Square::D7, Square::G7, Square::B4],
            &[Square::G1, Square::D1, Square::A1, Square::D5],
            Side::White,
            (0, 0),
            1,
        );
        let position = position_with_rules(&notation, rules);

        assert_eq!(removals(&position).len(), 4);
    }

    #[test]
    fn test_double_mill_grants_two_removals_when_enabled() {
        let build = |rules: Rules| {
            let notation = notation(
                &[Square::D7, Square::G7, Square::A4, Square::A1],
                &[Square::D5, Square::E5, Square::C3, Square::F4],
                Side::White,
                (5, 5),
                0,
            );
            position_with_rules(&notation, rules)
        };

        let single = build(Rules::default()).apply_move(Move::Place(Square::A7));
        assert_eq!(single.pending_removals, 1, "One removal per move by default");

        let rules = Rules {
            may_remove_multiple: true,
            ..Rules::default()
        };
        let double = build(rules).apply_move(Move::Place(Square::A7));
        assert_eq!(double.pending_removals, 2, "a7 closes two mills at once");

        let after_first = double.apply_move(Move::Remove(Square::D5));
        assert_eq!(after_first.side, Side::White, "Second removal still pending");
        assert_eq!(after_first.pending_removals, 1);

        let after_second = after_first.apply_move(Move::Remove(Square::C3));
        assert_eq!(after_second.side, Side::Black);
        assert_eq!(after_second.pending_removals, 0);
    }
}

mod move_text {
    use super::*;

    #[test]
    fn test_parse_and_format() {
        let cases = [
            ("d5", Move::Place(Square::D5)),
            (
                "a1-a4",
                Move::Slide {
                    from: Square::A1,
                    to: Square::A4,
                },
            ),
            ("xg7", Move::Remove(Square::G7)),
        ];

        for (text, mv) in cases {
            assert_eq!(text.parse::<Move>(), Ok(mv), "Parsing {text}");
            assert_eq!(mv.to_string(), text, "Formatting {mv:?}");
        }

        assert_eq!("G7".parse::<Move>(), Ok(Move::Place(Square::G7)), "Case-insensitive");
    }

    #[test]
    fn test_invalid_text_is_rejected() {
        for text in ["", "z9", "d4", "a1-a1", "a1-", "xx", "d5 e5"] {
            assert!(text.parse::<Move>().is_err(), "{text:?} should not parse");
        }
    }
}
