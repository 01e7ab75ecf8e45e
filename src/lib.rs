pub mod board;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod movegen;
pub mod notation;
pub mod position;

pub use board::{Board, Color, Piece, Square};
pub use codec::{append_move, decode, encode, try_append_move, try_decode, Replay};
pub use error::{CodecError, FenError, ParseError};
pub use movegen::{GameStatus, Move, MoveGenerator};
pub use notation::move_to_notation;
pub use position::{CastlingRights, Position};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    const GENERATOR: MoveGenerator = MoveGenerator;

    fn mv(text: &str) -> Move {
        text.parse().unwrap()
    }

    fn play(texts: &[&str]) -> Position {
        texts.iter().fold(Position::initial(), |position, text| {
            let mv = mv(text);
            assert!(GENERATOR.is_legal_move(&position, &mv), "{text} should be legal");
            position.apply_move(mv)
        })
    }

    fn perft(position: &Position, depth: u32) -> u64 {
        let moves = GENERATOR.all_legal_moves(position);
        if depth == 1 {
            return moves.len() as u64;
        }
        moves
            .into_iter()
            .map(|mv| perft(&position.apply_move(mv), depth - 1))
            .sum()
    }

    #[test]
    fn test_initial_position() {
        let position = Position::initial();
        assert_eq!(position.side_to_move, Color::White);
        assert_eq!(position.castling_rights, CastlingRights::ALL);
        assert_eq!(position.en_passant, None);
        assert_eq!(position.halfmove_clock, 0);
        assert_eq!(position.fullmove_count, 0);
        assert_eq!(position.last_move, None);
        assert_eq!(GENERATOR.game_status(&position), GameStatus::Ongoing);
    }

    #[test]
    fn test_perft_initial_position() {
        let position = Position::initial();
        assert_eq!(perft(&position, 1), 20);
        assert_eq!(perft(&position, 2), 400);
        assert_eq!(perft(&position, 3), 8902);
    }

    #[test]
    fn test_perft_kiwipete() {
        let position = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(perft(&position, 1), 48);
        assert_eq!(perft(&position, 2), 2039);
    }

    #[test]
    fn test_perft_endgame() {
        let position = Position::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
        assert_eq!(perft(&position, 1), 14);
        assert_eq!(perft(&position, 2), 191);
        assert_eq!(perft(&position, 3), 2812);
    }

    #[test]
    fn test_fools_mate() {
        let position = play(&["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(GENERATOR.is_in_check(&position.board, Color::White));
        assert!(GENERATOR.all_legal_moves(&position).is_empty());
        assert_eq!(GENERATOR.game_status(&position), GameStatus::Checkmate);
    }

    #[test]
    fn test_en_passant_removes_passed_pawn() {
        let position = play(&["e2e4", "b8c6", "e4e5", "d7d5"]);
        let capture = mv("e5d6");
        assert!(GENERATOR.is_legal_move(&position, &capture));
        assert_eq!(move_to_notation(&position, &capture), "exd6");

        let after = position.apply_move(capture);
        let d5: Square = "d5".parse().unwrap();
        let d6: Square = "d6".parse().unwrap();
        assert!(after.board.is_empty_at(d5));
        assert_eq!(after.board.get_piece_at(d6), Some((Piece::Pawn, Color::White)));
        assert_eq!(after.halfmove_clock, 0);
    }

    #[test]
    fn test_en_passant_expires() {
        let position = play(&["e2e4", "b8c6", "e4e5", "d7d5", "g1f3", "g8f6"]);
        assert!(!GENERATOR.is_legal_move(&position, &mv("e5d6")));
    }

    #[test]
    fn test_castling_rights_never_return() {
        let start = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let position = ["h1h2", "a8a7", "h2h1", "a7a8"]
            .iter()
            .fold(start, |position, text| {
                let mv = mv(text);
                assert!(GENERATOR.is_legal_move(&position, &mv));
                position.apply_move(mv)
            });

        assert_eq!(position.board, Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap().board);
        assert!(!position.castling_rights.white_kingside);
        assert!(position.castling_rights.white_queenside);
        assert!(!position.castling_rights.black_queenside);
        assert!(position.castling_rights.black_kingside);
        assert!(!GENERATOR.is_legal_move(&position, &mv("e1g1")));
        assert!(GENERATOR.is_legal_move(&position, &mv("e1c1")));
    }

    #[test]
    fn test_wrong_side_cannot_move() {
        let position = Position::initial();
        assert!(!GENERATOR.is_legal_move(&position, &mv("e7e5")));
        assert!(!GENERATOR.is_legal_move(&position, &mv("e3e4")));
    }

    /// Random games: every legal move keeps the mover's king safe, and the
    /// game survives an encode/decode round trip.
    #[test]
    fn test_random_games() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..12 {
            let mut position = Position::initial();
            let mut moves = Vec::new();
            for _ in 0..120 {
                let legal = GENERATOR.all_legal_moves(&position);
                for candidate in &legal {
                    let next = position.apply_move(*candidate);
                    assert!(!GENERATOR.is_in_check(&next.board, position.side_to_move));
                }
                let Some(&choice) = legal.choose(&mut rng) else {
                    break;
                };
                position = position.apply_move(choice);
                moves.push(choice);
            }

            let replay = decode(&encode(&moves));
            assert_eq!(replay.moves, moves);
            assert_eq!(replay.position, position);
        }
    }
}
