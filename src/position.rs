use crate::board::{piece_char, Board, Color, Piece, Square};
use crate::error::FenError;
use crate::movegen::Move;

/// Which castling moves each side may still make. Rights are only ever cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    pub const NONE: CastlingRights = CastlingRights {
        white_kingside: false,
        white_queenside: false,
        black_kingside: false,
        black_queenside: false,
    };

    pub fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    pub fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    fn revoke_all(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    /// Clears the right tied to a rook home square, if `square` is one.
    fn revoke_corner(&mut self, square: Square) {
        match (square.row(), square.col()) {
            (7, 0) => self.white_queenside = false,
            (7, 7) => self.white_kingside = false,
            (0, 0) => self.black_queenside = false,
            (0, 7) => self.black_kingside = false,
            _ => {}
        }
    }
}

/// Full game state. Positions are values: [`Position::apply_move`] returns a
/// successor and leaves `self` untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub board: Board,
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<Square>,
    /// Plies since the last pawn move or capture.
    pub halfmove_clock: u32,
    /// Full moves completed by Black. FEN's move number is one more than this.
    pub fullmove_count: u32,
    /// Only kept for highlighting.
    pub last_move: Option<Move>,
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}

impl Position {
    pub fn initial() -> Self {
        Self {
            board: Board::standard(),
            side_to_move: Color::White,
            castling_rights: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_count: 0,
            last_move: None,
        }
    }

    /// Returns the position after `mv`. Legality is not checked; callers
    /// validate with [`MoveGenerator::is_legal_move`](crate::movegen::MoveGenerator::is_legal_move) first.
    ///
    /// # Panics
    ///
    /// Panics if `mv.from` is empty.
    pub fn apply_move(&self, mv: Move) -> Position {
        let mut next = self.clone();
        let Some((piece, color)) = next.board.take_piece_at(mv.from) else {
            panic!("apply_move: no piece on {}", mv.from);
        };

        let mut is_capture = next.board.get_piece_at(mv.to).is_some();
        let placed = mv.promotion.unwrap_or(piece);
        next.board.set_piece_at(mv.to, Some((placed, color)));

        // En passant: the captured pawn sits beside the origin, behind the target.
        if piece == Piece::Pawn && Some(mv.to) == self.en_passant && mv.from.col() != mv.to.col() {
            let victim = Square::new(mv.from.row(), mv.to.col());
            next.board.set_piece_at(victim, None);
            is_capture = true;
        }

        if piece == Piece::King && mv.from.col().abs_diff(mv.to.col()) == 2 {
            let row = mv.from.row();
            let (rook_from, rook_to) = if mv.to.col() > mv.from.col() {
                (Square::new(row, 7), Square::new(row, 5))
            } else {
                (Square::new(row, 0), Square::new(row, 3))
            };
            let rook = next.board.take_piece_at(rook_from);
            next.board.set_piece_at(rook_to, rook);
        }

        if piece == Piece::King {
            next.castling_rights.revoke_all(color);
        }
        next.castling_rights.revoke_corner(mv.from);
        next.castling_rights.revoke_corner(mv.to);

        next.en_passant = if piece == Piece::Pawn && mv.from.row().abs_diff(mv.to.row()) == 2 {
            Some(Square::new((mv.from.row() + mv.to.row()) / 2, mv.from.col()))
        } else {
            None
        };

        if piece == Piece::Pawn || is_capture {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock += 1;
        }
        if color == Color::Black {
            next.fullmove_count += 1;
        }

        next.side_to_move = self.side_to_move.opposite();
        next.last_move = Some(mv);
        next
    }

    /// Applies each move in turn, without validation.
    pub fn apply_moves<'a>(&self, moves: impl IntoIterator<Item = &'a Move>) -> Position {
        moves
            .into_iter()
            .fold(self.clone(), |position, &mv| position.apply_move(mv))
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(FenError::MissingFields(fields.len()));
        }

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }
        let mut board = Board::empty();
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0u8;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as u8;
                } else {
                    let piece = Piece::from_letter(c).ok_or(FenError::UnknownPiece(c))?;
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if col >= 8 {
                        return Err(FenError::RankWidth { rank: 8 - row });
                    }
                    board.set_piece_at(Square::new(row as u8, col), Some((piece, color)));
                    col += 1;
                }
                if col > 8 {
                    return Err(FenError::RankWidth { rank: 8 - row });
                }
            }
            if col != 8 {
                return Err(FenError::RankWidth { rank: 8 - row });
            }
        }

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        let mut castling_rights = CastlingRights::NONE;
        if fields[2] != "-" {
            for c in fields[2].chars() {
                match c {
                    'K' => castling_rights.white_kingside = true,
                    'Q' => castling_rights.white_queenside = true,
                    'k' => castling_rights.black_kingside = true,
                    'q' => castling_rights.black_queenside = true,
                    _ => return Err(FenError::Castling(fields[2].to_string())),
                }
            }
        }

        let en_passant = match fields[3] {
            "-" => None,
            text => Some(
                text.parse::<Square>()
                    .map_err(|_| FenError::EnPassant(text.to_string()))?,
            ),
        };

        let counter = |index: usize, default: u32| -> Result<u32, FenError> {
            match fields.get(index) {
                Some(text) => text
                    .parse()
                    .map_err(|_| FenError::Counter(text.to_string())),
                None => Ok(default),
            }
        };

        Ok(Self {
            board,
            side_to_move,
            castling_rights,
            en_passant,
            halfmove_clock: counter(4, 0)?,
            fullmove_count: counter(5, 1)?.saturating_sub(1),
            last_move: None,
        })
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for row in 0..8u8 {
            let mut empty = 0;
            for col in 0..8u8 {
                match self.board.get_piece_at(Square::new(row, col)) {
                    Some((piece, color)) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece_char(piece, color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if row < 7 {
                fen.push('/');
            }
        }

        fen.push_str(match self.side_to_move {
            Color::White => " w ",
            Color::Black => " b ",
        });

        let rights = self.castling_rights;
        let mut castling = String::new();
        for (flag, c) in [
            (rights.white_kingside, 'K'),
            (rights.white_queenside, 'Q'),
            (rights.black_kingside, 'k'),
            (rights.black_queenside, 'q'),
        ] {
            if flag {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        fen.push_str(&castling);

        match self.en_passant {
            Some(square) => fen.push_str(&format!(" {square}")),
            None => fen.push_str(" -"),
        }
        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_count + 1));
        fen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEN_START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn mv(text: &str) -> Move {
        text.parse().unwrap()
    }

    #[test]
    fn test_initial_position_matches_start_fen() {
        let position = Position::initial();
        assert_eq!(position.to_fen(), FEN_START);
        assert_eq!(Position::from_fen(FEN_START).unwrap(), position);
    }

    #[test]
    fn test_fen_round_trip() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
        ];
        for fen in fens {
            assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn test_initial_clocks_start_at_zero() {
        let position = Position::initial();
        assert_eq!(position.halfmove_clock, 0);
        assert_eq!(position.fullmove_count, 0);
        assert!(position.to_fen().ends_with(" 0 1"));
        assert_eq!(Position::from_fen(&position.to_fen()).unwrap(), position);
    }

    #[test]
    fn test_fen_counters_default() {
        let position = Position::from_fen("k7/8/8/8/8/8/8/K7 b -  -").unwrap();
        assert_eq!(position.halfmove_clock, 0);
        assert_eq!(position.fullmove_count, 0);
        assert_eq!(position.side_to_move, Color::Black);
    }

    #[test]
    fn test_bad_fen() {
        assert_eq!(Position::from_fen("8/8 w"), Err(FenError::MissingFields(2)));
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8 w - -"),
            Err(FenError::RankCount(7))
        );
        assert_eq!(
            Position::from_fen("9/8/8/8/8/8/8/8 w - -"),
            Err(FenError::RankWidth { rank: 8 })
        );
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/7x w - -"),
            Err(FenError::UnknownPiece('x'))
        );
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/8 x - -"),
            Err(FenError::SideToMove(_))
        ));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/8 w KX -"),
            Err(FenError::Castling(_))
        ));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/8 w - e9"),
            Err(FenError::EnPassant(_))
        ));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/8 w - - x 1"),
            Err(FenError::Counter(_))
        ));
    }

    #[test]
    fn test_apply_move_is_non_destructive() {
        let start = Position::initial();
        let next = start.apply_move(mv("e2e4"));

        assert_eq!(start, Position::initial());
        assert!(next.board.is_empty_at(sq("e2")));
        assert_eq!(next.board.get_piece_at(sq("e4")), Some((Piece::Pawn, Color::White)));
        assert_eq!(next.en_passant, Some(sq("e3")));
        assert_eq!(next.side_to_move, Color::Black);
        assert_eq!(next.last_move, Some(mv("e2e4")));
    }

    #[test]
    fn test_counters() {
        let position = Position::initial()
            .apply_move(mv("g1f3"))
            .apply_move(mv("g8f6"));
        assert_eq!(position.halfmove_clock, 2);
        assert_eq!(position.fullmove_count, 1);
        assert_eq!(position.en_passant, None);

        let position = position.apply_move(mv("e2e4"));
        assert_eq!(position.halfmove_clock, 0);
        assert_eq!(position.fullmove_count, 1);

        let position = position.apply_move(mv("f6e4"));
        assert_eq!(position.halfmove_clock, 0, "capture resets the clock");
        assert_eq!(position.fullmove_count, 2);
    }

    #[test]
    fn test_castling_relocates_rook() {
        let position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

        let kingside = position.apply_move(mv("e1g1"));
        assert_eq!(kingside.board.get_piece_at(sq("g1")), Some((Piece::King, Color::White)));
        assert_eq!(kingside.board.get_piece_at(sq("f1")), Some((Piece::Rook, Color::White)));
        assert!(kingside.board.is_empty_at(sq("h1")));
        assert!(!kingside.castling_rights.kingside(Color::White));
        assert!(!kingside.castling_rights.queenside(Color::White));
        assert!(kingside.castling_rights.kingside(Color::Black));

        let queenside = kingside.apply_move(mv("e8c8"));
        assert_eq!(queenside.board.get_piece_at(sq("c8")), Some((Piece::King, Color::Black)));
        assert_eq!(queenside.board.get_piece_at(sq("d8")), Some((Piece::Rook, Color::Black)));
        assert!(queenside.board.is_empty_at(sq("a8")));
        assert_eq!(queenside.castling_rights, CastlingRights::NONE);
    }

    #[test]
    fn test_capturing_a_rook_clears_opponent_right() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let next = position.apply_move(mv("h1h8"));

        assert!(!next.castling_rights.white_kingside);
        assert!(!next.castling_rights.black_kingside);
        assert!(next.castling_rights.white_queenside);
        assert!(next.castling_rights.black_queenside);
    }

    #[test]
    fn test_promotion_replaces_pawn() {
        let position = Position::from_fen("k7/4P3/8/8/8/8/8/K7 w - - 5 40").unwrap();
        let next = position.apply_move(mv("e7e8n"));
        assert_eq!(next.board.get_piece_at(sq("e8")), Some((Piece::Knight, Color::White)));
        assert!(next.board.is_empty_at(sq("e7")));
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    #[should_panic(expected = "no piece on e4")]
    fn test_apply_move_from_empty_square_panics() {
        Position::initial().apply_move(mv("e4e5"));
    }
}
