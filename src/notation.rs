//! Move text: coordinate notation (`e2e4`, `e7e8q`) through `Display`/`FromStr`
//! on [`Move`], and standard algebraic notation through [`move_to_notation`].

use std::fmt;
use std::str::FromStr;

use crate::board::{Piece, Square};
use crate::error::ParseError;
use crate::movegen::{GameStatus, Move, MoveGenerator};
use crate::position::Position;

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(ParseError::InvalidMove(s.to_string()));
        }
        let from: Square = s[0..2].parse()?;
        let to: Square = s[2..4].parse()?;

        match s[4..].chars().next() {
            None => Ok(Move::new(from, to)),
            Some(c) => match Piece::from_letter(c) {
                Some(piece) if Piece::PROMOTIONS.contains(&piece) => {
                    Ok(Move::new_promotion(from, to, piece))
                }
                _ => Err(ParseError::InvalidPromotion(c)),
            },
        }
    }
}

/// Standard algebraic notation for `mv` played in `position`, e.g. `Nbd7`,
/// `exd6`, `e8=Q#`, `O-O`. The move is assumed legal.
pub fn move_to_notation(position: &Position, mv: &Move) -> String {
    let Some((piece, _)) = position.board.get_piece_at(mv.from) else {
        return mv.to_string();
    };

    let mut san = String::new();
    if piece == Piece::King && mv.from.col().abs_diff(mv.to.col()) == 2 {
        san.push_str(if mv.to.col() > mv.from.col() { "O-O" } else { "O-O-O" });
    } else {
        let is_capture = position.board.get_piece_at(mv.to).is_some()
            || (piece == Piece::Pawn && mv.from.col() != mv.to.col());

        if piece == Piece::Pawn {
            if is_capture {
                san.push(mv.from.file_char());
            }
        } else {
            san.push(piece.letter());
            san.push_str(&disambiguation(position, mv, piece));
        }
        if is_capture {
            san.push('x');
        }
        san.push_str(&mv.to.to_string());
        if let Some(promotion) = mv.promotion {
            san.push('=');
            san.push(promotion.letter());
        }
    }

    let generator = MoveGenerator::new();
    let next = position.apply_move(*mv);
    if generator.game_status(&next) == GameStatus::Checkmate {
        san.push('#');
    } else if generator.is_in_check(&next.board, next.side_to_move) {
        san.push('+');
    }
    san
}

/// File, rank, or both: whichever first tells `mv` apart from other legal moves
/// of the same piece type landing on the same square.
fn disambiguation(position: &Position, mv: &Move, piece: Piece) -> String {
    let rivals: Vec<Square> = MoveGenerator::new()
        .all_legal_moves(position)
        .into_iter()
        .filter(|other| other.to == mv.to && other.from != mv.from)
        .filter(|other| matches!(position.board.get_piece_at(other.from), Some((p, _)) if p == piece))
        .map(|other| other.from)
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.col() != mv.from.col()) {
        mv.from.file_char().to_string()
    } else if rivals.iter().all(|sq| sq.row() != mv.from.row()) {
        mv.from.rank_char().to_string()
    } else {
        mv.from.to_string()
    }
}

/// Replays `moves` from the initial position as numbered SAN: `1. e4 e5 2. Nf3`.
pub fn move_list(moves: &[Move]) -> String {
    let mut position = Position::initial();
    let mut parts = Vec::with_capacity(moves.len());
    for (ply, mv) in moves.iter().enumerate() {
        let san = move_to_notation(&position, mv);
        if ply % 2 == 0 {
            parts.push(format!("{}. {}", ply / 2 + 1, san));
        } else {
            parts.push(san);
        }
        position = position.apply_move(*mv);
    }
    parts.join(" ")
}
