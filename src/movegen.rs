use crate::board::{Board, Color, Piece, Square};
use crate::position::Position;

/// A move intent: origin, destination and an optional promotion piece.
/// Whether it is legal depends on the position it is played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn new_promotion(from: Square, to: Square, promotion: Piece) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    DrawFiftyMove,
    DrawInsufficientMaterial,
}

impl GameStatus {
    pub fn is_game_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Move generation and game-state queries. Holds no state; every query is a
/// pure function of the position it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Moves the piece on `square` could make if its own king's safety were ignored.
    /// An empty square yields no moves.
    pub fn pseudo_legal_moves(&self, position: &Position, square: Square) -> Vec<Move> {
        let mut moves = Vec::new();
        let Some((piece, color)) = position.board.get_piece_at(square) else {
            return moves;
        };

        let board = &position.board;
        match piece {
            Piece::Pawn => pawn_moves(position, square, color, &mut moves),
            Piece::Knight => step_moves(board, square, color, &KNIGHT_OFFSETS, &mut moves),
            Piece::Bishop => slide_moves(board, square, color, &DIAGONALS, &mut moves),
            Piece::Rook => slide_moves(board, square, color, &ORTHOGONALS, &mut moves),
            Piece::Queen => {
                slide_moves(board, square, color, &DIAGONALS, &mut moves);
                slide_moves(board, square, color, &ORTHOGONALS, &mut moves);
            }
            Piece::King => {
                step_moves(board, square, color, &KING_OFFSETS, &mut moves);
                self.castling_moves(position, square, color, &mut moves);
            }
        }
        moves
    }

    fn castling_moves(&self, position: &Position, from: Square, color: Color, moves: &mut Vec<Move>) {
        let board = &position.board;
        let row = color.back_row();
        if from != Square::new(row, 4) {
            return;
        }
        let rights = position.castling_rights;
        if !rights.kingside(color) && !rights.queenside(color) {
            return;
        }
        let enemy = color.opposite();
        if self.is_square_under_attack(board, from, enemy) {
            return;
        }

        // (right, rook column, columns that must be empty, columns the king crosses)
        let sides: [(bool, u8, &[u8], [u8; 2]); 2] = [
            (rights.kingside(color), 7, &[5, 6], [5, 6]),
            (rights.queenside(color), 0, &[1, 2, 3], [3, 2]),
        ];
        for (allowed, rook_col, between, transit) in sides {
            if !allowed || board.get_piece_at(Square::new(row, rook_col)) != Some((Piece::Rook, color)) {
                continue;
            }
            if between.iter().any(|&col| !board.is_empty_at(Square::new(row, col))) {
                continue;
            }
            if transit
                .iter()
                .any(|&col| self.is_square_under_attack(board, Square::new(row, col), enemy))
            {
                continue;
            }
            moves.push(Move::new(from, Square::new(row, transit[1])));
        }
    }

    /// Whether any `attacker_color` piece attacks `square`, found by walking outward
    /// from the square rather than generating the attacker's moves.
    pub fn is_square_under_attack(&self, board: &Board, square: Square, attacker_color: Color) -> bool {
        let attacker_at = |dr: i8, dc: i8, kinds: &[Piece]| {
            square.offset(dr, dc).is_some_and(|from| {
                matches!(board.get_piece_at(from), Some((p, c)) if c == attacker_color && kinds.contains(&p))
            })
        };

        // Attacking pawns stand one step behind the square from their own point of view.
        let behind = -attacker_color.pawn_direction();
        if attacker_at(behind, -1, &[Piece::Pawn]) || attacker_at(behind, 1, &[Piece::Pawn]) {
            return true;
        }
        if KNIGHT_OFFSETS
            .iter()
            .any(|&(dr, dc)| attacker_at(dr, dc, &[Piece::Knight]))
        {
            return true;
        }
        if KING_OFFSETS
            .iter()
            .any(|&(dr, dc)| attacker_at(dr, dc, &[Piece::King]))
        {
            return true;
        }

        let rays = DIAGONALS
            .iter()
            .map(|&d| (d, Piece::Bishop))
            .chain(ORTHOGONALS.iter().map(|&d| (d, Piece::Rook)));
        for ((dr, dc), slider) in rays {
            let mut current = square;
            while let Some(next) = current.offset(dr, dc) {
                if let Some((piece, color)) = board.get_piece_at(next) {
                    if color == attacker_color && (piece == slider || piece == Piece::Queen) {
                        return true;
                    }
                    break;
                }
                current = next;
            }
        }

        false
    }

    /// A board without a king of `color` is never in check.
    pub fn is_in_check(&self, board: &Board, color: Color) -> bool {
        match board.king_square(color) {
            Some(king) => self.is_square_under_attack(board, king, color.opposite()),
            None => false,
        }
    }

    pub fn is_legal_move(&self, position: &Position, mv: &Move) -> bool {
        match position.board.get_piece_at(mv.from) {
            Some((_, color)) if color == position.side_to_move => {}
            _ => return false,
        }
        self.pseudo_legal_moves(position, mv.from).contains(mv) && self.leaves_king_safe(position, mv)
    }

    fn leaves_king_safe(&self, position: &Position, mv: &Move) -> bool {
        let next = position.apply_move(*mv);
        !self.is_in_check(&next.board, position.side_to_move)
    }

    /// Legal moves of the piece on `square`. Pieces of the side not to move have none.
    pub fn legal_moves(&self, position: &Position, square: Square) -> Vec<Move> {
        match position.board.get_piece_at(square) {
            Some((_, color)) if color == position.side_to_move => self
                .pseudo_legal_moves(position, square)
                .into_iter()
                .filter(|mv| self.leaves_king_safe(position, mv))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn all_legal_moves(&self, position: &Position) -> Vec<Move> {
        position
            .board
            .pieces()
            .filter(|&(_, _, color)| color == position.side_to_move)
            .flat_map(|(square, _, _)| self.legal_moves(position, square))
            .collect()
    }

    pub fn game_status(&self, position: &Position) -> GameStatus {
        if self.all_legal_moves(position).is_empty() {
            return if self.is_in_check(&position.board, position.side_to_move) {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
        }
        if position.halfmove_clock >= 100 {
            return GameStatus::DrawFiftyMove;
        }
        if self.is_insufficient_material(&position.board) {
            return GameStatus::DrawInsufficientMaterial;
        }
        GameStatus::Ongoing
    }

    /// Bare kings, a lone minor piece, or one bishop each on same-coloured squares.
    /// Bishops on opposite-coloured squares are deliberately not a draw here.
    fn is_insufficient_material(&self, board: &Board) -> bool {
        let material: Vec<(Square, Piece, Color)> = board
            .pieces()
            .filter(|&(_, piece, _)| piece != Piece::King)
            .collect();

        match material.as_slice() {
            [] => true,
            [(_, piece, _)] => matches!(piece, Piece::Bishop | Piece::Knight),
            [(first, Piece::Bishop, first_color), (second, Piece::Bishop, second_color)] => {
                first_color != second_color && first.parity() == second.parity()
            }
            _ => false,
        }
    }
}

fn pawn_moves(position: &Position, from: Square, color: Color, moves: &mut Vec<Move>) {
    let board = &position.board;
    let direction = color.pawn_direction();
    let last_row = color.opposite().back_row();
    let start_row = (color.back_row() as i8 + direction) as u8;

    let mut push = |to: Square| {
        if to.row() == last_row {
            for promotion in Piece::PROMOTIONS {
                moves.push(Move::new_promotion(from, to, promotion));
            }
        } else {
            moves.push(Move::new(from, to));
        }
    };

    if let Some(one) = from.offset(direction, 0).filter(|&to| board.is_empty_at(to)) {
        push(one);
        if from.row() == start_row {
            if let Some(two) = one.offset(direction, 0).filter(|&to| board.is_empty_at(to)) {
                push(two);
            }
        }
    }

    for dc in [-1, 1] {
        let Some(to) = from.offset(direction, dc) else {
            continue;
        };
        let enemy = matches!(board.get_piece_at(to), Some((_, c)) if c != color);
        let en_passant = color == position.side_to_move && position.en_passant == Some(to);
        if enemy || en_passant {
            push(to);
        }
    }
}

fn step_moves(board: &Board, from: Square, color: Color, offsets: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc) {
            if !matches!(board.get_piece_at(to), Some((_, c)) if c == color) {
                moves.push(Move::new(from, to));
            }
        }
    }
}

fn slide_moves(board: &Board, from: Square, color: Color, directions: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(dr, dc) in directions {
        let mut current = from;
        while let Some(to) = current.offset(dr, dc) {
            match board.get_piece_at(to) {
                None => moves.push(Move::new(from, to)),
                Some((_, c)) => {
                    if c != color {
                        moves.push(Move::new(from, to));
                    }
                    break;
                }
            }
            current = to;
        }
    }
}
