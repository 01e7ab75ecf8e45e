use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    /// Pieces a pawn may promote to, in generation order.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

    /// Upper-case letter used by FEN and SAN.
    pub fn letter(self) -> char {
        match self {
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        }
    }

    pub fn from_letter(c: char) -> Option<Piece> {
        match c.to_ascii_uppercase() {
            'P' => Some(Piece::Pawn),
            'N' => Some(Piece::Knight),
            'B' => Some(Piece::Bishop),
            'R' => Some(Piece::Rook),
            'Q' => Some(Piece::Queen),
            'K' => Some(Piece::King),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row the side's pieces start on (row 0 is rank 8).
    pub fn back_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Row delta of a pawn step.
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

/// A board coordinate. Row 0 is rank 8, row 7 is rank 1, column 0 is the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// # Panics
    ///
    /// Panics if `row` or `col` is outside `0..8`.
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(row < 8 && col < 8, "square out of range");
        Self { row, col }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        (index < 64).then(|| Self::new(index / 8, index % 8))
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// `row * 8 + col`, the form used by the move codec.
    pub fn index(self) -> u8 {
        self.row * 8 + self.col
    }

    /// The square `dr` rows and `dc` columns away, if it is on the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn file_char(self) -> char {
        (b'a' + self.col) as char
    }

    pub fn rank_char(self) -> char {
        (b'8' - self.row) as char
    }

    /// Square colour parity; equal parity means same-coloured squares.
    pub fn parity(self) -> u8 {
        (self.row + self.col) % 2
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Ok(Square::new(b'8' - rank, file - b'a')),
            _ => Err(ParseError::InvalidSquare(s.to_string())),
        }
    }
}

/// 8x8 grid of optional pieces, indexed by [`Square`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<(Piece, Color)>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    /// The standard opening layout.
    pub fn standard() -> Self {
        const BACK_RANK: [Piece; 8] = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];

        let mut board = Self::empty();
        for col in 0..8 {
            board.squares[0][col] = Some((BACK_RANK[col], Color::Black));
            board.squares[1][col] = Some((Piece::Pawn, Color::Black));
            board.squares[6][col] = Some((Piece::Pawn, Color::White));
            board.squares[7][col] = Some((BACK_RANK[col], Color::White));
        }
        board
    }

    pub fn get_piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        self.squares[square.row as usize][square.col as usize]
    }

    pub fn set_piece_at(&mut self, square: Square, piece: Option<(Piece, Color)>) {
        self.squares[square.row as usize][square.col as usize] = piece;
    }

    /// Removes and returns whatever stands on `square`.
    pub fn take_piece_at(&mut self, square: Square) -> Option<(Piece, Color)> {
        self.squares[square.row as usize][square.col as usize].take()
    }

    pub fn is_empty_at(&self, square: Square) -> bool {
        self.get_piece_at(square).is_none()
    }

    /// Every occupied square, scanned rank 8 to rank 1, a-file to h-file.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece, Color)> + '_ {
        (0..64u8).filter_map(move |index| {
            let square = Square::new(index / 8, index % 8);
            self.get_piece_at(square)
                .map(|(piece, color)| (square, piece, color))
        })
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|&(_, piece, c)| piece == Piece::King && c == color)
            .map(|(square, _, _)| square)
    }
}

/// Diagram character for a piece: upper case for white, lower case for black.
pub fn piece_char(piece: Piece, color: Color) -> char {
    match color {
        Color::White => piece.letter(),
        Color::Black => piece.letter().to_ascii_lowercase(),
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..8u8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8u8 {
                match self.get_piece_at(Square::new(row, col)) {
                    Some((piece, color)) => write!(f, "{}", piece_char(piece, color))?,
                    None => write!(f, ".")?,
                }
                if col < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
