use thiserror::Error;

use crate::movegen::Move;

/// Errors from parsing squares and coordinate moves such as `e2e4`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid square `{0}`")]
    InvalidSquare(String),

    #[error("invalid move `{0}`")]
    InvalidMove(String),

    #[error("invalid promotion piece `{0}`")]
    InvalidPromotion(char),
}

/// Errors from reading a FEN record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected at least 4 fields, found {0}")]
    MissingFields(usize),

    #[error("expected 8 ranks in piece placement, found {0}")]
    RankCount(usize),

    #[error("rank {rank} does not describe exactly 8 squares")]
    RankWidth { rank: usize },

    #[error("unknown piece character `{0}`")]
    UnknownPiece(char),

    #[error("invalid side to move `{0}`")]
    SideToMove(String),

    #[error("invalid castling field `{0}`")]
    Castling(String),

    #[error("invalid en passant square `{0}`")]
    EnPassant(String),

    #[error("invalid move counter `{0}`")]
    Counter(String),
}

/// Errors surfaced by [`crate::codec::try_decode`] and
/// [`crate::codec::try_append_move`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("token is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token decodes to {0} bytes, which is not a whole number of moves")]
    OddLength(usize),

    #[error("move {mv} is not legal after {ply} plies")]
    IllegalMove { mv: Move, ply: usize },
}
