//! Game tokens: a move list packed 16 bits per move and base64url-encoded.
//!
//! Each record is big-endian `from:6 | to:6 | promotion:4`, where squares are
//! `row * 8 + col` and promotion codes are 0 = none, 1 = queen, 2 = rook,
//! 3 = bishop, 4 = knight. The token has no length prefix and no padding.
//!
//! Decoding never trusts a position directly: every record is replayed from the
//! initial position and replay stops at the first record that is not legal.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use tracing::{debug, trace, warn};

use crate::board::{Piece, Square};
use crate::error::CodecError;
use crate::movegen::{Move, MoveGenerator};
use crate::position::Position;

/// URL-safe alphabet, written without padding. Reading tolerates padding and
/// ignores the unused low bits of the final symbol, so a link whose last
/// character was mangled still yields every complete record.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A verified game: the moves accepted by replay and the position they reach.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Replay {
    pub position: Position,
    pub moves: Vec<Move>,
}

impl Replay {
    /// Replays `candidates` from the initial position, keeping the longest legal prefix.
    pub fn from_moves(candidates: impl IntoIterator<Item = Option<Move>>) -> Self {
        let generator = MoveGenerator::new();
        let mut replay = Replay::default();
        for (ply, candidate) in candidates.into_iter().enumerate() {
            let Some(mv) = candidate else {
                debug!(ply, "replay stopped at malformed record");
                break;
            };
            if !generator.is_legal_move(&replay.position, &mv) {
                debug!(ply, %mv, "replay stopped at illegal move");
                break;
            }
            trace!(ply, %mv, "accepted");
            replay.position = replay.position.apply_move(mv);
            replay.moves.push(mv);
        }
        replay
    }
}

fn promotion_code(promotion: Option<Piece>) -> u16 {
    match promotion {
        Some(Piece::Queen) => 1,
        Some(Piece::Rook) => 2,
        Some(Piece::Bishop) => 3,
        Some(Piece::Knight) => 4,
        _ => 0,
    }
}

fn promotion_from_code(code: u16) -> Option<Option<Piece>> {
    match code {
        0 => Some(None),
        1 => Some(Some(Piece::Queen)),
        2 => Some(Some(Piece::Rook)),
        3 => Some(Some(Piece::Bishop)),
        4 => Some(Some(Piece::Knight)),
        _ => None,
    }
}

pub fn pack_move(mv: &Move) -> u16 {
    (mv.from.index() as u16) << 10 | (mv.to.index() as u16) << 4 | promotion_code(mv.promotion)
}

/// `None` when the promotion code is outside `0..=4`.
pub fn unpack_move(record: u16) -> Option<Move> {
    let from = Square::from_index((record >> 10) as u8)?;
    let to = Square::from_index(((record >> 4) & 0x3f) as u8)?;
    let promotion = promotion_from_code(record & 0xf)?;
    Some(Move { from, to, promotion })
}

pub fn pack(moves: &[Move]) -> Vec<u8> {
    moves
        .iter()
        .flat_map(|mv| pack_move(mv).to_be_bytes())
        .collect()
}

/// Splits `bytes` into records. An odd byte count is an error; a record with a
/// bad promotion code comes back as `None` so replay can stop there.
pub fn unpack(bytes: &[u8]) -> Result<Vec<Option<Move>>, CodecError> {
    if bytes.len() % 2 != 0 {
        return Err(CodecError::OddLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| unpack_move(u16::from_be_bytes([pair[0], pair[1]])))
        .collect())
}

/// The empty list encodes to the empty string.
pub fn encode(moves: &[Move]) -> String {
    TOKEN_ENGINE.encode(pack(moves))
}

/// Decodes `token`, failing only when the text itself is unreadable. Illegal
/// moves truncate the replay instead of failing.
pub fn try_decode(token: &str) -> Result<Replay, CodecError> {
    if token.is_empty() {
        return Ok(Replay::default());
    }
    let bytes = TOKEN_ENGINE.decode(token)?;
    Ok(Replay::from_moves(unpack(&bytes)?))
}

/// Like [`try_decode`], but an unreadable token falls back to the initial
/// position with no moves.
pub fn decode(token: &str) -> Replay {
    try_decode(token).unwrap_or_else(|err| {
        warn!(%err, "discarding unreadable game token");
        Replay::default()
    })
}

/// Token for the game in `token` followed by `mv`. The move is not checked; an
/// illegal one is dropped the next time the token is decoded.
pub fn append_move(token: &str, mv: Move) -> String {
    let mut moves = decode(token).moves;
    moves.push(mv);
    encode(&moves)
}

/// Like [`append_move`], but rejects a move that is not legal in the decoded position.
pub fn try_append_move(token: &str, mv: Move) -> Result<String, CodecError> {
    let Replay { position, mut moves } = decode(token);
    if !MoveGenerator::new().is_legal_move(&position, &mv) {
        return Err(CodecError::IllegalMove { mv, ply: moves.len() });
    }
    moves.push(mv);
    Ok(encode(&moves))
}
