//! Play a recorded game forward to get a single position.

use tracing::debug;

use crate::coords::Coordinate;
use crate::error::{IcnError, IcnResult, MoveFault};
use crate::moves::{castle_landing, DoublePush};
use crate::piece::{Color, PieceKind};
use crate::record::GameRecord;

/// How far to advance a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halfmoves {
    Count(usize),
    All,
}

impl Halfmoves {
    fn limit(self, available: usize) -> usize {
        match self {
            Halfmoves::Count(n) => n.min(available),
            Halfmoves::All => available,
        }
    }
}

impl From<usize> for Halfmoves {
    fn from(n: usize) -> Self {
        Halfmoves::Count(n)
    }
}

/// Apply the first `halfmoves` moves of `record` to its starting position.
///
/// The returned record describes the reached position: starting position,
/// special rights, turn, counters and en passant square are advanced, and the
/// move list is empty. The input is left untouched.
pub fn advance_position(record: &GameRecord, halfmoves: Halfmoves) -> IcnResult<GameRecord> {
    if record.moves.is_empty() {
        return Ok(record.clone());
    }

    let mut out = record.clone();
    out.moves.clear();
    let mut board = record.starting_position.clone().unwrap_or_default();
    // Square of the last moved piece, which is what an en passant capture takes.
    let mut victim: Option<Coordinate> = record
        .enpassant
        .map(|target| DoublePush::from_target(target, record.turn).map(|push| push.landing))
        .transpose()?;

    let count = halfmoves.limit(record.moves.len());
    for (index, mv) in record.moves.iter().take(count).enumerate() {
        if out.turn == Color::Black {
            if let Some(full_move) = out.full_move.as_mut() {
                *full_move = full_move.saturating_add(1);
            }
        }
        out.turn = out.turn.opposite();

        let (start, end) = (mv.start_coords, mv.end_coords);
        let piece = mv
            .piece_type
            .or_else(|| board.get(&start))
            .ok_or(IcnError::at_move(index, MoveFault::PieceNotFound(start)))?;

        board.remove(&start);
        board.insert(end, mv.promotion.unwrap_or(piece));
        out.special_rights.revoke(&start);
        out.special_rights.revoke(&end);

        let pawn = piece.is(PieceKind::Pawns);
        if let Some(rule) = out.move_rule.as_mut() {
            *rule = if mv.captured.is_some() || pawn {
                rule.reset()
            } else {
                rule.tick()
            };
        }

        if mv.enpassant.is_some() {
            if let Some(square) = victim {
                board.remove(&square);
                out.special_rights.revoke(&square);
            }
        }

        out.enpassant = (pawn && end.y.abs_diff(start.y) > 1).then(|| {
            let skipped = start
                .y
                .min(end.y)
                .saturating_add_unsigned(end.y.abs_diff(start.y).div_ceil(2));
            Coordinate::new(end.x, skipped)
        });

        if let Some(castle) = mv.castle {
            let landing = castle_landing(end, castle.dir)?;
            if let Some(partner) = board.remove(&castle.coord) {
                board.insert(landing, partner);
            }
            out.special_rights.revoke(&castle.coord);
        }

        victim = Some(end);
    }

    if record.starting_position.is_some() {
        out.starting_position = Some(board);
    }
    debug!(
        applied = count,
        recorded = record.moves.len(),
        "Advanced game to position"
    );
    Ok(out)
}
