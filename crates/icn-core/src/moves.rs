//! Move list grammar and reconstruction of omitted move fields.
//!
//! A move token is `[Code]x,y [x|>] x,y[=Promotion][+|#]`, separated by `|`,
//! move numbers or line breaks. Only start, end, promotion and check marks
//! are read from the text. Everything else (moved piece, captured piece,
//! en passant, castling partner) is recovered by replaying the moves over the
//! starting position.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::coords::Coordinate;
use crate::error::{Bracket, IcnError, IcnResult, MoveFault};
use crate::piece::{self, Color, PieceKind, PieceType};
use crate::position::{Position, SpecialRights};
use crate::record::{Castle, Move};

lazy_static! {
    static ref MOVE_TOKEN: Regex = Regex::new(
        r"[a-zA-Z]*-?[0-9]+,-?[0-9]+[^|.0-9]*(?:x|>)+[^|.0-9]*-?[0-9]+,-?[0-9]+[^|.0-9]*"
    )
    .expect("move token pattern");
    static ref COORDINATE: Regex = Regex::new(r"-?[0-9]+,-?[0-9]+").expect("coordinate pattern");
    static ref ANNOTATION: Regex =
        Regex::new(r"\{[^{}()]*\}|\([^{}()]*\)").expect("annotation pattern");
    static ref LETTERS: Regex = Regex::new(r"[a-zA-Z]+").expect("letters pattern");
}

/// A pawn that just advanced more than one rank and may be taken en passant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DoublePush {
    /// Where the pawn now stands.
    pub landing: Coordinate,
    /// +1 if it moved toward increasing y, -1 otherwise.
    pub dir: i8,
}

impl DoublePush {
    /// Recover the pushed pawn from an en passant target square: the pawn
    /// sits one rank beyond the target, on the side that just moved.
    pub fn from_target(target: Coordinate, turn: Color) -> IcnResult<Self> {
        let dir = if turn == Color::Black { 1 } else { -1 };
        Ok(Self {
            landing: target.offset(0, i64::from(dir))?,
            dir,
        })
    }

    /// The push a pawn move makes, if it moved more than one rank.
    pub fn of(piece: PieceType, start: Coordinate, end: Coordinate) -> Option<Self> {
        (piece.is(PieceKind::Pawns) && end.y.abs_diff(start.y) > 1).then(|| Self {
            landing: end,
            dir: if end.y > start.y { 1 } else { -1 },
        })
    }
}

/// Square a castling partner lands on: next to the king, on the side it came from.
pub(crate) fn castle_landing(king_end: Coordinate, dir: i8) -> IcnResult<Coordinate> {
    king_end.offset(-i64::from(dir), 0)
}

/// A move token split into its parts, before any board context.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MoveToken<'a> {
    code: &'a str,
    start: Coordinate,
    end: Coordinate,
    suffix: &'a str,
}

impl<'a> MoveToken<'a> {
    fn parse(token: &'a str) -> IcnResult<Self> {
        let malformed = || IcnError::malformed("move", token);

        let mut coords = COORDINATE.find_iter(token);
        let start = coords.next().ok_or_else(malformed)?;
        let end = coords.next().ok_or_else(malformed)?;
        let code_len = token
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(token.len());

        Ok(Self {
            code: &token[..code_len],
            start: start.as_str().parse()?,
            end: end.as_str().parse()?,
            suffix: token[end.end()..].trim(),
        })
    }

    fn piece(&self) -> IcnResult<Option<PieceType>> {
        if self.code.is_empty() {
            Ok(None)
        } else {
            piece::decode(self.code).map(Some)
        }
    }

    /// First letter run after the end square, ignoring `(...)`/`{...}` remarks.
    fn promotion(&self) -> IcnResult<Option<PieceType>> {
        let suffix = ANNOTATION.replace_all(self.suffix, "");
        LETTERS
            .find(&suffix)
            .map(|code| piece::decode(code.as_str()))
            .transpose()
    }

    fn check_and_mate(&self) -> (bool, bool) {
        let mate = self.suffix.contains('#');
        (mate || self.suffix.contains('+'), mate)
    }
}

/// Drop `{...}` comments and `!`, `?`, `=` annotation marks.
fn strip_noise(blob: &str) -> IcnResult<String> {
    let mut out = String::with_capacity(blob.len());
    let mut rest = blob;

    while let Some(open) = rest.find('{') {
        let close = rest[open..]
            .find('}')
            .ok_or(IcnError::UnterminatedBracket(Bracket::Comment))?;
        out.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out.retain(|c| !matches!(c, '!' | '?' | '='));
    Ok(out)
}

/// What the parser knows about the game when the move list starts.
pub(crate) struct MoveContext<'a> {
    pub starting_position: Option<&'a Position>,
    pub special_rights: &'a SpecialRights,
    pub enpassant: Option<Coordinate>,
    pub turn: Color,
}

/// Parse a move list. With `reconstruct`, replay it over the starting
/// position to fill in the fields the notation leaves out.
pub(crate) fn parse_moves(
    blob: &str,
    context: &MoveContext<'_>,
    reconstruct: bool,
    trust_check_symbols: bool,
) -> IcnResult<Vec<Move>> {
    let cleaned = strip_noise(blob)?;
    let tokens: Vec<MoveToken<'_>> = MOVE_TOKEN
        .find_iter(&cleaned)
        .map(|m| MoveToken::parse(m.as_str()))
        .collect::<IcnResult<_>>()?;

    if tokens.is_empty() {
        debug!("Move list holds no recognizable moves");
        return Ok(Vec::new());
    }

    let mut replay = if reconstruct {
        let position = context.starting_position.ok_or(IcnError::MissingContext)?;
        Some(Reconstructor::new(position, context)?)
    } else {
        None
    };

    let mut moves = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        let mut mv = Move::new(token.start, token.end);
        mv.promotion = token.promotion()?;
        if trust_check_symbols {
            (mv.check, mv.mate) = token.check_and_mate();
        }

        match replay.as_mut() {
            Some(replay) => replay.apply(index, &mut mv)?,
            None => mv.piece_type = token.piece()?,
        }
        moves.push(mv);
    }

    debug!(moves = moves.len(), reconstructed = reconstruct, "Parsed move list");
    Ok(moves)
}

/// Running board used to recover omitted move fields.
struct Reconstructor {
    board: Position,
    rights: SpecialRights,
    double_push: Option<DoublePush>,
}

impl Reconstructor {
    fn new(position: &Position, context: &MoveContext<'_>) -> IcnResult<Self> {
        Ok(Self {
            board: position.clone(),
            rights: context.special_rights.clone(),
            double_push: context
                .enpassant
                .map(|target| DoublePush::from_target(target, context.turn))
                .transpose()?,
        })
    }

    fn apply(&mut self, index: usize, mv: &mut Move) -> IcnResult<()> {
        let fault = |fault| IcnError::at_move(index, fault);
        let (start, end) = (mv.start_coords, mv.end_coords);

        let moved = self
            .board
            .remove(&start)
            .ok_or_else(|| fault(MoveFault::PieceNotFound(start)))?;
        mv.piece_type = Some(moved);

        if let Some(captured) = self.board.get(&end) {
            mv.captured = Some(captured);
        } else if moved.is(PieceKind::Pawns) && start.x != end.x && start.y != end.y {
            let push = self
                .double_push
                .filter(|push| push.landing.x == end.x && push.landing.y == start.y)
                .ok_or_else(|| fault(MoveFault::IllegalEnPassant))?;
            let victim = self
                .board
                .remove(&push.landing)
                .ok_or_else(|| fault(MoveFault::IllegalEnPassant))?;
            self.rights.revoke(&push.landing);
            mv.captured = Some(victim);
            mv.enpassant = Some(push.dir);
        }

        self.board.insert(end, mv.promotion.unwrap_or(moved));
        self.double_push = DoublePush::of(moved, start, end);

        if moved.is(PieceKind::Kings) && end.x.abs_diff(start.x) > 1 {
            let dir: i8 = if end.x > start.x { 1 } else { -1 };
            let partner = self
                .castle_partner(start, moved.color, dir)
                .ok_or_else(|| fault(MoveFault::CastlingPartnerNotFound))?;
            let landing = castle_landing(end, dir)?;
            // The partner was just found on the board.
            if let Some(piece) = self.board.remove(&partner) {
                self.board.insert(landing, piece);
            }
            self.rights.revoke(&partner);
            mv.castle = Some(Castle { dir, coord: partner });
        }

        self.rights.revoke(&start);
        self.rights.revoke(&end);
        Ok(())
    }

    /// Nearest piece on the king's row, in the direction of travel, of the
    /// king's color and still holding its special right.
    fn castle_partner(&self, king: Coordinate, color: Color, dir: i8) -> Option<Coordinate> {
        self.rights
            .iter()
            .filter(|c| c.y == king.y && (if dir > 0 { c.x > king.x } else { c.x < king.x }))
            .filter(|c| self.board.get(c).is_some_and(|p| p.color == color))
            .min_by_key(|c| c.x.abs_diff(king.x))
            .copied()
    }
}

/// One move as `x,y>x,y[Code]`, for sending a single move without game context.
pub fn compact_move(mv: &Move) -> IcnResult<String> {
    let promotion = mv.promotion.map(piece::encode).transpose()?.unwrap_or("");
    Ok(format!("{}>{}{}", mv.start_coords, mv.end_coords, promotion))
}

/// Read a single `x,y>x,y[Code]` move.
pub fn parse_compact_move(text: &str) -> IcnResult<Move> {
    let malformed = || IcnError::malformed("compact move", text);

    let mut coords = COORDINATE.find_iter(text);
    let start = coords.next().ok_or_else(malformed)?;
    let end = coords.next().ok_or_else(malformed)?;

    let mut mv = Move::new(start.as_str().parse()?, end.as_str().parse()?);
    mv.promotion = LETTERS
        .find(text)
        .map(|code| piece::decode(code.as_str()))
        .transpose()?;
    Ok(mv)
}
