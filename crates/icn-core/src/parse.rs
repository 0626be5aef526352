//! ICN text -> structured game record.
//!
//! Metadata brackets are lifted out first. The rest is read one
//! whitespace-delimited token at a time; each token is tried against the
//! field grammars in a fixed order and fills the first field it fits that is
//! still unset. The move list is terminal and takes all remaining text.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::config::ParseOptions;
use crate::coords::Coordinate;
use crate::error::{Bracket, IcnError, IcnResult};
use crate::extra_rules::{balanced_span, merge_extra_rules, take_extra_rules};
use crate::moves::{parse_moves, MoveContext};
use crate::piece::{self, Color, PieceKind};
use crate::position::{decode_position, Position, SpecialRights};
use crate::record::{GameRecord, MoveRule, PromotionsAllowed, WinConditions};

lazy_static! {
    static ref EN_PASSANT: Regex = Regex::new(r"^-?[0-9]+,-?[0-9]+$").expect("en passant pattern");
    static ref MOVE_RULE: Regex = Regex::new(r"^[0-9]+/[0-9]+$").expect("move rule pattern");
    static ref FULL_MOVE: Regex = Regex::new(r"^[0-9]+$").expect("full move pattern");
    static ref PROMOTIONS: Regex = Regex::new(
        r"^\((-?[0-9]+(?:;(?:[a-zA-Z]+(?:,[a-zA-Z]+)*)?)?)?\|(-?[0-9]+(?:;(?:[a-zA-Z]+(?:,[a-zA-Z]+)*)?)?)?\)$"
    )
    .expect("promotion pattern");
    static ref WIN_CONDITIONS: Regex =
        Regex::new(r"^\(?[a-zA-Z][^0-9]*$").expect("win condition pattern");
    static ref POSITION: Regex = Regex::new(
        r"^[a-zA-Z]+-?[0-9]+,-?[0-9]+\+?(?:\|[a-zA-Z]+-?[0-9]+,-?[0-9]+\+?)*$"
    )
    .expect("position pattern");
    static ref MOVES: Regex = Regex::new(
        r"^(?:[0-9]+\.|[a-zA-Z]*-?[0-9]+,-?[0-9]+[^|.0-9]*(?:x|>)+)"
    )
    .expect("moves pattern");
}

/// A field a single token was recognized as.
#[derive(Debug, Clone, PartialEq)]
enum Field {
    Turn(Color),
    EnPassant(Coordinate),
    MoveRule(MoveRule),
    FullMove(u64),
    Promotions {
        ranks: (Option<i64>, Option<i64>),
        allowed: PromotionsAllowed,
    },
    WinConditions(WinConditions),
    /// Opens a `{...}` block that may run past this token.
    ExtraRules,
    Position(Position, SpecialRights),
    /// Starts the move list, which runs to the end of input.
    Moves,
}

/// Record under construction, remembering which fields were set explicitly.
#[derive(Default)]
struct Draft {
    record: GameRecord,
    turn_set: bool,
}

impl Draft {
    fn apply(&mut self, field: Field) {
        let record = &mut self.record;
        match field {
            Field::Turn(color) => {
                record.turn = color;
                self.turn_set = true;
            }
            Field::EnPassant(coords) => record.enpassant = Some(coords),
            Field::MoveRule(rule) => record.move_rule = Some(rule),
            Field::FullMove(n) => record.full_move = Some(n),
            Field::Promotions { ranks, allowed } => {
                record.game_rules.promotion_ranks = Some(ranks);
                record.game_rules.promotions_allowed = Some(allowed);
            }
            Field::WinConditions(wins) => record.game_rules.win_conditions = Some(wins),
            Field::Position(position, rights) => {
                record.starting_position = Some(position);
                record.special_rights = rights;
            }
            Field::ExtraRules | Field::Moves => {}
        }
    }

    /// Try each grammar in precedence order. Each fires only while its field is unset.
    fn classify(&self, token: &str) -> IcnResult<Option<Field>> {
        let record = &self.record;

        if !self.turn_set {
            match token {
                "w" => return Ok(Some(Field::Turn(Color::White))),
                "b" => return Ok(Some(Field::Turn(Color::Black))),
                _ => {}
            }
        }
        if record.enpassant.is_none() && EN_PASSANT.is_match(token) {
            return Ok(Some(Field::EnPassant(token.parse()?)));
        }
        if record.move_rule.is_none() && MOVE_RULE.is_match(token) {
            return Ok(Some(Field::MoveRule(token.parse()?)));
        }
        if record.full_move.is_none() && FULL_MOVE.is_match(token) {
            let n = token
                .parse()
                .map_err(|_| IcnError::malformed("full move number", token))?;
            return Ok(Some(Field::FullMove(n)));
        }
        if record.game_rules.promotion_ranks.is_none() {
            if let Some(field) = promotions(token)? {
                return Ok(Some(field));
            }
        }
        if record.game_rules.win_conditions.is_none() && WIN_CONDITIONS.is_match(token) {
            return Ok(Some(Field::WinConditions(win_conditions(token))));
        }
        if token.starts_with('{') {
            return Ok(Some(Field::ExtraRules));
        }
        if record.starting_position.is_none() && POSITION.is_match(token) {
            let (position, rights) = decode_position(token)?;
            return Ok(Some(Field::Position(position, rights)));
        }
        if MOVES.is_match(token) {
            return Ok(Some(Field::Moves));
        }
        Ok(None)
    }
}

/// `(rank[;codes]|rank[;codes])`, either half may be empty.
fn promotions(token: &str) -> IcnResult<Option<Field>> {
    let Some(caps) = PROMOTIONS.captures(token) else {
        return Ok(None);
    };

    let mut ranks = (None, None);
    let mut allowed = PromotionsAllowed::default();
    for (i, color) in [Color::White, Color::Black].into_iter().enumerate() {
        let Some(half) = caps.get(i + 1) else {
            continue;
        };
        let (rank, kinds) = promotion_half(half.as_str())?;
        if color == Color::White {
            ranks.0 = Some(rank);
            allowed.white = Some(kinds);
        } else {
            ranks.1 = Some(rank);
            allowed.black = Some(kinds);
        }
    }

    Ok(Some(Field::Promotions { ranks, allowed }))
}

fn promotion_half(half: &str) -> IcnResult<(i64, Vec<PieceKind>)> {
    let (rank, codes) = match half.split_once(';') {
        Some((rank, codes)) => (rank, Some(codes)),
        None => (half, None),
    };
    let rank = rank
        .parse()
        .map_err(|_| IcnError::malformed("promotion rank", half))?;

    let kinds = match codes {
        Some("") => Vec::new(),
        Some(codes) => codes
            .split(',')
            .map(|code| piece::decode(code).map(|p| p.kind))
            .collect::<IcnResult<_>>()?,
        None => PieceKind::DEFAULT_PROMOTIONS.to_vec(),
    };
    Ok((rank, kinds))
}

/// `a,b|c,d` gives white a,b and black c,d; a single half applies to both.
fn win_conditions(token: &str) -> WinConditions {
    let stripped: String = token.chars().filter(|c| !matches!(c, '(' | ')')).collect();
    let list = |half: &str| half.split(',').map(str::to_string).collect::<Vec<_>>();

    match stripped.split_once('|') {
        Some((white, black)) => WinConditions {
            white: list(white),
            black: list(black),
        },
        None => WinConditions::both(list(&stripped)),
    }
}

/// Lift every `[Key: Value]` out of the text. Brackets inside `{...}` blocks
/// belong to those blocks and are left alone.
fn extract_metadata(text: &str) -> IcnResult<(IndexMap<String, String>, String)> {
    let mut metadata = IndexMap::new();
    let mut body = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(i) = rest.find(|c: char| c == '[' || c == '{') {
        let (before, from) = rest.split_at(i);
        body.push_str(before);

        if from.starts_with('{') {
            let len = balanced_span(from).unwrap_or(1);
            body.push_str(&from[..len]);
            rest = &from[len..];
            continue;
        }

        let close = from
            .find(']')
            .ok_or(IcnError::UnterminatedBracket(Bracket::Metadata))?;
        let entry = &from[1..close];
        let (key, value) = entry.split_once(": ").unwrap_or((entry, ""));
        metadata.insert(key.to_string(), value.to_string());
        rest = &from[close + 1..];
    }
    body.push_str(rest);

    Ok((metadata, body))
}

/// Parse ICN text into a game record.
pub fn from_notation(text: &str, options: &ParseOptions) -> IcnResult<GameRecord> {
    let (metadata, body) = extract_metadata(text)?;
    let mut draft = Draft::default();
    draft.record.metadata = metadata;

    let mut rest = body.as_str();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let token = &rest[..end];

        match draft.classify(token)? {
            Some(Field::ExtraRules) => {
                let (block, len) = take_extra_rules(rest)?;
                merge_extra_rules(
                    &mut draft.record.game_rules,
                    block,
                    options.allow_reserved_rule_keys,
                )?;
                rest = &rest[len..];
                continue;
            }
            Some(Field::Moves) => {
                let record = &draft.record;
                let context = MoveContext {
                    starting_position: record.starting_position.as_ref(),
                    special_rights: &record.special_rights,
                    enpassant: record.enpassant,
                    turn: record.turn,
                };
                let moves = parse_moves(
                    rest,
                    &context,
                    options.reconstruct_moves,
                    options.trust_check_symbols,
                )?;
                draft.record.moves = moves;
                break;
            }
            Some(field) => draft.apply(field),
            None => debug!(token = %token, "Discarding unrecognized token"),
        }
        rest = &rest[end..];
    }

    let mut record = draft.record;
    if record.game_rules.win_conditions.is_none() {
        debug!("No win conditions given, defaulting to checkmate");
        record.game_rules.win_conditions = Some(WinConditions::default());
    }
    Ok(record)
}
