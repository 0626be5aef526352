//! Structured game record -> ICN text.

use tracing::debug;

use crate::config::{Compactness, WriteOptions};
use crate::error::{IcnError, IcnResult};
use crate::piece::{self, Color, PieceKind, PieceType};
use crate::position::encode_position;
use crate::record::{GameRecord, Move, PromotionsAllowed, WinConditions};

/// Write a game record as ICN.
pub fn to_notation(record: &GameRecord, options: &WriteOptions) -> IcnResult<String> {
    let ws = options.whitespace();
    let mut out = String::new();

    for (key, value) in &record.metadata {
        out.push_str(&format!("[{key}: {value}]{ws}"));
    }
    if !record.metadata.is_empty() {
        out.push_str(ws);
    }

    out.push_str(match record.turn {
        Color::White => "w ",
        Color::Black => "b ",
        Color::Neutral => return Err(IcnError::malformed("turn", record.turn.to_string())),
    });
    if let Some(enpassant) = record.enpassant {
        out.push_str(&format!("{enpassant} "));
    }
    if let Some(rule) = record.move_rule {
        out.push_str(&format!("{rule} "));
    }
    if let Some(full_move) = record.full_move {
        out.push_str(&format!("{full_move} "));
    }

    let rules = &record.game_rules;
    if let Some(ranks) = rules.promotion_ranks {
        out.push_str(&promotion_spec(ranks, rules.promotions_allowed.as_ref())?);
        out.push(' ');
    }
    if let Some(spec) = rules.win_conditions.as_ref().and_then(win_conditions_spec) {
        out.push_str(&spec);
        out.push(' ');
    }
    let extra = rules.unreserved_extra();
    if !extra.is_empty() {
        let block = serde_json::to_string(&extra)
            .map_err(|e| IcnError::malformed("extra rules block", e.to_string()))?;
        out.push_str(&block);
        out.push(' ');
    }

    if let Some(position) = &record.starting_position {
        out.push_str(&encode_position(position, &record.special_rights)?);
    }

    if !record.moves.is_empty() {
        out.push_str(ws);
        out.push_str(ws);
        out.push_str(&move_list(record, options)?);
    }

    debug!(
        moves = record.moves.len(),
        compactness = options.compactness as u8,
        "Wrote game record"
    );
    Ok(out)
}

/// `(8|1)`, with `;codes` after a rank when that side's promotions differ
/// from the default four.
fn promotion_spec(
    ranks: (Option<i64>, Option<i64>),
    allowed: Option<&PromotionsAllowed>,
) -> IcnResult<String> {
    let half = |rank: Option<i64>, color: Color| -> IcnResult<String> {
        let Some(rank) = rank else {
            return Ok(String::new());
        };
        let mut text = rank.to_string();
        match allowed.and_then(|a| a.for_color(color)) {
            None => {}
            // A bare `;` keeps "no promotions" apart from the default set.
            Some([]) => text.push(';'),
            Some(kinds) if PieceKind::is_default_promotion_set(kinds) => {}
            Some(kinds) => {
                let codes = kinds
                    .iter()
                    .map(|&kind| PieceType::new(kind, color).code())
                    .collect::<IcnResult<Vec<_>>>()?;
                text.push(';');
                text.push_str(&codes.join(","));
            }
        }
        Ok(text)
    };

    Ok(format!(
        "({}|{})",
        half(ranks.0, Color::White)?,
        half(ranks.1, Color::Black)?
    ))
}

/// Nothing for plain checkmate, one list when both sides agree, `(white|black)` otherwise.
fn win_conditions_spec(wins: &WinConditions) -> Option<String> {
    if *wins == WinConditions::default() {
        None
    } else if wins.sides_agree() {
        Some(wins.white.join(","))
    } else {
        Some(format!("({}|{})", wins.white.join(","), wins.black.join(",")))
    }
}

fn move_list(record: &GameRecord, options: &WriteOptions) -> IcnResult<String> {
    let nice = options.compactness == Compactness::Nice;
    let last = record.moves.len().saturating_sub(1);
    let mut full_move = record.full_move.unwrap_or(1);
    let mut to_move = record.turn;
    let mut out = String::new();

    for (i, mv) in record.moves.iter().enumerate() {
        if !nice {
            if i != 0 {
                out.push('|');
            }
        } else if to_move == Color::Black {
            if i == 0 {
                out.push_str(&format!("{full_move}. ... | "));
            } else {
                out.push_str(" | ");
            }
        } else {
            if i != 0 && !options.line_breaks {
                out.push(' ');
            }
            out.push_str(&format!("{full_move}. "));
        }

        out.push_str(&move_text(mv, options.compactness)?);

        if to_move == Color::Black {
            full_move = full_move.saturating_add(1);
            if nice && i != last {
                out.push_str(if options.line_breaks { "\n" } else { " |" });
            }
        }
        to_move = to_move.opposite();
    }

    Ok(out)
}

fn move_text(mv: &Move, compactness: Compactness) -> IcnResult<String> {
    let annotate = compactness.annotates();
    let gap = if compactness == Compactness::Nice { " " } else { "" };
    let mut text = String::new();

    if annotate {
        if let Some(piece_type) = mv.piece_type {
            text.push_str(piece::encode(piece_type)?);
        }
    }
    let arrow = if annotate && mv.captured.is_some() { "x" } else { ">" };
    text.push_str(&format!(
        "{}{gap}{arrow}{gap}{}{gap}",
        mv.start_coords, mv.end_coords
    ));

    if let Some(promotion) = mv.promotion {
        if annotate {
            text.push('=');
        }
        text.push_str(piece::encode(promotion)?);
    }
    if annotate {
        if mv.mate {
            text.push('#');
        } else if mv.check {
            text.push('+');
        }
    }

    Ok(text.trim_end().to_string())
}
