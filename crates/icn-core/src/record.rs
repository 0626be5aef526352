//! Structured game record, in the JSON gamefile shape.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::coords::Coordinate;
use crate::error::IcnError;
use crate::piece::{Color, PieceKind, PieceType};
use crate::position::{Position, SpecialRights};

/// Game rule keys with a typed home in [`GameRules`]; they never go in `extra`.
pub const RESERVED_RULE_KEYS: [&str; 3] = ["promotionRanks", "promotionsAllowed", "winConditions"];

pub const CHECKMATE: &str = "checkmate";

/// Half-move counter toward a draw rule, written "p/t" (e.g. "0/100").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MoveRule {
    pub plies: u64,
    pub threshold: u64,
}

impl MoveRule {
    pub fn new(plies: u64, threshold: u64) -> Self {
        Self { plies, threshold }
    }

    pub fn reset(self) -> Self {
        Self::new(0, self.threshold)
    }

    pub fn tick(self) -> Self {
        Self::new(self.plies.saturating_add(1), self.threshold)
    }
}

impl fmt::Display for MoveRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.plies, self.threshold)
    }
}

impl FromStr for MoveRule {
    type Err = IcnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IcnError::malformed("move rule", s);
        let (plies, threshold) = s.split_once('/').ok_or_else(malformed)?;
        let number = |part: &str| -> Result<u64, IcnError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse().map_err(|_| malformed())
        };
        Ok(Self::new(number(plies)?, number(threshold)?))
    }
}

impl TryFrom<String> for MoveRule {
    type Error = IcnError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MoveRule> for String {
    fn from(rule: MoveRule) -> Self {
        rule.to_string()
    }
}

/// Piece kinds each side may promote to. An absent side uses the default four.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionsAllowed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white: Option<Vec<PieceKind>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub black: Option<Vec<PieceKind>>,
}

impl PromotionsAllowed {
    pub fn for_color(&self, color: Color) -> Option<&[PieceKind]> {
        match color {
            Color::White => self.white.as_deref(),
            Color::Black => self.black.as_deref(),
            Color::Neutral => None,
        }
    }
}

/// Ordered win condition names per side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinConditions {
    pub white: Vec<String>,
    pub black: Vec<String>,
}

impl WinConditions {
    /// Same list for both sides.
    pub fn both(conditions: Vec<String>) -> Self {
        Self {
            white: conditions.clone(),
            black: conditions,
        }
    }

    /// Both sides hold the same conditions, ignoring order.
    pub fn sides_agree(&self) -> bool {
        self.white.len() == self.black.len() && self.white.iter().all(|c| self.black.contains(c))
    }
}

impl Default for WinConditions {
    fn default() -> Self {
        Self::both(vec![CHECKMATE.to_string()])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRules {
    /// Promotion rank for white and for black; either may be absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_ranks: Option<(Option<i64>, Option<i64>)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotions_allowed: Option<PromotionsAllowed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_conditions: Option<WinConditions>,
    /// Any other rule, carried through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl GameRules {
    /// Extra rules minus any reserved key a caller may have slipped in.
    pub fn unreserved_extra(&self) -> Map<String, JsonValue> {
        self.extra
            .iter()
            .filter(|(key, _)| !RESERVED_RULE_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// The piece a king castled with, and on which side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Castle {
    /// +1 toward increasing x, -1 toward decreasing x.
    pub dir: i8,
    pub coord: Coordinate,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub piece_type: Option<PieceType>,
    pub start_coords: Coordinate,
    pub end_coords: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured: Option<PieceType>,
    /// Set on en passant captures: +1 if the captured pawn had double pushed
    /// upward (white), -1 if downward (black).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enpassant: Option<i8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub castle: Option<Castle>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub check: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub mate: bool,
}

impl Move {
    pub fn new(start_coords: Coordinate, end_coords: Coordinate) -> Self {
        Self {
            piece_type: None,
            start_coords,
            end_coords,
            captured: None,
            enpassant: None,
            promotion: None,
            castle: None,
            check: false,
            mate: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(default)]
    pub metadata: IndexMap<String, String>,
    #[serde(default)]
    pub turn: Color,
    /// En passant target square, valid only for the next move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enpassant: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_rule: Option<MoveRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_move: Option<u64>,
    #[serde(default)]
    pub game_rules: GameRules,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_position: Option<Position>,
    #[serde(default)]
    pub special_rights: SpecialRights,
    #[serde(default)]
    pub moves: Vec<Move>,
}
