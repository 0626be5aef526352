//! Piece identifiers and the fixed piece-code dictionary.
//!
//! A piece type is written long-form as kind + color letter ("pawnsW",
//! "royalQueensB", "voidsN") and short-form as a one or two letter code
//! ("P", "rq", "vo"). The two tables below are exact inverses.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::{IcnError, IcnResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    White,
    Black,
    Neutral,
}

impl Color {
    /// Suffix letter used in long piece identifiers.
    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
            Color::Neutral => 'N',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'W' => Some(Color::White),
            'B' => Some(Color::Black),
            'N' => Some(Color::Neutral),
            _ => None,
        }
    }

    /// Side to move after this one. Neutral has no turn and stays put.
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
            Color::Neutral => Color::Neutral,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "white",
            Color::Black => "black",
            Color::Neutral => "neutral",
        })
    }
}

/// Kinds of pieces, named the way game files name them (plural, camelCase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PieceKind {
    Kings,
    Pawns,
    Knights,
    Bishops,
    Rooks,
    Queens,
    Amazons,
    Hawks,
    Chancellors,
    Archbishops,
    Guards,
    Camels,
    Giraffes,
    Zebras,
    Centaurs,
    RoyalQueens,
    RoyalCentaurs,
    Obstacles,
    Voids,
}

impl PieceKind {
    pub const ALL: [PieceKind; 19] = [
        PieceKind::Kings,
        PieceKind::Pawns,
        PieceKind::Knights,
        PieceKind::Bishops,
        PieceKind::Rooks,
        PieceKind::Queens,
        PieceKind::Amazons,
        PieceKind::Hawks,
        PieceKind::Chancellors,
        PieceKind::Archbishops,
        PieceKind::Guards,
        PieceKind::Camels,
        PieceKind::Giraffes,
        PieceKind::Zebras,
        PieceKind::Centaurs,
        PieceKind::RoyalQueens,
        PieceKind::RoyalCentaurs,
        PieceKind::Obstacles,
        PieceKind::Voids,
    ];

    /// Promotion choices when a rule set does not list its own.
    pub const DEFAULT_PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queens,
        PieceKind::Rooks,
        PieceKind::Bishops,
        PieceKind::Knights,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Kings => "kings",
            PieceKind::Pawns => "pawns",
            PieceKind::Knights => "knights",
            PieceKind::Bishops => "bishops",
            PieceKind::Rooks => "rooks",
            PieceKind::Queens => "queens",
            PieceKind::Amazons => "amazons",
            PieceKind::Hawks => "hawks",
            PieceKind::Chancellors => "chancellors",
            PieceKind::Archbishops => "archbishops",
            PieceKind::Guards => "guards",
            PieceKind::Camels => "camels",
            PieceKind::Giraffes => "giraffes",
            PieceKind::Zebras => "zebras",
            PieceKind::Centaurs => "centaurs",
            PieceKind::RoyalQueens => "royalQueens",
            PieceKind::RoyalCentaurs => "royalCentaurs",
            PieceKind::Obstacles => "obstacles",
            PieceKind::Voids => "voids",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// True when `kinds` holds exactly the four default promotion kinds.
    pub fn is_default_promotion_set(kinds: &[PieceKind]) -> bool {
        kinds.len() == Self::DEFAULT_PROMOTIONS.len()
            && Self::DEFAULT_PROMOTIONS.iter().all(|k| kinds.contains(k))
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A kind and a color, e.g. white pawns. Serializes as "pawnsW".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PieceType {
    pub kind: PieceKind,
    pub color: Color,
}

impl PieceType {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    pub fn is(self, kind: PieceKind) -> bool {
        self.kind == kind
    }

    /// Short notation code, e.g. "P" or "am".
    pub fn code(self) -> IcnResult<&'static str> {
        encode(self)
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.name(), self.color.letter())
    }
}

impl FromStr for PieceType {
    type Err = IcnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || IcnError::UnknownPieceType(s.to_string());

        let color = s.chars().last().and_then(Color::from_letter).ok_or_else(unknown)?;
        let kind = PieceKind::from_name(&s[..s.len() - 1]).ok_or_else(unknown)?;
        let piece = PieceType::new(kind, color);

        // Only pairs present in the dictionary are real piece types.
        if CODES.contains_key(&piece) {
            Ok(piece)
        } else {
            Err(unknown())
        }
    }
}

impl TryFrom<String> for PieceType {
    type Error = IcnError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PieceType> for String {
    fn from(piece: PieceType) -> Self {
        piece.to_string()
    }
}

const fn w(kind: PieceKind) -> PieceType {
    PieceType::new(kind, Color::White)
}

const fn b(kind: PieceKind) -> PieceType {
    PieceType::new(kind, Color::Black)
}

const fn n(kind: PieceKind) -> PieceType {
    PieceType::new(kind, Color::Neutral)
}

const PIECE_DICTIONARY: [(PieceType, &str); 36] = [
    (w(PieceKind::Kings), "K"),
    (b(PieceKind::Kings), "k"),
    (w(PieceKind::Pawns), "P"),
    (b(PieceKind::Pawns), "p"),
    (w(PieceKind::Knights), "N"),
    (b(PieceKind::Knights), "n"),
    (w(PieceKind::Bishops), "B"),
    (b(PieceKind::Bishops), "b"),
    (w(PieceKind::Rooks), "R"),
    (b(PieceKind::Rooks), "r"),
    (w(PieceKind::Queens), "Q"),
    (b(PieceKind::Queens), "q"),
    (w(PieceKind::Amazons), "AM"),
    (b(PieceKind::Amazons), "am"),
    (w(PieceKind::Hawks), "HA"),
    (b(PieceKind::Hawks), "ha"),
    (w(PieceKind::Chancellors), "CH"),
    (b(PieceKind::Chancellors), "ch"),
    (w(PieceKind::Archbishops), "AR"),
    (b(PieceKind::Archbishops), "ar"),
    (w(PieceKind::Guards), "GU"),
    (b(PieceKind::Guards), "gu"),
    (w(PieceKind::Camels), "CA"),
    (b(PieceKind::Camels), "ca"),
    (w(PieceKind::Giraffes), "GI"),
    (b(PieceKind::Giraffes), "gi"),
    (w(PieceKind::Zebras), "ZE"),
    (b(PieceKind::Zebras), "ze"),
    (w(PieceKind::Centaurs), "CE"),
    (b(PieceKind::Centaurs), "ce"),
    (w(PieceKind::RoyalQueens), "RQ"),
    (b(PieceKind::RoyalQueens), "rq"),
    (w(PieceKind::RoyalCentaurs), "RC"),
    (b(PieceKind::RoyalCentaurs), "rc"),
    (n(PieceKind::Obstacles), "ob"),
    (n(PieceKind::Voids), "vo"),
];

lazy_static! {
    static ref CODES: HashMap<PieceType, &'static str> =
        PIECE_DICTIONARY.iter().copied().collect();
    static ref PIECES: HashMap<&'static str, PieceType> = {
        let inverse: HashMap<_, _> = PIECE_DICTIONARY.iter().map(|&(p, c)| (c, p)).collect();
        assert_eq!(
            inverse.len(),
            CODES.len(),
            "piece dictionary must map each piece to a distinct code"
        );
        inverse
    };
}

/// Short code for a piece type.
pub fn encode(piece: PieceType) -> IcnResult<&'static str> {
    CODES
        .get(&piece)
        .copied()
        .ok_or_else(|| IcnError::UnknownPieceType(piece.to_string()))
}

/// Piece type for a short code. Codes are case sensitive.
pub fn decode(code: &str) -> IcnResult<PieceType> {
    PIECES
        .get(code)
        .copied()
        .ok_or_else(|| IcnError::UnknownPieceCode(code.to_string()))
}
