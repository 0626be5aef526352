//! Conversion options, with environment overrides for drivers.

use std::env;

/// How much of each move the writer spells out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compactness {
    /// `1. P4,2 > 4,4 | p4,7 > 4,6` with move numbers, captures and checks.
    #[default]
    Nice = 0,
    /// `P4,2>4,4|p4,7>4,6` without move numbers or spaces.
    Moderate = 1,
    /// `4,2>4,4|4,7>4,6` with coordinates and promotions only.
    Compact = 2,
}

impl Compactness {
    /// Piece letters, capture marks and check marks are written.
    pub fn annotates(self) -> bool {
        self != Compactness::Compact
    }
}

impl TryFrom<u8> for Compactness {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Compactness::Nice),
            1 => Ok(Compactness::Moderate),
            2 => Ok(Compactness::Compact),
            other => Err(other),
        }
    }
}

impl std::str::FromStr for Compactness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "nice" => Ok(Compactness::Nice),
            "1" | "moderate" => Ok(Compactness::Moderate),
            "2" | "compact" => Ok(Compactness::Compact),
            other => Err(format!("unknown compactness level: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Replay the moves to fill in piece type, captures, en passant and castling.
    pub reconstruct_moves: bool,

    /// Read `+` and `#` after a move as check and mate.
    pub trust_check_symbols: bool,

    /// Let the extra rules block set promotionRanks, promotionsAllowed and
    /// winConditions instead of failing on them.
    pub allow_reserved_rule_keys: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            reconstruct_moves: true,
            trust_check_symbols: true,
            allow_reserved_rule_keys: false,
        }
    }
}

impl ParseOptions {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            reconstruct_moves: env_flag("ICN_RECONSTRUCT_MOVES")
                .unwrap_or(defaults.reconstruct_moves),
            trust_check_symbols: env_flag("ICN_TRUST_CHECK_SYMBOLS")
                .unwrap_or(defaults.trust_check_symbols),
            allow_reserved_rule_keys: env_flag("ICN_ALLOW_RESERVED_RULE_KEYS")
                .unwrap_or(defaults.allow_reserved_rule_keys),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    pub compactness: Compactness,

    /// Put metadata entries and full moves on their own lines.
    pub line_breaks: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::new(Compactness::Nice, true)
    }
}

impl WriteOptions {
    pub fn new(compactness: Compactness, line_breaks: bool) -> Self {
        Self {
            compactness,
            line_breaks,
        }
    }

    pub fn from_env() -> Self {
        Self {
            compactness: env::var("ICN_COMPACTNESS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            line_breaks: env_flag("ICN_LINE_BREAKS").unwrap_or(true),
        }
    }

    /// Separator between metadata entries and between sections.
    pub(crate) fn whitespace(&self) -> &'static str {
        if self.line_breaks {
            "\n"
        } else {
            " "
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}
