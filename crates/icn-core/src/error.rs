//! Converter error types

use std::fmt;

use thiserror::Error;

use crate::coords::Coordinate;

pub type IcnResult<T> = Result<T, IcnError>;

/// Which kind of opening delimiter was never closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Metadata,
    ExtraRules,
    Comment,
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bracket::Metadata => f.write_str("metadata '['"),
            Bracket::ExtraRules => f.write_str("extra rules '{'"),
            Bracket::Comment => f.write_str("comment '{'"),
        }
    }
}

/// Why a move could not be replayed over the running board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveFault {
    PieceNotFound(Coordinate),
    IllegalEnPassant,
    CastlingPartnerNotFound,
}

impl fmt::Display for MoveFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveFault::PieceNotFound(coords) => write!(f, "no piece on {coords}"),
            MoveFault::IllegalEnPassant => {
                f.write_str("en passant capture expected but not possible")
            }
            MoveFault::CastlingPartnerNotFound => f.write_str("no piece to castle with"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IcnError {
    #[error("Malformed {what}: {token:?}")]
    MalformedToken { what: &'static str, token: String },

    #[error("Unknown piece abbreviation: {0}")]
    UnknownPieceCode(String),

    #[error("Unknown piece type: {0}")]
    UnknownPieceType(String),

    #[error("Unclosed {0}")]
    UnterminatedBracket(Bracket),

    #[error("Moves have to be reconstructed but no starting position was given")]
    MissingContext,

    #[error("Move {index}: {fault}")]
    IllegalMoveSemantics { index: usize, fault: MoveFault },

    #[error("Reserved game rule in extra rules block: {0}")]
    ReservedRuleKey(String),
}

impl IcnError {
    pub(crate) fn malformed(what: &'static str, token: impl Into<String>) -> Self {
        IcnError::MalformedToken {
            what,
            token: token.into(),
        }
    }

    pub(crate) fn at_move(index: usize, fault: MoveFault) -> Self {
        IcnError::IllegalMoveSemantics { index, fault }
    }
}
