//! Conversion between structured game records and ICN text for
//! unbounded-board chess variants.

pub mod config;
pub mod coords;
pub mod error;
mod extra_rules;
pub mod moves;
pub mod parse;
pub mod piece;
pub mod position;
pub mod record;
pub mod replay;
pub mod special_rights;
pub mod writer;

pub use config::{Compactness, ParseOptions, WriteOptions};
pub use coords::Coordinate;
pub use error::{Bracket, IcnError, IcnResult, MoveFault};
pub use moves::{compact_move, parse_compact_move};
pub use parse::from_notation;
pub use piece::{Color, PieceKind, PieceType};
pub use position::{decode_position, encode_position, Position, SpecialRights};
pub use record::{Castle, GameRecord, GameRules, Move, MoveRule, PromotionsAllowed, WinConditions};
pub use replay::{advance_position, Halfmoves};
pub use special_rights::{derive_special_rights, encode_position_from_rules};
pub use writer::to_notation;
