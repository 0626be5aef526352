//! Derive special move rights from a position and two game rules.

use tracing::trace;

use crate::coords::Coordinate;
use crate::error::IcnResult;
use crate::piece::{Color, PieceKind};
use crate::position::{encode_position, Position, SpecialRights};

/// Minimum file distance between a king and the piece it castles with.
const MIN_CASTLE_DISTANCE: u64 = 3;

/// Grant special rights the way a fresh variant setup would:
/// every pawn when `pawn_double_push` is on, and, when kings castle with
/// `castle_with`, every king plus each `castle_with` piece that stands on a
/// king's row, shares its color, and is at least three files away from it.
///
/// Whether a partner qualifies does not depend on which king is found
/// first, so the result is independent of position order.
pub fn derive_special_rights(
    position: &Position,
    pawn_double_push: bool,
    castle_with: Option<PieceKind>,
) -> SpecialRights {
    let mut rights = SpecialRights::new();
    let mut kings: Vec<(Coordinate, Color)> = Vec::new();
    let mut partners: Vec<(Coordinate, Color)> = Vec::new();

    for (coords, piece) in position.iter() {
        if pawn_double_push && piece.is(PieceKind::Pawns) {
            rights.grant(*coords);
        } else if castle_with.is_some() && piece.is(PieceKind::Kings) {
            rights.grant(*coords);
            kings.push((*coords, piece.color));
        } else if castle_with == Some(piece.kind) {
            partners.push((*coords, piece.color));
        }
    }

    for (coords, color) in partners {
        let can_castle = kings.iter().any(|(king, king_color)| {
            king.y == coords.y
                && *king_color == color
                && king.x.abs_diff(coords.x) >= MIN_CASTLE_DISTANCE
        });
        if can_castle {
            rights.grant(coords);
        }
    }

    trace!(granted = rights.len(), "Derived special rights");
    rights
}

/// Compact position string with special rights derived from game rules.
pub fn encode_position_from_rules(
    position: &Position,
    pawn_double_push: bool,
    castle_with: Option<PieceKind>,
) -> IcnResult<String> {
    let rights = derive_special_rights(position, pawn_double_push, castle_with);
    encode_position(position, &rights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::decode_position;

    const CLASSICAL: &str = "P1,2|P2,2|P3,2|P4,2|P5,2|P6,2|P7,2|P8,2|\
        p1,7|p2,7|p3,7|p4,7|p5,7|p6,7|p7,7|p8,7|\
        R1,1|R8,1|r1,8|r8,8|N2,1|N7,1|n2,8|n7,8|\
        B3,1|B6,1|b3,8|b6,8|Q4,1|q4,8|K5,1|k5,8";

    fn classical() -> Position {
        decode_position(CLASSICAL).unwrap().0
    }

    #[test]
    fn test_classical_rights() {
        let rights = derive_special_rights(&classical(), true, Some(PieceKind::Rooks));
        // 16 pawns, 2 kings, 4 rooks
        assert_eq!(rights.len(), 22);
        for square in [(1, 1), (8, 1), (1, 8), (8, 8), (5, 1), (5, 8), (4, 2), (4, 7)] {
            assert!(rights.contains(&Coordinate::new(square.0, square.1)));
        }
        assert!(!rights.contains(&Coordinate::new(4, 1)));
    }

    #[test]
    fn test_partner_too_close_to_king() {
        // Rook on 7,1 is only two files from the king on 5,1.
        let (position, _) = decode_position("K5,1|R7,1|R1,1|R8,1").unwrap();
        let rights = derive_special_rights(&position, false, Some(PieceKind::Rooks));

        assert!(!rights.contains(&Coordinate::new(7, 1)));
        assert!(rights.contains(&Coordinate::new(1, 1)));
        assert!(rights.contains(&Coordinate::new(8, 1)));
        assert!(rights.contains(&Coordinate::new(5, 1)));
    }

    #[test]
    fn test_partner_needs_same_row_and_color() {
        let (position, _) = decode_position("K5,1|r1,1|R1,2|R9,1|k5,8").unwrap();
        let rights = derive_special_rights(&position, false, Some(PieceKind::Rooks));

        assert!(!rights.contains(&Coordinate::new(1, 1)));
        assert!(!rights.contains(&Coordinate::new(1, 2)));
        assert!(rights.contains(&Coordinate::new(9, 1)));
    }

    #[test]
    fn test_partners_at_the_edge_of_the_board() {
        let (position, _) = decode_position("K9223372036854775807,1|R-5,1|R-9223372036854775808,1")
            .unwrap();
        let rights = derive_special_rights(&position, false, Some(PieceKind::Rooks));
        assert!(rights.contains(&Coordinate::new(-5, 1)));
        assert!(rights.contains(&Coordinate::new(i64::MIN, 1)));
    }

    #[test]
    fn test_no_rules_no_rights() {
        let rights = derive_special_rights(&classical(), false, None);
        assert!(rights.is_empty());

        let rights = derive_special_rights(&classical(), true, None);
        assert_eq!(rights.len(), 16);
    }

    #[test]
    fn test_castle_with_other_kind() {
        let (position, _) = decode_position("K5,1|R1,1|GU9,1").unwrap();
        let rights = derive_special_rights(&position, false, Some(PieceKind::Guards));
        assert!(rights.contains(&Coordinate::new(9, 1)));
        assert!(!rights.contains(&Coordinate::new(1, 1)));
    }

    #[test]
    fn test_encode_from_rules() {
        let (position, _) = decode_position("K5,1|R1,1|P2,2|R6,1").unwrap();
        assert_eq!(
            encode_position_from_rules(&position, true, Some(PieceKind::Rooks)).unwrap(),
            "K5,1+|R1,1+|P2,2+|R6,1"
        );
    }
}
