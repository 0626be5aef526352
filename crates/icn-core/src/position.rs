//! Piece placement and the compact position string ("P1,2+|k5,8|ob0,0").

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::coords::Coordinate;
use crate::error::{IcnError, IcnResult};
use crate::piece::{self, PieceType};

/// Pieces keyed by square, in insertion order.
///
/// Serializes as `{"x,y": "pawnsW", ...}`. Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "IndexMap<String, PieceType>",
    into = "IndexMap<String, PieceType>"
)]
pub struct Position {
    pieces: IndexMap<Coordinate, PieceType>,
}

impl Position {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn get(&self, coords: &Coordinate) -> Option<PieceType> {
        self.pieces.get(coords).copied()
    }

    pub fn contains(&self, coords: &Coordinate) -> bool {
        self.pieces.contains_key(coords)
    }

    /// Place a piece, returning whatever stood there before.
    pub fn insert(&mut self, coords: Coordinate, piece: PieceType) -> Option<PieceType> {
        self.pieces.insert(coords, piece)
    }

    /// Lift a piece off the board. The remaining pieces keep their order.
    pub fn remove(&mut self, coords: &Coordinate) -> Option<PieceType> {
        self.pieces.shift_remove(coords)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coordinate, &PieceType)> {
        self.pieces.iter()
    }
}

impl FromIterator<(Coordinate, PieceType)> for Position {
    fn from_iter<I: IntoIterator<Item = (Coordinate, PieceType)>>(iter: I) -> Self {
        Self {
            pieces: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<IndexMap<String, PieceType>> for Position {
    type Error = IcnError;

    fn try_from(map: IndexMap<String, PieceType>) -> Result<Self, Self::Error> {
        map.into_iter()
            .map(|(key, piece)| Ok::<_, IcnError>((key.parse::<Coordinate>()?, piece)))
            .collect()
    }
}

impl From<Position> for IndexMap<String, PieceType> {
    fn from(position: Position) -> Self {
        position
            .pieces
            .into_iter()
            .map(|(coords, piece)| (coords.to_string(), piece))
            .collect()
    }
}

/// Squares whose pieces still hold their one-time special move
/// (pawn double push, castling).
///
/// Serializes as `{"x,y": true, ...}`; `false` entries are dropped on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, bool>", into = "IndexMap<String, bool>")]
pub struct SpecialRights {
    squares: IndexSet<Coordinate>,
}

impl SpecialRights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn contains(&self, coords: &Coordinate) -> bool {
        self.squares.contains(coords)
    }

    pub fn grant(&mut self, coords: Coordinate) -> bool {
        self.squares.insert(coords)
    }

    pub fn revoke(&mut self, coords: &Coordinate) -> bool {
        self.squares.shift_remove(coords)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.squares.iter()
    }
}

impl FromIterator<Coordinate> for SpecialRights {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self {
            squares: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<IndexMap<String, bool>> for SpecialRights {
    type Error = IcnError;

    fn try_from(map: IndexMap<String, bool>) -> Result<Self, Self::Error> {
        map.into_iter()
            .filter(|(_, granted)| *granted)
            .map(|(key, _)| key.parse::<Coordinate>())
            .collect()
    }
}

impl From<SpecialRights> for IndexMap<String, bool> {
    fn from(rights: SpecialRights) -> Self {
        rights
            .squares
            .into_iter()
            .map(|coords| (coords.to_string(), true))
            .collect()
    }
}

/// Write a position as `Code x,y[+]` entries joined by `|`, in iteration order.
pub fn encode_position(position: &Position, rights: &SpecialRights) -> IcnResult<String> {
    let mut entries = Vec::with_capacity(position.len());
    for (coords, piece) in position.iter() {
        let marker = if rights.contains(coords) { "+" } else { "" };
        entries.push(format!("{}{}{}", piece::encode(*piece)?, coords, marker));
    }
    Ok(entries.join("|"))
}

/// Read a compact position string back into pieces and special rights.
pub fn decode_position(short: &str) -> IcnResult<(Position, SpecialRights)> {
    let mut position = Position::new();
    let mut rights = SpecialRights::new();

    for entry in short.split('|').filter(|e| !e.is_empty()) {
        let (coords, piece, special) = decode_entry(entry)?;
        position.insert(coords, piece);
        if special {
            rights.grant(coords);
        }
    }

    Ok((position, rights))
}

fn decode_entry(entry: &str) -> IcnResult<(Coordinate, PieceType, bool)> {
    let malformed = || IcnError::malformed("position entry", entry);

    let split = entry
        .find(|c: char| !c.is_ascii_alphabetic())
        .ok_or_else(malformed)?;
    let (code, rest) = entry.split_at(split);
    if code.is_empty() {
        return Err(malformed());
    }

    let (coords, special) = match rest.strip_suffix('+') {
        Some(coords) => (coords, true),
        None => (rest, false),
    };
    let coords: Coordinate = coords.parse().map_err(|_| malformed())?;

    Ok((coords, piece::decode(code)?, special))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Color, PieceKind};

    fn piece(kind: PieceKind, color: Color) -> PieceType {
        PieceType::new(kind, color)
    }

    #[test]
    fn test_encode_position() {
        let position: Position = [
            (Coordinate::new(5, 6), piece(PieceKind::Pawns, Color::White)),
            (Coordinate::new(15, -56), piece(PieceKind::Kings, Color::Black)),
            (Coordinate::new(5000, 1), piece(PieceKind::Queens, Color::White)),
        ]
        .into_iter()
        .collect();
        let rights: SpecialRights = [Coordinate::new(5, 6)].into_iter().collect();

        assert_eq!(
            encode_position(&position, &rights).unwrap(),
            "P5,6+|k15,-56|Q5000,1"
        );
        assert_eq!(encode_position(&Position::new(), &rights).unwrap(), "");
    }

    #[test]
    fn test_decode_position() {
        let (position, rights) = decode_position("K5,4+|P1,2|r500,25389|AM-3,0+|vo0,0").unwrap();

        assert_eq!(position.len(), 5);
        assert_eq!(
            position.get(&Coordinate::new(-3, 0)),
            Some(piece(PieceKind::Amazons, Color::White))
        );
        assert_eq!(
            position.get(&Coordinate::new(0, 0)),
            Some(piece(PieceKind::Voids, Color::Neutral))
        );
        let granted: Vec<_> = rights.iter().copied().collect();
        assert_eq!(granted, vec![Coordinate::new(5, 4), Coordinate::new(-3, 0)]);
    }

    #[test]
    fn test_decode_then_encode_keeps_text() {
        let text = "P1,2+|ch-7,12|ob3,3|k5,8+";
        let (position, rights) = decode_position(text).unwrap();
        assert_eq!(encode_position(&position, &rights).unwrap(), text);
    }

    #[test]
    fn test_removal_keeps_order() {
        let (mut position, mut rights) = decode_position("K1,1+|Q2,2+|R3,3+").unwrap();

        assert_eq!(position.remove(&Coordinate::new(1, 1)), Some(piece(PieceKind::Kings, Color::White)));
        assert!(rights.revoke(&Coordinate::new(1, 1)));
        assert_eq!(encode_position(&position, &rights).unwrap(), "Q2,2+|R3,3+");

        position.insert(Coordinate::new(1, 2), piece(PieceKind::Kings, Color::White));
        assert_eq!(encode_position(&position, &rights).unwrap(), "Q2,2+|R3,3+|K1,2");
        let granted: Vec<_> = rights.iter().copied().collect();
        assert_eq!(granted, vec![Coordinate::new(2, 2), Coordinate::new(3, 3)]);
    }

    #[test]
    fn test_decode_rejects_bad_entries() {
        assert!(matches!(
            decode_position("K5,4|P1"),
            Err(IcnError::MalformedToken { .. })
        ));
        assert!(matches!(
            decode_position("5,4"),
            Err(IcnError::MalformedToken { .. })
        ));
        assert!(matches!(
            decode_position("K"),
            Err(IcnError::MalformedToken { .. })
        ));
        assert!(matches!(
            decode_position("X1,1"),
            Err(IcnError::UnknownPieceCode(_))
        ));
    }

    #[test]
    fn test_serde_shape() {
        let (position, rights) = decode_position("K5,1+|r8,8").unwrap();
        assert_eq!(
            serde_json::to_string(&position).unwrap(),
            r#"{"5,1":"kingsW","8,8":"rooksB"}"#
        );
        assert_eq!(serde_json::to_string(&rights).unwrap(), r#"{"5,1":true}"#);

        let rights: SpecialRights = serde_json::from_str(r#"{"1,2":true,"3,4":false}"#).unwrap();
        assert_eq!(rights.len(), 1);
        assert!(rights.contains(&Coordinate::new(1, 2)));
    }
}
