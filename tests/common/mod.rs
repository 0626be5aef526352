#![allow(dead_code)]

use icn_core::{from_notation, Coordinate, GameRecord, ParseOptions};

/// Classical game with en passant, a capture-promotion, castling, checks and mate.
pub const EXAMPLE_GAME: &str = r#"{
    "metadata": {
        "Variant": "Classical",
        "Version": "1",
        "White": "Tom",
        "Black": "Ben",
        "Clock": "10+5",
        "Date": "2024/03/17 13:42:06",
        "Result": "0-1",
        "Condition": "checkmate"
    },
    "turn": "white",
    "moveRule": "0/100",
    "fullMove": 1,
    "gameRules": {
        "slideLimit": "Infinity",
        "promotionRanks": [8, 1],
        "promotionsAllowed": {
            "white": ["queens", "rooks", "bishops", "knights"],
            "black": ["queens", "rooks", "bishops", "knights"]
        },
        "ovenTemperature": 350,
        "winConditions": {"white": ["checkmate"], "black": ["checkmate"]}
    },
    "specialRights": {
        "1,2": true, "2,2": true, "3,2": true, "4,2": true,
        "5,2": true, "6,2": true, "7,2": true, "8,2": true,
        "1,7": true, "2,7": true, "3,7": true, "4,7": true,
        "5,7": true, "6,7": true, "7,7": true, "8,7": true,
        "1,1": true, "5,1": true, "8,1": true, "1,8": true, "5,8": true, "8,8": true
    },
    "startingPosition": {
        "1,2": "pawnsW", "2,2": "pawnsW", "3,2": "pawnsW", "4,2": "pawnsW",
        "5,2": "pawnsW", "6,2": "pawnsW", "7,2": "pawnsW", "8,2": "pawnsW",
        "1,7": "pawnsB", "2,7": "pawnsB", "3,7": "pawnsB", "4,7": "pawnsB",
        "5,7": "pawnsB", "6,7": "pawnsB", "7,7": "pawnsB", "8,7": "pawnsB",
        "1,1": "rooksW", "8,1": "rooksW", "1,8": "rooksB", "8,8": "rooksB",
        "2,1": "knightsW", "7,1": "knightsW", "2,8": "knightsB", "7,8": "knightsB",
        "3,1": "bishopsW", "6,1": "bishopsW", "3,8": "bishopsB", "6,8": "bishopsB",
        "4,1": "queensW", "4,8": "queensB", "5,1": "kingsW", "5,8": "kingsB"
    },
    "moves": [
        {"type": "pawnsW", "startCoords": [4, 2], "endCoords": [4, 4]},
        {"type": "pawnsB", "startCoords": [4, 7], "endCoords": [4, 6]},
        {"type": "pawnsW", "startCoords": [4, 4], "endCoords": [4, 5]},
        {"type": "pawnsB", "startCoords": [3, 7], "endCoords": [3, 5]},
        {"type": "pawnsW", "startCoords": [4, 5], "endCoords": [3, 6], "captured": "pawnsB", "enpassant": -1},
        {"type": "bishopsB", "startCoords": [6, 8], "endCoords": [3, 11]},
        {"type": "pawnsW", "startCoords": [3, 6], "endCoords": [2, 7], "captured": "pawnsB"},
        {"type": "bishopsB", "startCoords": [3, 11], "endCoords": [-4, 4]},
        {"type": "pawnsW", "startCoords": [2, 7], "endCoords": [1, 8], "captured": "rooksB", "promotion": "queensW"},
        {"type": "bishopsB", "startCoords": [-4, 4], "endCoords": [2, -2], "check": true},
        {"type": "kingsW", "startCoords": [5, 1], "endCoords": [4, 2]},
        {"type": "knightsB", "startCoords": [7, 8], "endCoords": [6, 6]},
        {"type": "queensW", "startCoords": [1, 8], "endCoords": [2, 8], "captured": "knightsB"},
        {"type": "kingsB", "startCoords": [5, 8], "endCoords": [7, 8], "castle": {"dir": 1, "coord": [8, 8]}},
        {"type": "queensW", "startCoords": [2, 8], "endCoords": [1, 7], "captured": "pawnsB"},
        {"type": "queensB", "startCoords": [4, 8], "endCoords": [0, 4]},
        {"type": "queensW", "startCoords": [1, 7], "endCoords": [7, 13], "check": true},
        {"type": "kingsB", "startCoords": [7, 8], "endCoords": [8, 8]},
        {"type": "queensW", "startCoords": [7, 13], "endCoords": [7, 7], "captured": "pawnsB", "check": true},
        {"type": "kingsB", "startCoords": [8, 8], "endCoords": [7, 7], "captured": "queensW"},
        {"type": "pawnsW", "startCoords": [8, 2], "endCoords": [8, 4]},
        {"type": "queensB", "startCoords": [0, 4], "endCoords": [4, 4], "check": true, "mate": true}
    ]
}"#;

/// The example game as a record.
pub fn example_game() -> GameRecord {
    serde_json::from_str(EXAMPLE_GAME).expect("example game fixture")
}

/// Parse ICN with default options, panicking on error.
pub fn parse(text: &str) -> GameRecord {
    from_notation(text, &ParseOptions::default())
        .unwrap_or_else(|e| panic!("failed to parse {text:?}: {e}"))
}

pub fn c(x: i64, y: i64) -> Coordinate {
    Coordinate::new(x, y)
}

/// Long piece identifier on a square of the record's position.
pub fn piece_at(record: &GameRecord, x: i64, y: i64) -> Option<String> {
    record
        .starting_position
        .as_ref()
        .and_then(|p| p.get(&c(x, y)))
        .map(|p| p.to_string())
}
