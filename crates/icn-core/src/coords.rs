//! Board coordinates on the unbounded plane, written as "x,y".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IcnError, IcnResult};

/// A square on the board. Serializes as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
}

impl Coordinate {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Same square shifted by the given deltas. Fails past the edge of `i64`.
    pub fn offset(self, dx: i64, dy: i64) -> IcnResult<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Ok(Self::new(x, y)),
            _ => Err(IcnError::malformed(
                "coordinate",
                format!("{self} shifted by {dx},{dy}"),
            )),
        }
    }
}

impl From<(i64, i64)> for Coordinate {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Coordinate> for (i64, i64) {
    fn from(c: Coordinate) -> Self {
        (c.x, c.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Coordinate {
    type Err = IcnError;

    /// Exactly two optionally signed integers separated by one comma.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IcnError::malformed("coordinate", s);

        let (x, y) = s.split_once(',').ok_or_else(malformed)?;
        if !is_integer(x) || !is_integer(y) {
            return Err(malformed());
        }

        Ok(Self::new(
            x.parse().map_err(|_| malformed())?,
            y.parse().map_err(|_| malformed())?,
        ))
    }
}

// `str::parse::<i64>` also accepts a leading '+', which the notation does not.
fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
