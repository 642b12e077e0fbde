use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Separator between coordinates in a position key (`"x,y,z"`).
const KEY_SEPARATOR: char = ',';

/// Errors from building a [`Position`] out of loose input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("position must have exactly 3 coordinates, got {0}")]
    WrongArity(usize),
    #[error("invalid coordinate {0:?}")]
    BadCoordinate(String),
}

/// Integer coordinate of a placed structure.
///
/// A position serializes as its key, `"x,y,z"`, so it can be used directly as
/// a JSON object key in the world document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Position {
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [i64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[i64; 3]> for Position {
    fn from([x, y, z]: [i64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl TryFrom<&[i64]> for Position {
    type Error = PositionError;

    fn try_from(coords: &[i64]) -> Result<Self, Self::Error> {
        match *coords {
            [x, y, z] => Ok(Self { x, y, z }),
            _ => Err(PositionError::WrongArity(coords.len())),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// Parses only the canonical spelling of a key, the exact text `Display`
/// produces. `" 1"`, `"+1"`, `"01"` and `"-0"` are rejected so that two
/// distinct keys can never name the same position.
impl FromStr for Position {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords = s
            .split(KEY_SEPARATOR)
            .map(parse_coordinate)
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from(coords.as_slice())
    }
}

fn parse_coordinate(part: &str) -> Result<i64, PositionError> {
    match part.parse::<i64>() {
        Ok(value) if value.to_string() == part => Ok(value),
        _ => Err(PositionError::BadCoordinate(part.to_string())),
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_comma_joined() {
        assert_eq!(Position::new(1, 2, 3).to_string(), "1,2,3");
        assert_eq!(Position::new(-4, 0, 17).to_string(), "-4,0,17");
    }

    #[test]
    fn key_parses_back() {
        let pos: Position = "-4,0,17".parse().unwrap();
        assert_eq!(pos, Position::new(-4, 0, 17));
    }

    #[test]
    fn arity_is_checked() {
        let two: &[i64] = &[1, 2];
        assert_eq!(Position::try_from(two), Err(PositionError::WrongArity(2)));
        let four: &[i64] = &[1, 2, 3, 4];
        assert_eq!(Position::try_from(four), Err(PositionError::WrongArity(4)));
        assert_eq!(
            "1,2".parse::<Position>(),
            Err(PositionError::WrongArity(2))
        );
    }

    #[test]
    fn bad_coordinate_rejected() {
        assert_eq!(
            "1,two,3".parse::<Position>(),
            Err(PositionError::BadCoordinate("two".into()))
        );
        assert!("".parse::<Position>().is_err());
    }

    #[test]
    fn only_canonical_keys_parse() {
        for key in [" 1,2,3", "1, 2, 3", "+1,2,3", "01,2,3", "1,-0,3", "1,2,3 "] {
            assert!(
                matches!(key.parse::<Position>(), Err(PositionError::BadCoordinate(_))),
                "{key:?} should be rejected"
            );
        }
        assert_eq!("0,-7,123".parse::<Position>(), Ok(Position::new(0, -7, 123)));
        let extreme = Position::new(i64::MIN, 0, i64::MAX);
        assert_eq!(extreme.to_string().parse::<Position>(), Ok(extreme));
    }

    #[test]
    fn serializes_as_key_string() {
        let json = serde_json::to_string(&Position::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"1,2,3\"");
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Position::new(1, 2, 3));
    }
}
