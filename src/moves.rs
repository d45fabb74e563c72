use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::cube_state::CubeState;
use crate::face_map::FaceMap;

pub const MOVE_COUNT: usize = 6;

/// A quarter turn of one layer.
///
/// The discriminant order is the fixed iteration order used when building
/// the transition graph and when walking it during a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Move {
    L,
    X,
    U,
    R,
    Y,
    D,
}

// Each entry is a (destination, source) pair; unlisted positions are unchanged.
// Per move: the four stickers of the turned face, then the two side bands.
#[rustfmt::skip]
const FACE_MAPS: [FaceMap; MOVE_COUNT] = [
    // L
    FaceMap::from_pairs([
        (0, 2), (1, 0), (2, 3), (3, 1),
        (4, 8), (8, 12), (12, 16), (16, 4),
        (5, 9), (9, 13), (13, 17), (17, 5),
    ]),
    // X
    FaceMap::from_pairs([
        (8, 10), (9, 8), (10, 11), (11, 9),
        (2, 7), (7, 21), (21, 12), (12, 2),
        (3, 5), (5, 20), (20, 14), (14, 3),
    ]),
    // U
    FaceMap::from_pairs([
        (4, 5), (5, 7), (6, 4), (7, 6),
        (0, 8), (8, 20), (20, 19), (19, 0),
        (2, 10), (10, 22), (22, 17), (17, 2),
    ]),
    // R
    FaceMap::from_pairs([
        (0, 1), (1, 3), (2, 0), (3, 2),
        (4, 16), (16, 12), (12, 8), (8, 4),
        (5, 17), (17, 13), (13, 9), (9, 5),
    ]),
    // Y
    FaceMap::from_pairs([
        (8, 9), (9, 11), (10, 8), (11, 10),
        (2, 12), (12, 21), (21, 7), (7, 2),
        (3, 14), (14, 20), (20, 5), (5, 3),
    ]),
    // D
    FaceMap::from_pairs([
        (4, 6), (5, 4), (6, 7), (7, 5),
        (0, 19), (8, 0), (20, 8), (19, 20),
        (2, 17), (10, 2), (22, 10), (17, 22),
    ]),
];

impl Move {
    pub const ALL: [Move; MOVE_COUNT] = [Move::L, Move::X, Move::U, Move::R, Move::Y, Move::D];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn face_map(self) -> &'static FaceMap {
        &FACE_MAPS[self.index()]
    }

    #[inline]
    pub fn apply(self, state: &CubeState) -> CubeState {
        self.face_map().permute(state)
    }

    pub fn apply_all<'a>(state: &CubeState, moves: impl IntoIterator<Item = &'a Move>) -> CubeState {
        moves
            .into_iter()
            .fold(*state, |state, turn| turn.apply(&state))
    }

    pub fn inverse(self) -> Move {
        match self {
            Move::U => Move::D,
            Move::D => Move::U,
            Move::L => Move::R,
            Move::R => Move::L,
            Move::X => Move::Y,
            Move::Y => Move::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Move::L => 'L',
            Move::X => 'X',
            Move::U => 'U',
            Move::R => 'R',
            Move::Y => 'Y',
            Move::D => 'D',
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Move::U => "twist the left face counterclockwise by 90 deg",
            Move::D => "twist the left face clockwise by 90 deg",
            Move::R => "twist the top face counterclockwise by 90 deg",
            Move::L => "twist the top face clockwise by 90 deg",
            Move::Y => "twist the front face counterclockwise by 90 deg",
            Move::X => "twist the front face clockwise by 90 deg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown move {0:?}; expected one of L, X, U, R, Y, D")]
pub struct ParseMoveError(pub String);

impl TryFrom<char> for Move {
    type Error = ParseMoveError;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        Move::ALL
            .iter()
            .copied()
            .find(|turn| turn.symbol() == symbol)
            .ok_or_else(|| ParseMoveError(symbol.to_string()))
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => Move::try_from(symbol),
            _ => Err(ParseMoveError(text.to_string())),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::cube_state::SOLVED;

    #[test]
    fn test_tables_are_bijections() {
        for turn in Move::ALL {
            assert!(turn.face_map().is_bijection(), "{} is not a bijection", turn);
            assert_eq!(turn.face_map().num_moved(), 12, "{}", turn);
        }
    }

    #[test]
    fn test_inverse_pairs() {
        for turn in Move::ALL {
            assert_eq!(turn.inverse().inverse(), turn);
            assert_ne!(turn.inverse(), turn);
            assert!(turn.face_map().is_inverse_of(turn.inverse().face_map()));
            assert_eq!(turn.face_map().invert(), *turn.inverse().face_map());
            assert_eq!(turn.inverse().apply(&turn.apply(&SOLVED)), SOLVED);
        }
    }

    #[test]
    fn test_four_quarter_turns_are_identity() {
        let scrambled: CubeState = "BWBWRRRRYBYBOOOOGWGWGYGY".parse().unwrap();
        for turn in Move::ALL {
            for start in [SOLVED, scrambled] {
                let turned = Move::apply_all(&start, &[turn; 4]);
                assert_eq!(turned, start, "{}", turn);
                assert_ne!(turn.apply(&start), start);
            }
            let map = turn.face_map();
            assert_eq!(map.apply(map).apply(map).apply(map), FaceMap::identity(), "{}", turn);
        }
    }

    #[test]
    fn test_composed_maps_match_sequential_moves() {
        for first in Move::ALL {
            for second in Move::ALL {
                let combined = first.face_map().apply(second.face_map());
                assert_eq!(
                    combined.permute(&SOLVED),
                    Move::apply_all(&SOLVED, &[first, second]),
                    "{} then {}",
                    first,
                    second
                );
            }
        }
    }

    #[test]
    fn test_apply_to_solved() {
        assert_snapshot!(Move::U.apply(&SOLVED).to_string(), @"BWBWRRRRYBYBOOOOGWGWGYGY");
        assert_snapshot!(Move::D.apply(&SOLVED).to_string(), @"GWGWRRRRWBWBOOOOGYGYBYBY");
        assert_snapshot!(Move::L.apply(&SOLVED).to_string(), @"WWWWBBRROOBBGGOORRGGYYYY");
        assert_snapshot!(Move::R.apply(&SOLVED).to_string(), @"WWWWGGRRRRBBBBOOOOGGYYYY");
        assert_snapshot!(Move::X.apply(&SOLVED).to_string(), @"WWRRRYRYBBBBWOWOGGGGOOYY");
        assert_snapshot!(Move::Y.apply(&SOLVED).to_string(), @"WWOORWRWBBBBYOYOGGGGRRYY");
    }

    #[test]
    fn test_parse_and_display() {
        for turn in Move::ALL {
            assert_eq!(turn.to_string().parse::<Move>(), Ok(turn));
            assert_eq!(Move::try_from(turn.symbol()), Ok(turn));
        }
        assert_eq!("UD".parse::<Move>(), Err(ParseMoveError("UD".to_string())));
        assert_eq!("".parse::<Move>(), Err(ParseMoveError(String::new())));
        assert_eq!(Move::try_from('F'), Err(ParseMoveError("F".to_string())));
        assert_eq!(serde_json::to_string(&Move::X).unwrap(), "\"X\"");
    }
}
