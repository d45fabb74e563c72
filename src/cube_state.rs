use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const FACELET_COUNT: usize = 24;

/// One sticker color. The discriminant is the ASCII symbol used in the text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Facelet {
    White = b'W',
    Red = b'R',
    Blue = b'B',
    Orange = b'O',
    Green = b'G',
    Yellow = b'Y',
}

impl Facelet {
    pub const ALL: [Facelet; 6] = [
        Facelet::White,
        Facelet::Red,
        Facelet::Blue,
        Facelet::Orange,
        Facelet::Green,
        Facelet::Yellow,
    ];

    #[inline]
    pub fn symbol(self) -> char {
        self as u8 as char
    }

    pub fn from_symbol(symbol: char) -> Option<Facelet> {
        Facelet::ALL
            .iter()
            .copied()
            .find(|facelet| facelet.symbol() == symbol)
    }
}

/// A full cube configuration: one color per facelet position.
///
/// Which physical sticker each index denotes is fixed by the move tables in
/// [`crate::moves`]; nothing else in the crate interprets the positions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubeState(pub [Facelet; FACELET_COUNT]);

/// `WWWWRRRRBBBBOOOOGGGGYYYY`: the root of the transition graph and the goal of every solve.
pub const SOLVED: CubeState = {
    use Facelet::*;
    CubeState([
        White, White, White, White, Red, Red, Red, Red, Blue, Blue, Blue, Blue, Orange, Orange,
        Orange, Orange, Green, Green, Green, Green, Yellow, Yellow, Yellow, Yellow,
    ])
};

impl CubeState {
    #[inline]
    pub fn facelets(&self) -> &[Facelet; FACELET_COUNT] {
        &self.0
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        *self == SOLVED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseStateError {
    #[error("expected 24 facelets, found {0}")]
    WrongLength(usize),
    #[error("unknown color {found:?} at position {index}; expected one of W, R, B, O, G, Y")]
    UnknownColor { index: usize, found: char },
}

impl FromStr for CubeState {
    type Err = ParseStateError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let length = text.chars().count();
        if length != FACELET_COUNT {
            return Err(ParseStateError::WrongLength(length));
        }
        let mut facelets = [Facelet::White; FACELET_COUNT];
        for (index, symbol) in text.chars().enumerate() {
            facelets[index] = Facelet::from_symbol(symbol).ok_or(ParseStateError::UnknownColor {
                index,
                found: symbol,
            })?;
        }
        Ok(CubeState(facelets))
    }
}

impl fmt::Display for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for facelet in &self.0 {
            write!(f, "{}", facelet.symbol())?;
        }
        Ok(())
    }
}

impl fmt::Debug for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CubeState({})", self)
    }
}

impl Serialize for CubeState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CubeState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
