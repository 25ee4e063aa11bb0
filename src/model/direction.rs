//! Direction algebra: the cyclic group of four orientations.

use std::fmt;
use std::ops::{Add, Sub};

use crate::{Error, Result};

/// Letters used on the command line, indexed by direction value.
pub const LETTERS: [char; 4] = ['w', 'd', 's', 'a'];

/// One of the four orientations, forming ℤ/4 under addition.
///
/// Stored directions are always absolute. A relative direction is the
/// difference `absolute - facing`, and `relative + facing` turns it back
/// into an absolute one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Direction {
    Forward = 0,
    Right = 1,
    Backward = 2,
    Left = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Right,
        Direction::Backward,
        Direction::Left,
    ];

    /// Reduce any integer modulo 4 into a direction.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % 4) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn opposite(self) -> Self {
        self + Direction::Backward
    }

    pub fn letter(self) -> char {
        LETTERS[self.index() as usize]
    }

    pub fn from_letter(letter: char) -> Result<Self> {
        LETTERS
            .iter()
            .position(|&l| l == letter)
            .map(|i| Self::ALL[i])
            .ok_or(Error::InvalidDirection(letter))
    }

    /// Parse every letter of `letters`, failing on the first bad one.
    pub fn parse_letters(letters: &str) -> Result<Vec<Self>> {
        letters.chars().map(Self::from_letter).collect()
    }

    /// Identifier used in the persisted database.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Right => "right",
            Direction::Backward => "backward",
            Direction::Left => "left",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl Add for Direction {
    type Output = Direction;

    fn add(self, rhs: Direction) -> Direction {
        Direction::from_index(self.index() + rhs.index())
    }
}

impl Sub for Direction {
    type Output = Direction;

    fn sub(self, rhs: Direction) -> Direction {
        Direction::from_index(self.index() + 4 - rhs.index())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Space-separated names, in the order given.
pub fn join_names(dirs: impl IntoIterator<Item = Direction>) -> String {
    dirs.into_iter()
        .map(Direction::name)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_direction() -> impl Strategy<Value = Direction> {
        (0u8..4).prop_map(Direction::from_index)
    }

    proptest! {
        #[test]
        fn sub_undoes_add(a in any_direction(), b in any_direction()) {
            prop_assert_eq!((a + b) - b, a);
        }

        #[test]
        fn opposite_is_adding_backward(a in any_direction()) {
            prop_assert_eq!(a.opposite(), a + Direction::Forward.opposite());
            prop_assert_eq!(a.opposite().opposite(), a);
        }

        #[test]
        fn add_is_commutative(a in any_direction(), b in any_direction()) {
            prop_assert_eq!(a + b, b + a);
        }

        #[test]
        fn letters_round_trip(a in any_direction()) {
            prop_assert_eq!(Direction::from_letter(a.letter()).unwrap(), a);
            prop_assert_eq!(Direction::from_name(a.name()), Some(a));
        }
    }

    #[test]
    fn test_relative_turns() {
        // Facing left, an absolute forward passage is to the explorer's right.
        assert_eq!(Direction::Forward - Direction::Left, Direction::Right);
        assert_eq!(Direction::Right + Direction::Left, Direction::Forward);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn test_bad_letter() {
        let err = Direction::parse_letters("wdx").unwrap_err();
        assert!(matches!(err, Error::InvalidDirection('x')));
        assert_eq!(
            Direction::parse_letters("wdsa").unwrap(),
            Direction::ALL.to_vec()
        );
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(Direction::from_name("up"), None);
        assert_eq!(Direction::from_name("Forward"), None);
    }
}
