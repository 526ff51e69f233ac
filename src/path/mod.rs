//! Validated descent paths
//!
//! A path is a non-empty bit string: `0` descends left, `1` descends right.
//! Text form is the `'0'`/`'1'` string users type; storage is a `BitVec`.
//!
//! Paths order by length first and by natural string order within one
//! length, so every sorted collection of paths lists shallow nodes first.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bitvec::prelude::*;
use thiserror::Error;

use crate::tree::Direction;

/// Errors produced while parsing a path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Path text was empty
    #[error("path is empty")]
    Empty,

    /// Character outside the `{0, 1}` alphabet
    #[error("unexpected character '{ch}' at position {position} (only '0' and '1' are allowed)")]
    InvalidCharacter {
        /// Offending character
        ch: char,
        /// Zero-based character position
        position: usize,
    },
}

/// Non-empty left/right descent from the root
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TreePath {
    bits: BitVec,
}

#[allow(clippy::len_without_is_empty)]
impl TreePath {
    /// Parse a `'0'`/`'1'` string
    pub fn parse(text: &str) -> Result<Self, PathError> {
        if text.is_empty() {
            return Err(PathError::Empty);
        }

        let mut bits = BitVec::with_capacity(text.len());
        for (position, ch) in text.chars().enumerate() {
            let direction =
                Direction::from_char(ch).ok_or(PathError::InvalidCharacter { ch, position })?;
            bits.push(direction.bit());
        }

        Ok(Self { bits })
    }

    /// Build a path from explicit directions; `None` when empty
    pub fn from_directions<I>(directions: I) -> Option<Self>
    where
        I: IntoIterator<Item = Direction>,
    {
        let bits: BitVec = directions.into_iter().map(Direction::bit).collect();
        (!bits.is_empty()).then_some(Self { bits })
    }

    /// One-step path to a child of the root
    pub fn step(direction: Direction) -> Self {
        let mut bits = BitVec::with_capacity(1);
        bits.push(direction.bit());
        Self { bits }
    }

    /// Number of steps from the root (always at least 1)
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Directions in descent order
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.bits.iter().by_vals().map(Direction::from_bit)
    }

    /// Final step, selecting the addressed node among its siblings
    pub fn last(&self) -> Direction {
        // Non-empty by construction
        Direction::from_bit(self.bits[self.bits.len() - 1])
    }

    /// Leading `len` steps, if `1 <= len <= self.len()`
    pub fn prefix(&self, len: usize) -> Option<TreePath> {
        (1..=self.len()).contains(&len).then(|| Self {
            bits: self.bits[..len].to_bitvec(),
        })
    }

    /// All non-empty prefixes, shortest first, ending with the path itself
    pub fn prefixes(&self) -> impl Iterator<Item = TreePath> + '_ {
        (1..=self.len()).filter_map(move |len| self.prefix(len))
    }

    /// Strict non-empty prefixes, shortest first
    pub fn ancestors(&self) -> impl Iterator<Item = TreePath> + '_ {
        (1..self.len()).filter_map(move |len| self.prefix(len))
    }

    /// Path one step further down
    pub fn child(&self, direction: Direction) -> TreePath {
        let mut bits = self.bits.clone();
        bits.push(direction.bit());
        Self { bits }
    }

    /// Whether `self` is a strict prefix of `other`
    pub fn is_ancestor_of(&self, other: &TreePath) -> bool {
        self.len() < other.len() && other.bits.starts_with(self.bits.as_bitslice())
    }
}

impl Ord for TreePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len()
            .cmp(&other.len())
            .then_with(|| self.bits.cmp(&other.bits))
    }
}

impl PartialOrd for TreePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for TreePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for direction in self.directions() {
            write!(f, "{}", direction.as_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreePath(\"{self}\")")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TreePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
