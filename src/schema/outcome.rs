//! The five-way feedback a guess receives.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Relation between a guessed fragment and the hidden word.
///
/// The discriminant doubles as the child slot index of a
/// [`GuessNode`](crate::tree::GuessNode) and as the column position in the
/// serialized tree format, so the order must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Outcome {
    /// The fragment does not occur in the word.
    Absent = 0,
    /// The fragment occurs, but neither at the start nor at the end.
    ContainsOnly = 1,
    /// The fragment starts the word but does not end it.
    PrefixOnly = 2,
    /// The fragment ends the word but does not start it.
    SuffixOnly = 3,
    /// The fragment both starts and ends the word.
    PrefixAndSuffix = 4,
}

impl Outcome {
    /// Number of outcomes (and child slots per node).
    pub const COUNT: usize = 5;

    /// All outcomes in slot order.
    pub const ALL: [Outcome; Self::COUNT] = [
        Outcome::Absent,
        Outcome::ContainsOnly,
        Outcome::PrefixOnly,
        Outcome::SuffixOnly,
        Outcome::PrefixAndSuffix,
    ];

    /// Slot index of this outcome.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Absent => "absent",
            Outcome::ContainsOnly => "contains",
            Outcome::PrefixOnly => "prefix",
            Outcome::SuffixOnly => "suffix",
            Outcome::PrefixAndSuffix => "prefix and suffix",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for outcome in Outcome::ALL {
            assert_eq!(Outcome::from_index(outcome.index()), Some(outcome));
        }
        assert_eq!(Outcome::from_index(Outcome::COUNT), None);
    }
}
