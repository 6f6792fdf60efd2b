//! Playing a finished tree one hint at a time.

use super::GuessNode;
use crate::schema::Outcome;

/// Feedback for the current guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    /// The guess is the hidden word.
    Exact,
    /// The guess relates to the hidden word as described.
    Outcome(Outcome),
}

/// A position inside a guess tree, driven by hints from the game.
///
/// Mapping the game's free-text hint phrases onto [`Hint`] is left to the
/// caller.
#[derive(Debug, Clone)]
pub struct TreeCursor<'t> {
    root: &'t GuessNode,
    current: Option<&'t GuessNode>,
    guesses: usize,
}

impl<'t> TreeCursor<'t> {
    pub fn new(root: &'t GuessNode) -> Self {
        Self {
            root,
            current: Some(root),
            guesses: 0,
        }
    }

    /// The fragment to guess next, or `None` once the tree has run out of
    /// nodes for the hints received.
    pub fn current_guess(&self) -> Option<&'t str> {
        self.current.map(|node| node.guess.as_str())
    }

    /// Move to the child matching `hint`. An exact hint keeps the cursor
    /// where it is.
    pub fn advance(&mut self, hint: Hint) {
        self.guesses += 1;
        if let (Hint::Outcome(outcome), Some(node)) = (hint, self.current) {
            self.current = node.child(outcome);
        }
    }

    /// Hints received so far.
    pub fn guesses(&self) -> usize {
        self.guesses
    }

    /// Start over at the root for a new game.
    pub fn reset(&mut self) {
        self.current = Some(self.root);
        self.guesses = 0;
    }
}
