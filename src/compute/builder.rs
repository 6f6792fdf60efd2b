//! Recursive guess tree construction.

use std::sync::Arc;

use rand::Rng;

use super::classify::partition;
use super::evaluate::{EvaluationError, average_guesses};
use super::select::GuessSelector;
use crate::schema::{HeuristicParams, Outcome, Vocabulary, WordSet};
use crate::tree::{GuessNode, ParentLink};

/// Builds guess trees over a vocabulary with the heuristic selector.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    vocabulary: Arc<Vocabulary>,
    selector: GuessSelector,
}

impl TreeBuilder {
    pub fn new(vocabulary: Arc<Vocabulary>, selector: GuessSelector) -> Self {
        Self {
            vocabulary,
            selector,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Build a tree resolving every word of `words`.
    ///
    /// Returns `None` for an empty set. Every bucket excludes the guess it
    /// was split on, so each subset is strictly smaller than its parent's.
    /// Subsets wait on an explicit work stack, so a degenerate vocabulary
    /// that peels off one word per level cannot exhaust the thread stack.
    pub fn build<R: Rng + ?Sized>(
        &self,
        words: &WordSet<'_>,
        params: &HeuristicParams,
        rng: &mut R,
    ) -> Option<GuessNode> {
        let mut nodes: Vec<(GuessNode, ParentLink)> = Vec::new();
        let mut pending = vec![(words.clone(), None)];

        while let Some((subset, link)) = pending.pop() {
            let Some(selection) = self.selector.select(&subset, params, rng) else {
                continue;
            };
            let index = nodes.len();
            let buckets = partition(&subset, &selection.guess);
            nodes.push((GuessNode::leaf(selection.guess), link));

            // Reversed so buckets are built in slot order.
            for (outcome, bucket) in Outcome::ALL.into_iter().zip(buckets).rev() {
                if !bucket.is_empty() {
                    pending.push((bucket, Some((index, outcome))));
                }
            }
        }

        GuessNode::from_preorder(nodes)
    }

    /// Build a tree for the whole vocabulary.
    pub fn build_vocabulary<R: Rng + ?Sized>(
        &self,
        params: &HeuristicParams,
        rng: &mut R,
    ) -> Option<GuessNode> {
        self.build(&self.vocabulary.word_set(), params, rng)
    }

    /// Build `trials` whole-vocabulary trees with the same parameters and
    /// return the one with the lowest average along with that average.
    pub fn build_best_of<R: Rng + ?Sized>(
        &self,
        trials: usize,
        params: &HeuristicParams,
        rng: &mut R,
    ) -> Result<Option<(GuessNode, f64)>, EvaluationError> {
        let words = self.vocabulary.word_set();
        let mut best: Option<(GuessNode, f64)> = None;
        for _ in 0..trials {
            let Some(tree) = self.build(&words, params, rng) else {
                break;
            };
            let average = average_guesses(&tree, self.vocabulary.entries())?;
            if best.as_ref().is_none_or(|(_, b)| average < *b) {
                best = Some((tree, average));
            }
        }
        Ok(best)
    }

    /// Replace `node` with a freshly built subtree over the words it
    /// currently resolves.
    pub fn regenerate<R: Rng + ?Sized>(
        &self,
        node: &mut GuessNode,
        params: &HeuristicParams,
        rng: &mut R,
    ) {
        let words = node.reachable_words(&self.vocabulary);
        if let Some(rebuilt) = self.build(&words, params, rng) {
            *node = rebuilt;
        }
    }

    /// Keep `node`'s guess but rebuild all of its children from the
    /// partition of the words it currently resolves.
    pub fn rebuild_children<R: Rng + ?Sized>(
        &self,
        node: &mut GuessNode,
        params: &HeuristicParams,
        rng: &mut R,
    ) {
        let words = node.reachable_words(&self.vocabulary);
        node.clear_children();
        self.build_children(node, &words, params, rng);
    }

    fn build_children<R: Rng + ?Sized>(
        &self,
        node: &mut GuessNode,
        words: &WordSet<'_>,
        params: &HeuristicParams,
        rng: &mut R,
    ) {
        let buckets = partition(words, &node.guess);
        for (outcome, bucket) in Outcome::ALL.into_iter().zip(buckets) {
            if !bucket.is_empty() {
                let child = self.build(&bucket, params, rng);
                node.set_child(outcome, child);
            }
        }
    }
}
