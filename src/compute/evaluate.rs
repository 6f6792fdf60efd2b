//! Deterministic guess-count evaluation, the fitness signal for the search.

use super::classify::classify;
use crate::tree::GuessNode;

/// Number of guesses the tree needs for `word`, or `None` if it runs into an
/// empty slot before guessing it.
pub fn simulate(tree: &GuessNode, word: &str) -> Option<usize> {
    let mut current = Some(tree);
    let mut count = 0;
    while let Some(node) = current {
        count += 1;
        if node.guess == word {
            return Some(count);
        }
        current = node.child(classify(word, &node.guess));
    }
    None
}

/// Mean guess count over `entries`, duplicates counted individually.
///
/// This is the figure a player using the tree sees, and the only fitness
/// the local search optimises.
pub fn average_guesses<S: AsRef<str>>(
    tree: &GuessNode,
    entries: &[S],
) -> Result<f64, EvaluationError> {
    Ok(evaluate(tree, entries)?.average)
}

/// Full evaluation of a tree over `entries`.
pub fn evaluate<S: AsRef<str>>(
    tree: &GuessNode,
    entries: &[S],
) -> Result<EvaluationStats, EvaluationError> {
    let mut total = 0;
    let mut worst = 0;
    for word in entries {
        let word = word.as_ref();
        let guesses = simulate(tree, word).ok_or_else(|| EvaluationError::UnresolvedWord {
            word: word.to_string(),
        })?;
        total += guesses;
        worst = worst.max(guesses);
    }

    let average = if entries.is_empty() {
        0.0
    } else {
        total as f64 / entries.len() as f64
    };
    Ok(EvaluationStats {
        words: entries.len(),
        total_guesses: total,
        worst_guesses: worst,
        average,
    })
}

/// Result of evaluating a tree over a word list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationStats {
    pub words: usize,
    pub total_guesses: usize,
    /// Most guesses any single word needs.
    pub worst_guesses: usize,
    pub average: f64,
}

/// Evaluation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("Word {word:?} cannot be resolved by the tree")]
    UnresolvedWord { word: String },
}
