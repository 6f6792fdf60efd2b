//! Heuristic single-guess selection.
//!
//! For every candidate fragment the selector looks at how the fragment would
//! split the remaining words into the five outcome buckets and picks the one
//! whose bucket ratios are closest (squared distance) to a goal profile.

use std::sync::Arc;

use rand::Rng;

use super::classify::outcome_counts;
use super::fragments::FragmentPool;
use crate::schema::{HeuristicParams, Outcome, WordSet};

/// Subsets this small skip the search and guess a member directly.
pub const DIRECT_GUESS_LIMIT: usize = 3;

/// A candidate whose largest bucket keeps more than this share of the words
/// barely splits the subset and is replaced by a direct guess.
pub const DEGENERATE_RATIO: f64 = 0.95;

/// How a guess was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// Subset small enough to guess a member outright.
    Direct,
    /// Best fragment by distance to the goal weights.
    Scored,
    /// First fragment leaving at least three single-word buckets.
    Shortcut,
    /// No fragment split the subset usefully; a member is guessed instead.
    Degenerate,
}

/// A selected guess.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub guess: String,
    pub kind: SelectionKind,
    /// Share of the subset left in the largest bucket (0 for direct guesses).
    pub worst_ratio: f64,
}

/// Picks guesses for word subsets from a shared fragment pool.
#[derive(Debug, Clone)]
pub struct GuessSelector {
    pool: Arc<FragmentPool>,
}

impl GuessSelector {
    pub fn new(pool: Arc<FragmentPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &FragmentPool {
        &self.pool
    }

    /// Choose a guess for a non-empty subset.
    ///
    /// Returns `None` only for an empty subset.
    pub fn select<R: Rng + ?Sized>(
        &self,
        words: &WordSet<'_>,
        params: &HeuristicParams,
        rng: &mut R,
    ) -> Option<Selection> {
        let first = *words.first()?;
        let direct = |kind, worst_ratio| Selection {
            guess: first.to_string(),
            kind,
            worst_ratio,
        };

        if words.len() <= DIRECT_GUESS_LIMIT {
            return Some(direct(SelectionKind::Direct, 0.0));
        }

        let goals = params.decision_weights(rng);
        let total = words.len() as f64;

        let mut best: Option<(&str, f64)> = None;
        let mut best_distance = f64::INFINITY;
        let mut kind = SelectionKind::Scored;

        for fragment in self.pool.iter() {
            let counts = outcome_counts(words.iter().copied(), fragment);
            let ratios = counts.map(|c| c as f64 / total);
            let worst = ratios.iter().copied().fold(0.0, f64::max);

            let singles = counts.iter().filter(|&&c| c == 1).count();
            if singles >= 3 && words.len() < params.count_ones_threshold {
                best = Some((fragment, worst));
                kind = SelectionKind::Shortcut;
                break;
            }

            let distance = squared_distance(&ratios, &goals);
            if distance < best_distance {
                best_distance = distance;
                best = Some((fragment, worst));
            }
        }

        match best {
            Some((fragment, worst)) if worst <= DEGENERATE_RATIO => Some(Selection {
                guess: fragment.to_string(),
                kind,
                worst_ratio: worst,
            }),
            Some((fragment, worst)) => {
                log::trace!(
                    "Degenerate guess {:?} keeps {:.1}% of {} words, guessing {:?}",
                    fragment,
                    worst * 100.0,
                    words.len(),
                    first
                );
                Some(direct(SelectionKind::Degenerate, worst))
            }
            None => Some(direct(SelectionKind::Degenerate, 1.0)),
        }
    }
}

fn squared_distance(ratios: &[f64; Outcome::COUNT], goals: &[f64; Outcome::COUNT]) -> f64 {
    ratios
        .iter()
        .zip(goals)
        .map(|(r, g)| (r - g) * (r - g))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Vocabulary;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn selector_for(vocab: &Vocabulary) -> GuessSelector {
        GuessSelector::new(Arc::new(FragmentPool::new(vocab)))
    }

    fn fixed(weights: [f64; Outcome::COUNT], threshold: usize) -> HeuristicParams {
        HeuristicParams {
            goal_weights: weights,
            use_goal_weights_prob: 1.0,
            count_ones_threshold: threshold,
        }
    }

    #[test]
    fn test_small_subset_guesses_member() {
        let vocab = Vocabulary::from_entries(["cat", "car", "can"]).unwrap();
        let selector = selector_for(&vocab);
        let mut rng = StdRng::seed_from_u64(1);

        let selection = selector
            .select(&vocab.word_set(), &HeuristicParams::default(), &mut rng)
            .unwrap();
        assert_eq!(selection.kind, SelectionKind::Direct);
        assert_eq!(selection.guess, "can");
    }

    #[test]
    fn test_empty_subset() {
        let selector = GuessSelector::new(Arc::new(FragmentPool::from_fragments(["a"])));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(
            selector
                .select(&WordSet::new(), &HeuristicParams::default(), &mut rng)
                .is_none()
        );
    }

    #[test]
    fn test_scored_prefers_goal_profile() {
        let vocab = Vocabulary::from_entries(["ab", "ac", "bd", "be", "cf", "cg"]).unwrap();
        let selector = GuessSelector::new(Arc::new(FragmentPool::from_fragments(["a", "b", "x"])));
        let mut rng = StdRng::seed_from_u64(1);

        // "a" leaves two thirds absent and one third as prefix, matching the
        // goal exactly. "b" also ends "ab" and misses the profile.
        let params = fixed([2.0 / 3.0, 0.0, 1.0 / 3.0, 0.0, 0.0], 0);
        let selection = selector.select(&vocab.word_set(), &params, &mut rng).unwrap();
        assert_eq!(selection.kind, SelectionKind::Scored);
        assert_eq!(selection.guess, "a");
        assert!((selection.worst_ratio - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_shortcut_takes_first_qualifying() {
        // "b": absent {xyz}, contains {abc}, prefix {bcd}, suffix {cab}.
        let vocab = Vocabulary::from_entries(["abc", "bcd", "cab", "xyz"]).unwrap();
        let selector = GuessSelector::new(Arc::new(FragmentPool::from_fragments(["z", "b"])));
        let mut rng = StdRng::seed_from_u64(1);

        let selection = selector
            .select(&vocab.word_set(), &fixed([1.0, 0.0, 0.0, 0.0, 0.0], 5), &mut rng)
            .unwrap();
        assert_eq!(selection.kind, SelectionKind::Shortcut);
        assert_eq!(selection.guess, "b");

        // Below the threshold the shortcut is disabled and scoring decides.
        let selection = selector
            .select(&vocab.word_set(), &fixed([1.0, 0.0, 0.0, 0.0, 0.0], 4), &mut rng)
            .unwrap();
        assert_eq!(selection.kind, SelectionKind::Scored);
        assert_eq!(selection.guess, "z");
    }

    #[test]
    fn test_degenerate_falls_back_to_member() {
        let vocab = Vocabulary::from_entries(["aaa", "aab", "aac", "aad"]).unwrap();
        let selector = GuessSelector::new(Arc::new(FragmentPool::from_fragments(["q"])));
        let mut rng = StdRng::seed_from_u64(1);

        let selection = selector
            .select(&vocab.word_set(), &HeuristicParams::default(), &mut rng)
            .unwrap();
        assert_eq!(selection.kind, SelectionKind::Degenerate);
        assert_eq!(selection.guess, "aaa");
    }

    #[test]
    fn test_empty_pool_is_degenerate() {
        let vocab = Vocabulary::from_entries(["ab", "cd", "ef", "gh"]).unwrap();
        let pool = FragmentPool::from_fragments(Vec::<String>::new());
        let selector = GuessSelector::new(Arc::new(pool));
        let mut rng = StdRng::seed_from_u64(1);

        let selection = selector
            .select(&vocab.word_set(), &HeuristicParams::default(), &mut rng)
            .unwrap();
        assert_eq!(selection.kind, SelectionKind::Degenerate);
    }
}
