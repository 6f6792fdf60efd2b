//! Candidate fragment pool for the heuristic selector.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::schema::Vocabulary;

/// Letters fragments are drawn from: the Latin alphabet plus German umlauts.
pub const ALPHABET: [char; 29] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ü',
];

/// Longest fragment considered.
pub const MAX_FRAGMENT_LEN: usize = 3;

/// Fragments of length 1 to 3 that occur in more than one vocabulary word.
///
/// Computed once per vocabulary over the full word list and reused at every
/// node, even where a fragment no longer splits the local subset.
#[derive(Debug, Clone)]
pub struct FragmentPool {
    fragments: Vec<String>,
}

impl FragmentPool {
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let words: Vec<&str> = vocabulary.words().collect();
        let fragments: Vec<String> = candidate_fragments()
            .into_par_iter()
            .filter(|fragment| {
                words
                    .iter()
                    .filter(|w| w.contains(fragment.as_str()))
                    .take(2)
                    .count()
                    > 1
            })
            .collect();

        log::debug!(
            "Fragment pool: {} useful fragments for {} words",
            fragments.len(),
            words.len()
        );
        Self { fragments }
    }

    /// Build a pool from an explicit fragment list, kept in the given order.
    pub fn from_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }

    /// Fragments in scan order (sorted for pools built from a vocabulary).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Every distinct fragment of length 1..=3 over [`ALPHABET`], sorted.
fn candidate_fragments() -> Vec<String> {
    let mut fragments = BTreeSet::new();
    let mut prefixes = vec![String::new()];
    for _ in 0..MAX_FRAGMENT_LEN {
        prefixes = prefixes
            .iter()
            .flat_map(|prefix| {
                ALPHABET.iter().map(move |&c| {
                    let mut next = prefix.clone();
                    next.push(c);
                    next
                })
            })
            .collect();
        fragments.extend(prefixes.iter().cloned());
    }
    fragments.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_count() {
        let n = ALPHABET.len();
        assert_eq!(candidate_fragments().len(), n + n * n + n * n * n);
    }

    #[test]
    fn test_pool_keeps_shared_fragments_only() {
        let vocab = Vocabulary::from_entries(["haus", "maus", "baum"]).unwrap();
        let pool = FragmentPool::new(&vocab);
        let fragments: Vec<&str> = pool.iter().collect();

        assert!(fragments.contains(&"aus"));
        assert!(fragments.contains(&"au"));
        assert!(fragments.contains(&"a"));
        // Only in "baum".
        assert!(!fragments.contains(&"b"));
        // Only in "haus".
        assert!(!fragments.contains(&"hau"));
        assert!(fragments.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_duplicate_entries_do_not_count_twice() {
        let vocab = Vocabulary::from_entries(["xyz", "xyz", "abc"]).unwrap();
        let pool = FragmentPool::new(&vocab);
        assert!(pool.is_empty());
    }
}
