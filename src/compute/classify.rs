//! The five-way relation between a fragment and a word.

use crate::schema::{Outcome, WordSet};

/// Classify how `fragment` relates to `word`.
///
/// A word equal to the fragment is a terminal match for callers; passed
/// through here it classifies as [`Outcome::PrefixAndSuffix`].
#[inline]
pub fn classify(word: &str, fragment: &str) -> Outcome {
    if !word.contains(fragment) {
        return Outcome::Absent;
    }
    match (word.starts_with(fragment), word.ends_with(fragment)) {
        (false, false) => Outcome::ContainsOnly,
        (true, false) => Outcome::PrefixOnly,
        (false, true) => Outcome::SuffixOnly,
        (true, true) => Outcome::PrefixAndSuffix,
    }
}

/// Split `words` into the five outcome buckets of `fragment`.
///
/// A word equal to `fragment` is resolved by the guess itself and lands in
/// no bucket. Equality is by value, so a vocabulary copy of the word is
/// excluded just like the fragment instance.
pub fn partition<'a>(words: &WordSet<'a>, fragment: &str) -> [WordSet<'a>; Outcome::COUNT] {
    let mut buckets: [WordSet<'a>; Outcome::COUNT] = Default::default();
    for &word in words {
        if word == fragment {
            continue;
        }
        buckets[classify(word, fragment).index()].insert(word);
    }
    buckets
}

/// Bucket sizes of `fragment` over `words`, counting a self match like any
/// other word.
#[inline]
pub fn outcome_counts<'a, I>(words: I, fragment: &str) -> [usize; Outcome::COUNT]
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = [0; Outcome::COUNT];
    for word in words {
        counts[classify(word, fragment).index()] += 1;
    }
    counts
}
