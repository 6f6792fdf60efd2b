//! The word list a guess tree is generated for.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

/// A set of borrowed words. Ordered so that "first member" is well defined.
pub type WordSet<'a> = BTreeSet<&'a str>;

/// Immutable vocabulary: the unique words plus the ordered entries as loaded.
///
/// Entries keep duplicates. The evaluator averages over entries, so a word
/// listed twice counts twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    entries: Vec<String>,
    unique: BTreeSet<String>,
}

impl Vocabulary {
    /// Build a vocabulary from words in load order.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        if entries.is_empty() {
            return Err(VocabularyError::Empty);
        }
        if let Some(pos) = entries
            .iter()
            .position(|w| w.is_empty() || w.contains(char::is_whitespace))
        {
            return Err(VocabularyError::InvalidWord {
                line: pos,
                word: entries[pos].clone(),
            });
        }
        let unique = entries.iter().cloned().collect();
        Ok(Self { entries, unique })
    }

    /// Parse the word file format: the first line is a header (usually the
    /// word count) and is skipped, every following non-blank line is a word.
    pub fn parse(text: &str) -> Result<Self, VocabularyError> {
        Self::from_entries(
            text.lines()
                .skip(1)
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    /// Load and parse a word file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VocabularyError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Entries in load order, duplicates preserved.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Unique words in sorted order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.unique.iter().map(String::as_str)
    }

    /// All unique words as a borrowed set.
    pub fn word_set(&self) -> WordSet<'_> {
        self.words().collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.unique.contains(word)
    }

    /// Look up the vocabulary's own copy of `word`.
    pub fn get(&self, word: &str) -> Option<&str> {
        self.unique.get(word).map(String::as_str)
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct words.
    pub fn unique_len(&self) -> usize {
        self.unique.len()
    }
}

/// Vocabulary loading errors.
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("Failed to read word list: {0}")]
    Io(#[from] io::Error),
    #[error("Word list contains no words")]
    Empty,
    #[error("Entry {line} ({word:?}) is empty or contains whitespace")]
    InvalidWord { line: usize, word: String },
}
