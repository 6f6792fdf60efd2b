//! Word Guesser - Decision trees for a fragment word-guessing game.
//!
//! The game: a hidden word is drawn from a vocabulary. A player guesses a
//! word or a letter fragment and is told either that the guess is the word,
//! or how the fragment sits in it (absent, inside only, prefix only, suffix
//! only, or both prefix and suffix). This crate generates guess trees for
//! that game and searches for trees with a low average number of guesses.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Outcomes, vocabulary, heuristic parameters and run configuration
//! - `tree`: The guess tree, its text format and an interactive cursor
//! - `compute`: Classification, tree building, evaluation and parallel search
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use word_guesser::{
//!     compute::{FragmentPool, GuessSelector, TreeBuilder, average_guesses},
//!     schema::{HeuristicParams, Vocabulary},
//!     tree::codec,
//! };
//!
//! let vocabulary = Arc::new(Vocabulary::load("words.txt")?);
//! let pool = Arc::new(FragmentPool::new(&vocabulary));
//! let builder = TreeBuilder::new(vocabulary.clone(), GuessSelector::new(pool));
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! if let Some(tree) = builder.build_vocabulary(&HeuristicParams::default(), &mut rng) {
//!     let average = average_guesses(&tree, vocabulary.entries())?;
//!     println!("{} nodes, {:.3} guesses on average", tree.node_count(), average);
//!     codec::save(&tree, "alg.txt")?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compute;
pub mod schema;
pub mod tree;

// Re-export commonly used types
pub use compute::search::{LocalSearch, WorkerPool};
pub use compute::{TreeBuilder, average_guesses, simulate};
pub use schema::{GeneratorConfig, Outcome, Vocabulary};
pub use tree::{GuessNode, TreeCursor};
