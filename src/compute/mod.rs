//! Compute module - Tree construction, evaluation and search.

mod builder;
mod classify;
pub mod evaluate;
mod fragments;
mod select;

pub mod search;

pub use builder::*;
pub use classify::*;
pub use evaluate::{EvaluationError, EvaluationStats, average_guesses, evaluate, simulate};
pub use fragments::*;
pub use select::*;
