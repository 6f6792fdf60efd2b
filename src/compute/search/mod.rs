//! Parallel local search for low-average guess trees.
//!
//! # Overview
//!
//! - **Optimizer** (`optimizer`): per-worker seeding and hill climbing
//! - **Mutations** (`mutation`): subtree regeneration and parent/child swap
//! - **Workers** (`worker`): one thread per search, controlled by commands
//! - **Coordinator** (`coordinator`): start/pause, checkpoints, global best
//!   and restarts across a fixed pool of workers
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use word_guesser::compute::search::WorkerPool;
//! use word_guesser::schema::{GeneratorConfig, Vocabulary};
//!
//! let vocabulary = Arc::new(Vocabulary::load("words.txt")?);
//! let mut pool = WorkerPool::new(vocabulary, &GeneratorConfig::default())?;
//! pool.start()?;
//! std::thread::sleep(std::time::Duration::from_secs(10));
//! if let Some((worker, average)) = pool.global_best() {
//!     println!("worker {} leads with {:.3} guesses", worker, average);
//! }
//! pool.checkpoint_best("alg.txt".as_ref())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod coordinator;
mod mutation;
mod optimizer;
mod worker;

pub use coordinator::{PoolError, WorkerPool};
pub use mutation::{Mutation, regenerate_subtrees, swap_with_child};
pub use optimizer::{LocalSearch, SearchPhase, SearchStats, StepOutcome};
pub use worker::{CheckpointError, Command, WorkerHandle, WorkerStatus};
