//! Per-worker local search: a seeding phase followed by hill climbing.

use std::fmt;

use rand::prelude::*;

use super::mutation::{Mutation, regenerate_subtrees, swap_with_child};
use crate::compute::{EvaluationError, TreeBuilder, average_guesses};
use crate::schema::{ConfigError, HeuristicParams, SearchConfig};
use crate::tree::GuessNode;

/// Where a search currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// Nothing built yet.
    #[default]
    Idle,
    /// Building seed trees; `round` is the next round to run.
    Seeding { round: usize },
    /// Hill climbing on the best tree.
    Refining,
    /// An evaluation failed. Terminal until the search is dropped.
    Failed,
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchPhase::Idle => f.write_str("idle"),
            SearchPhase::Seeding { round } => write!(f, "seeding round {}", round + 1),
            SearchPhase::Refining => f.write_str("refining"),
            SearchPhase::Failed => f.write_str("failed"),
        }
    }
}

/// Counters over the lifetime of a search, cleared on reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub seeding_rounds: usize,
    pub iterations: u64,
    pub accepted: u64,
    pub rejected: u64,
}

/// What one [`LocalSearch::step`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The best tree was replaced. `previous` is infinite for the first tree.
    Improved { previous: f64, current: f64 },
    /// The best tree was kept.
    Unchanged,
    /// The search has failed and does no more work.
    Halted,
}

/// Seeding plus strict-improvement local search over whole guess trees.
pub struct LocalSearch {
    builder: TreeBuilder,
    config: SearchConfig,
    rng: StdRng,
    phase: SearchPhase,
    best: Option<GuessNode>,
    best_average: f64,
    /// Parameters for swap rebuilds, taken from the latest regeneration.
    params: HeuristicParams,
    stats: SearchStats,
}

impl LocalSearch {
    /// Create an idle search. A `None` seed draws one from entropy.
    ///
    /// `config` is validated here since the samplers panic on empty weight
    /// ranges and out-of-range probabilities.
    pub fn new(
        builder: TreeBuilder,
        config: SearchConfig,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            builder,
            config,
            rng,
            phase: SearchPhase::Idle,
            best: None,
            best_average: f64::INFINITY,
            params: HeuristicParams::default(),
            stats: SearchStats::default(),
        })
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn best_tree(&self) -> Option<&GuessNode> {
        self.best.as_ref()
    }

    /// Average guesses of the best tree, infinite before the first one.
    pub fn best_average(&self) -> f64 {
        self.best_average
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Drop the best tree and start over from `Idle`.
    pub fn reset(&mut self) {
        self.phase = SearchPhase::Idle;
        self.best = None;
        self.best_average = f64::INFINITY;
        self.params = HeuristicParams::default();
        self.stats = SearchStats::default();
    }

    /// Run one seeding round or one refining iteration.
    ///
    /// An evaluation failure moves the search to [`SearchPhase::Failed`];
    /// after that every step returns [`StepOutcome::Halted`].
    pub fn step(&mut self) -> Result<StepOutcome, EvaluationError> {
        let result = match self.phase {
            SearchPhase::Failed => return Ok(StepOutcome::Halted),
            SearchPhase::Idle => {
                self.phase = SearchPhase::Seeding { round: 0 };
                self.seed_round(0)
            }
            SearchPhase::Seeding { round } => self.seed_round(round),
            SearchPhase::Refining => self.refine(),
        };
        if result.is_err() {
            self.phase = SearchPhase::Failed;
        }
        result
    }

    fn seed_round(&mut self, round: usize) -> Result<StepOutcome, EvaluationError> {
        let params = HeuristicParams::seeding(
            &mut self.rng,
            self.config.seeding_weight_range,
            self.config.seeding_threshold_bound,
        );
        let built = self
            .builder
            .build_best_of(self.config.seeding_trials, &params, &mut self.rng)?;

        self.stats.seeding_rounds += 1;
        self.phase = if round + 1 >= self.config.seeding_rounds {
            SearchPhase::Refining
        } else {
            SearchPhase::Seeding { round: round + 1 }
        };

        match built {
            Some((tree, average)) if average < self.best_average => Ok(self.accept(tree, average)),
            _ => Ok(StepOutcome::Unchanged),
        }
    }

    fn refine(&mut self) -> Result<StepOutcome, EvaluationError> {
        let Some(best) = &self.best else {
            // Nothing to refine; seed again.
            self.phase = SearchPhase::Seeding { round: 0 };
            return Ok(StepOutcome::Unchanged);
        };
        let mut candidate = best.clone();
        self.stats.iterations += 1;

        let mutation = Mutation::choose(&mut self.rng, &self.config);
        match mutation {
            Mutation::Regenerate { count } => {
                if let Some(params) = regenerate_subtrees(
                    &self.builder,
                    &mut candidate,
                    count,
                    self.config.refining_threshold_bound,
                    &mut self.rng,
                ) {
                    self.params = params;
                }
            }
            Mutation::Swap => {
                if !swap_with_child(&self.builder, &mut candidate, &self.params, &mut self.rng) {
                    self.stats.rejected += 1;
                    return Ok(StepOutcome::Unchanged);
                }
            }
        }

        let average = average_guesses(&candidate, self.builder.vocabulary().entries())?;
        if average < self.best_average {
            log::trace!("{} improved {:.4} -> {:.4}", mutation, self.best_average, average);
            Ok(self.accept(candidate, average))
        } else {
            self.stats.rejected += 1;
            Ok(StepOutcome::Unchanged)
        }
    }

    /// Skip seeding and refine `tree`, taking `average` as its score.
    #[cfg(test)]
    pub(crate) fn with_best(mut self, tree: GuessNode, average: f64) -> Self {
        self.best = Some(tree);
        self.best_average = average;
        self.phase = SearchPhase::Refining;
        self
    }

    fn accept(&mut self, tree: GuessNode, average: f64) -> StepOutcome {
        let previous = self.best_average;
        self.best = Some(tree);
        self.best_average = average;
        self.stats.accepted += 1;
        StepOutcome::Improved {
            previous,
            current: average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{FragmentPool, GuessSelector};
    use crate::schema::Vocabulary;
    use std::sync::Arc;

    const WORDS: &[&str] = &[
        "haus", "maus", "baum", "raum", "traum", "bauer", "mauer", "sauer", "hund", "mund",
        "rund", "bund", "katze", "tatze", "satz", "platz", "apfel", "zapfen", "käse", "öl",
    ];

    fn search(config: SearchConfig, seed: u64) -> LocalSearch {
        let vocab = Arc::new(Vocabulary::from_entries(WORDS.iter().copied()).unwrap());
        let pool = Arc::new(FragmentPool::new(&vocab));
        let builder = TreeBuilder::new(vocab, GuessSelector::new(pool));
        LocalSearch::new(builder, config, Some(seed)).unwrap()
    }

    fn small_config() -> SearchConfig {
        SearchConfig {
            seeding_rounds: 3,
            seeding_trials: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_phases_progress_through_seeding() {
        let mut search = search(small_config(), 1);
        assert_eq!(search.phase(), SearchPhase::Idle);
        assert!(search.best_average().is_infinite());

        let first = search.step().unwrap();
        assert!(matches!(first, StepOutcome::Improved { previous, .. } if previous.is_infinite()));
        assert_eq!(search.phase(), SearchPhase::Seeding { round: 1 });

        search.step().unwrap();
        search.step().unwrap();
        assert_eq!(search.phase(), SearchPhase::Refining);
        assert_eq!(search.stats().seeding_rounds, 3);
        assert!(search.best_tree().is_some());
    }

    #[test]
    fn test_best_average_never_increases() {
        let mut search = search(small_config(), 2);
        let mut last = f64::INFINITY;
        for _ in 0..60 {
            search.step().unwrap();
            assert!(search.best_average() <= last);
            last = search.best_average();
        }

        let stats = search.stats();
        assert_eq!(stats.iterations, 57);
        assert!(stats.rejected <= stats.iterations);
        assert!(stats.accepted >= 1);
    }

    #[test]
    fn test_best_tree_matches_reported_average() {
        let mut search = search(small_config(), 3);
        for _ in 0..30 {
            search.step().unwrap();
        }
        let tree = search.best_tree().unwrap();
        let average = average_guesses(tree, WORDS).unwrap();
        assert_eq!(average, search.best_average());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut search = search(small_config(), 4);
        for _ in 0..5 {
            search.step().unwrap();
        }
        search.reset();
        assert_eq!(search.phase(), SearchPhase::Idle);
        assert!(search.best_tree().is_none());
        assert!(search.best_average().is_infinite());
        assert_eq!(search.stats(), SearchStats::default());
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let mut a = search(small_config(), 9);
        let mut b = search(small_config(), 9);
        for _ in 0..20 {
            a.step().unwrap();
            b.step().unwrap();
        }
        assert_eq!(a.best_average(), b.best_average());
        assert_eq!(a.best_tree(), b.best_tree());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let vocab = Arc::new(Vocabulary::from_entries(WORDS.iter().copied()).unwrap());
        let pool = Arc::new(FragmentPool::new(&vocab));
        let builder = TreeBuilder::new(vocab, GuessSelector::new(pool));

        let config = SearchConfig {
            seeding_weight_range: (0.4, 0.1),
            ..Default::default()
        };
        assert!(matches!(
            LocalSearch::new(builder.clone(), config, None),
            Err(ConfigError::InvalidWeightRange { .. })
        ));

        let config = SearchConfig {
            swap_probability: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            LocalSearch::new(builder, config, None),
            Err(ConfigError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_evaluation_failure_halts() {
        let config = SearchConfig {
            swap_probability: 0.0,
            ..small_config()
        };
        // A lone leaf resolves only itself, whatever gets regenerated.
        let mut search = search(config, 5).with_best(GuessNode::leaf("haus"), 1.0);

        let err = search.step().unwrap_err();
        assert_eq!(
            err,
            EvaluationError::UnresolvedWord {
                word: "maus".to_string()
            }
        );
        assert_eq!(search.phase(), SearchPhase::Failed);
        assert_eq!(search.best_average(), 1.0);

        let stats = search.stats();
        assert_eq!(search.step().unwrap(), StepOutcome::Halted);
        assert_eq!(search.step().unwrap(), StepOutcome::Halted);
        assert_eq!(search.phase(), SearchPhase::Failed);
        assert_eq!(search.stats(), stats);
    }
}
