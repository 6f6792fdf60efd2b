//! Parameters steering the heuristic guess selector.

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use super::Outcome;

/// Parameters for a single run of the heuristic selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicParams {
    /// Ideal share of the remaining words per outcome bucket, in slot order.
    #[serde(default = "default_goal_weights")]
    pub goal_weights: [f64; Outcome::COUNT],
    /// Probability of using `goal_weights` verbatim for a decision. Otherwise
    /// five uniform weights in `[0, 1)` are drawn for that decision only.
    #[serde(default = "default_use_goal_weights_prob")]
    pub use_goal_weights_prob: f64,
    /// Subsets smaller than this accept the first fragment that leaves at
    /// least three buckets with exactly one word.
    #[serde(default = "default_count_ones_threshold")]
    pub count_ones_threshold: usize,
}

impl Default for HeuristicParams {
    fn default() -> Self {
        Self {
            goal_weights: default_goal_weights(),
            use_goal_weights_prob: default_use_goal_weights_prob(),
            count_ones_threshold: default_count_ones_threshold(),
        }
    }
}

fn default_goal_weights() -> [f64; Outcome::COUNT] {
    [0.2; Outcome::COUNT]
}
fn default_use_goal_weights_prob() -> f64 {
    0.2
}
fn default_count_ones_threshold() -> usize {
    5
}

impl HeuristicParams {
    /// Parameters for building a seed tree: weights drawn from
    /// `weight_range`, always used verbatim.
    pub fn seeding<R: Rng + ?Sized>(
        rng: &mut R,
        weight_range: (f64, f64),
        threshold_bound: usize,
    ) -> Self {
        let weights = Uniform::new(weight_range.0, weight_range.1);
        Self {
            goal_weights: sample_weights(rng, &weights),
            use_goal_weights_prob: 1.0,
            count_ones_threshold: rng.gen_range(0..threshold_bound.max(1)),
        }
    }

    /// Fully random parameters used when regenerating a subtree.
    pub fn refining<R: Rng + ?Sized>(rng: &mut R, threshold_bound: usize) -> Self {
        Self {
            goal_weights: random_goal_weights(rng),
            use_goal_weights_prob: rng.r#gen::<f64>(),
            count_ones_threshold: rng.gen_range(0..threshold_bound.max(1)),
        }
    }

    /// Goal weights for one decision, honouring `use_goal_weights_prob`.
    pub fn decision_weights<R: Rng + ?Sized>(&self, rng: &mut R) -> [f64; Outcome::COUNT] {
        if rng.r#gen::<f64>() < self.use_goal_weights_prob {
            self.goal_weights
        } else {
            random_goal_weights(rng)
        }
    }
}

/// Five independent uniform weights in `[0, 1)`.
pub fn random_goal_weights<R: Rng + ?Sized>(rng: &mut R) -> [f64; Outcome::COUNT] {
    sample_weights(rng, &Uniform::new(0.0, 1.0))
}

fn sample_weights<R: Rng + ?Sized>(rng: &mut R, dist: &Uniform<f64>) -> [f64; Outcome::COUNT] {
    std::array::from_fn(|_| dist.sample(rng))
}
