//! Tree mutation operators for the refining phase.
//!
//! Both operators edit a tree in place and keep it resolving every word it
//! resolved before: every rebuilt subtree is built over the full set of words
//! that reach it.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::compute::TreeBuilder;
use crate::schema::{HeuristicParams, Outcome, SearchConfig};
use crate::tree::GuessNode;

/// A refining move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Rebuild `count` randomly chosen subtrees with fresh parameters.
    Regenerate { count: usize },
    /// Move a child's guess up into its parent and rebuild the parent's
    /// children.
    Swap,
}

impl Mutation {
    /// Pick an operator: swap with `swap_probability`, otherwise a
    /// regeneration of `1..=max_regenerations` subtrees.
    pub fn choose<R: Rng + ?Sized>(rng: &mut R, config: &SearchConfig) -> Self {
        if rng.gen_bool(config.swap_probability) {
            Mutation::Swap
        } else {
            Mutation::Regenerate {
                count: rng.gen_range(1..=config.max_regenerations.max(1)),
            }
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Regenerate { count } => write!(f, "regenerate x{}", count),
            Mutation::Swap => f.write_str("swap"),
        }
    }
}

/// Regenerate `count` uniformly chosen subtrees, leaves included, each with
/// freshly drawn refining parameters.
///
/// Returns the parameters of the last rebuild.
pub fn regenerate_subtrees<R: Rng + ?Sized>(
    builder: &TreeBuilder,
    tree: &mut GuessNode,
    count: usize,
    threshold_bound: usize,
    rng: &mut R,
) -> Option<HeuristicParams> {
    let mut last = None;
    for _ in 0..count {
        let n = rng.gen_range(0..tree.node_count());
        let params = HeuristicParams::refining(rng, threshold_bound);
        if let Some(node) = tree.nth_node_mut(n, true) {
            builder.regenerate(node, &params, rng);
        }
        last = Some(params);
    }
    last
}

/// Exchange the guess of a random internal node with one of its children and
/// rebuild that node's children under `params`.
///
/// Returns `false`, leaving the tree untouched, when it has no internal node.
pub fn swap_with_child<R: Rng + ?Sized>(
    builder: &TreeBuilder,
    tree: &mut GuessNode,
    params: &HeuristicParams,
    rng: &mut R,
) -> bool {
    let internal = tree.internal_count();
    if internal == 0 {
        return false;
    }
    let Some(node) = tree.nth_node_mut(rng.gen_range(0..internal), false) else {
        return false;
    };

    let present: Vec<Outcome> = node.children().map(|(outcome, _)| outcome).collect();
    let Some(&outcome) = present.choose(rng) else {
        return false;
    };
    let Some(child_guess) = node.child(outcome).map(|c| c.guess.clone()) else {
        return false;
    };

    let parent_guess = std::mem::replace(&mut node.guess, child_guess);
    if let Some(child) = node.child_mut(outcome) {
        child.guess = parent_guess;
    }
    builder.rebuild_children(node, params, rng);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{FragmentPool, GuessSelector, average_guesses};
    use crate::schema::Vocabulary;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    const WORDS: &[&str] = &[
        "haus", "maus", "baum", "raum", "traum", "bauer", "mauer", "sauer", "hund", "mund",
        "rund", "bund", "katze", "tatze", "satz", "platz",
    ];

    fn setup() -> (TreeBuilder, GuessNode, StdRng) {
        let vocab = Arc::new(Vocabulary::from_entries(WORDS.iter().copied()).unwrap());
        let pool = Arc::new(FragmentPool::new(&vocab));
        let builder = TreeBuilder::new(vocab, GuessSelector::new(pool));
        let mut rng = StdRng::seed_from_u64(21);
        let tree = builder
            .build_vocabulary(&HeuristicParams::default(), &mut rng)
            .unwrap();
        (builder, tree, rng)
    }

    #[test]
    fn test_choose_respects_probability() {
        let mut rng = StdRng::seed_from_u64(1);
        let always_swap = SearchConfig {
            swap_probability: 1.0,
            ..Default::default()
        };
        assert_eq!(Mutation::choose(&mut rng, &always_swap), Mutation::Swap);

        let never_swap = SearchConfig {
            swap_probability: 0.0,
            max_regenerations: 3,
            ..Default::default()
        };
        for _ in 0..50 {
            match Mutation::choose(&mut rng, &never_swap) {
                Mutation::Regenerate { count } => assert!((1..=3).contains(&count)),
                Mutation::Swap => panic!("swap drawn with probability 0"),
            }
        }
    }

    #[test]
    fn test_regenerate_keeps_tree_valid() {
        let (builder, mut tree, mut rng) = setup();
        for _ in 0..20 {
            let params = regenerate_subtrees(&builder, &mut tree, 4, 25, &mut rng);
            assert!(params.is_some());
            assert!(average_guesses(&tree, builder.vocabulary().entries()).is_ok());
        }
    }

    #[test]
    fn test_swap_keeps_tree_valid() {
        let (builder, mut tree, mut rng) = setup();
        let params = HeuristicParams::default();
        for _ in 0..20 {
            assert!(swap_with_child(&builder, &mut tree, &params, &mut rng));
            assert!(average_guesses(&tree, builder.vocabulary().entries()).is_ok());
        }
    }

    #[test]
    fn test_swap_on_leaf_is_noop() {
        let (builder, _, mut rng) = setup();
        let mut leaf = GuessNode::leaf("haus");
        assert!(!swap_with_child(
            &builder,
            &mut leaf,
            &HeuristicParams::default(),
            &mut rng
        ));
        assert_eq!(leaf, GuessNode::leaf("haus"));
    }
}
