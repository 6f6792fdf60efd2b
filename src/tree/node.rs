//! Decision tree node.

use crate::schema::{Outcome, Vocabulary, WordSet};

type Slot = Option<Box<GuessNode>>;

/// Where a node hangs: its parent's pre-order index and the slot it fills.
pub(crate) type ParentLink = Option<(usize, Outcome)>;

/// One decision point of a guess tree.
///
/// Each of the five child slots corresponds to an [`Outcome`] and owns its
/// subtree exclusively, so `Clone` is a full deep copy.
///
/// A degenerate vocabulary can produce a tree as deep as the vocabulary is
/// long, so every whole-tree walk (including `Clone`, `PartialEq` and `Drop`)
/// uses an explicit stack instead of recursion.
#[derive(Debug)]
pub struct GuessNode {
    /// Fragment (or whole word) guessed at this node.
    pub guess: String,
    children: [Slot; Outcome::COUNT],
}

/// A node seen during a pre-order walk.
pub(crate) struct Visit<'a> {
    pub node: &'a GuessNode,
    /// Root is depth 1.
    pub depth: usize,
    pub parent: ParentLink,
}

impl GuessNode {
    /// Create a leaf node.
    pub fn leaf(guess: impl Into<String>) -> Self {
        Self {
            guess: guess.into(),
            children: Default::default(),
        }
    }

    /// Child for an outcome, if present.
    #[inline]
    pub fn child(&self, outcome: Outcome) -> Option<&GuessNode> {
        self.children[outcome.index()].as_deref()
    }

    #[inline]
    pub fn child_mut(&mut self, outcome: Outcome) -> Option<&mut GuessNode> {
        self.children[outcome.index()].as_deref_mut()
    }

    /// Replace the child for an outcome, returning the old one.
    pub fn set_child(&mut self, outcome: Outcome, child: Option<GuessNode>) -> Option<GuessNode> {
        std::mem::replace(&mut self.children[outcome.index()], child.map(Box::new)).map(|b| *b)
    }

    /// Builder-style variant of [`set_child`](Self::set_child).
    pub fn with_child(mut self, outcome: Outcome, child: GuessNode) -> Self {
        self.set_child(outcome, Some(child));
        self
    }

    /// Present children with their outcomes, in slot order.
    pub fn children(&self) -> impl Iterator<Item = (Outcome, &GuessNode)> {
        Outcome::ALL
            .into_iter()
            .zip(self.children.iter())
            .filter_map(|(outcome, slot)| slot.as_deref().map(|child| (outcome, child)))
    }

    /// Drop every child.
    pub fn clear_children(&mut self) {
        self.children = Default::default();
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Total nodes in this subtree.
    pub fn node_count(&self) -> usize {
        self.preorder().len()
    }

    /// Nodes with at least one child.
    pub fn internal_count(&self) -> usize {
        self.preorder().iter().filter(|v| !v.node.is_leaf()).count()
    }

    pub fn leaf_count(&self) -> usize {
        self.node_count() - self.internal_count()
    }

    /// Longest root-to-leaf path, counted in nodes.
    pub fn depth(&self) -> usize {
        self.preorder().iter().map(|v| v.depth).max().unwrap_or(1)
    }

    /// Every node of this subtree in pre-order, children in slot order.
    pub(crate) fn preorder(&self) -> Vec<Visit<'_>> {
        let mut visits = Vec::new();
        let mut stack = vec![(self, 1, None)];
        while let Some((node, depth, parent)) = stack.pop() {
            let index = visits.len();
            visits.push(Visit {
                node,
                depth,
                parent,
            });
            // Reversed so the first slot is popped first.
            for (outcome, slot) in Outcome::ALL.into_iter().zip(&node.children).rev() {
                if let Some(child) = slot.as_deref() {
                    stack.push((child, depth + 1, Some((index, outcome))));
                }
            }
        }
        visits
    }

    /// Assemble a tree from nodes listed in pre-order with their parent
    /// links. Every parent must come before its children.
    pub(crate) fn from_preorder(mut nodes: Vec<(GuessNode, ParentLink)>) -> Option<GuessNode> {
        while nodes.len() > 1 {
            let (node, link) = nodes.pop()?;
            if let Some((index, outcome)) = link
                && let Some((parent, _)) = nodes.get_mut(index)
            {
                parent.set_child(outcome, Some(node));
            }
        }
        nodes.pop().map(|(root, _)| root)
    }

    /// The `n`-th node in pre-order, optionally skipping leaves.
    ///
    /// Together with [`node_count`](Self::node_count) and
    /// [`internal_count`](Self::internal_count) this gives uniform random
    /// node selection without materialising a node list.
    pub fn nth_node_mut(&mut self, n: usize, include_leaves: bool) -> Option<&mut GuessNode> {
        let path = {
            let visits = self.preorder();
            let (mut index, _) = visits
                .iter()
                .enumerate()
                .filter(|(_, v)| include_leaves || !v.node.is_leaf())
                .nth(n)?;
            let mut path = Vec::new();
            while let Some((parent, outcome)) = visits[index].parent {
                path.push(outcome);
                index = parent;
            }
            path
        };

        let mut node = self;
        for outcome in path.into_iter().rev() {
            node = node.child_mut(outcome)?;
        }
        Some(node)
    }

    /// Vocabulary words reachable below (and at) this node.
    ///
    /// Every word the tree resolves ends at a node guessing it, so the words
    /// reaching this node are exactly the vocabulary words among the guesses
    /// of its subtree.
    pub fn reachable_words<'v>(&self, vocabulary: &'v Vocabulary) -> WordSet<'v> {
        self.preorder()
            .iter()
            .filter_map(|v| vocabulary.get(&v.node.guess))
            .collect()
    }
}

impl Clone for GuessNode {
    fn clone(&self) -> Self {
        let nodes = self
            .preorder()
            .iter()
            .map(|v| (GuessNode::leaf(v.node.guess.clone()), v.parent))
            .collect();
        Self::from_preorder(nodes).unwrap_or_else(|| GuessNode::leaf(self.guess.clone()))
    }
}

impl PartialEq for GuessNode {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.preorder(), other.preorder());
        a.len() == b.len()
            && a
                .iter()
                .zip(&b)
                .all(|(x, y)| x.parent == y.parent && x.node.guess == y.node.guess)
    }
}

impl Eq for GuessNode {}

impl Drop for GuessNode {
    fn drop(&mut self) {
        let mut stack: Vec<Box<GuessNode>> =
            self.children.iter_mut().filter_map(Option::take).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.iter_mut().filter_map(Option::take));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> GuessNode {
        // "a" splits {cat, dog, hat}; guessing "cat" leaves "hat" as absent.
        GuessNode::leaf("a")
            .with_child(Outcome::Absent, GuessNode::leaf("dog"))
            .with_child(
                Outcome::ContainsOnly,
                GuessNode::leaf("cat").with_child(Outcome::Absent, GuessNode::leaf("hat")),
            )
    }

    #[test]
    fn test_counts() {
        let tree = sample_tree();
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.internal_count(), 2);
        assert_eq!(tree.leaf_count(), tree.node_count() - 2);
        assert_eq!(tree.depth(), 3);
        assert!(!tree.is_leaf());
        assert!(tree.child(Outcome::PrefixOnly).is_none());
    }

    #[test]
    fn test_nth_node_preorder() {
        let mut tree = sample_tree();
        let order: Vec<String> = (0..tree.node_count())
            .map(|i| tree.nth_node_mut(i, true).unwrap().guess.clone())
            .collect();
        assert_eq!(order, vec!["a", "dog", "cat", "hat"]);
        assert!(tree.nth_node_mut(4, true).is_none());

        assert_eq!(tree.nth_node_mut(0, false).unwrap().guess, "a");
        assert_eq!(tree.nth_node_mut(1, false).unwrap().guess, "cat");
        assert!(tree.nth_node_mut(2, false).is_none());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = sample_tree();
        let mut copy = original.clone();
        copy.nth_node_mut(3, true).unwrap().guess = "bat".to_string();
        copy.set_child(Outcome::Absent, None);

        assert_eq!(original.node_count(), 4);
        let hat = original
            .child(Outcome::ContainsOnly)
            .and_then(|cat| cat.child(Outcome::Absent))
            .unwrap();
        assert_eq!(hat.guess, "hat");
        assert_ne!(original, copy);
    }

    #[test]
    fn test_reachable_words() {
        let vocab = Vocabulary::from_entries(["cat", "dog", "hat"]).unwrap();
        let tree = sample_tree();
        let words: Vec<&str> = tree.reachable_words(&vocab).into_iter().collect();
        assert_eq!(words, vec!["cat", "dog", "hat"]);

        let cat = tree.child(Outcome::ContainsOnly).unwrap();
        let words: Vec<&str> = cat.reachable_words(&vocab).into_iter().collect();
        assert_eq!(words, vec!["cat", "hat"]);
    }

    #[test]
    fn test_equality_respects_slots() {
        let a = GuessNode::leaf("a").with_child(Outcome::Absent, GuessNode::leaf("b"));
        let b = GuessNode::leaf("a").with_child(Outcome::SuffixOnly, GuessNode::leaf("b"));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_ne!(a, GuessNode::leaf("a"));
    }

    fn chain(len: usize) -> GuessNode {
        let mut node = GuessNode::leaf(format!("w{}", len - 1));
        for i in (0..len - 1).rev() {
            node = GuessNode::leaf(format!("w{}", i)).with_child(Outcome::Absent, node);
        }
        node
    }

    #[test]
    fn test_deep_chain_walks_without_recursion() {
        let mut tree = chain(200_000);
        assert_eq!(tree.node_count(), 200_000);
        assert_eq!(tree.depth(), 200_000);
        assert_eq!(tree.internal_count(), 199_999);
        assert_eq!(tree.nth_node_mut(199_999, true).unwrap().guess, "w199999");

        let copy = tree.clone();
        assert!(copy == tree);
        drop(copy);
        drop(tree);
    }
}
