use thiserror::Error;

use crate::node::Id;
use crate::tree::RbTree;

/// A broken red-black or link invariant, reported by [`RbTree::validate`].
///
/// `depth` is counted from the root, which sits at depth 0.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("root is red")]
    RedRoot,

    #[error("root has a parent link")]
    RootHasParent,

    #[error("red node at depth {depth} has a red child")]
    RedRedEdge { depth: usize },

    #[error("black height differs below depth {depth}: {left} on the left, {right} on the right")]
    BlackHeightMismatch {
        depth: usize,
        left: usize,
        right: usize,
    },

    #[error("key at depth {depth} breaks the search order")]
    OutOfOrder { depth: usize },

    #[error("child at depth {depth} does not link back to its parent")]
    BrokenParentLink { depth: usize },

    #[error("{reachable} nodes reachable from the root, {stored} stored")]
    Unreachable { reachable: usize, stored: usize },
}

impl<K: Ord, V> RbTree<K, V> {
    /// Walks the whole tree and checks every red-black property, the search
    /// order, and the parent back-links.
    pub fn validate(&self) -> Result<(), Violation> {
        if self.root.is_nil() {
            return match self.len() {
                0 => Ok(()),
                stored => Err(Violation::Unreachable {
                    reachable: 0,
                    stored,
                }),
            };
        }
        if self.nodes.is_red(self.root) {
            return Err(Violation::RedRoot);
        }
        if !self.nodes.parent(self.root).is_nil() {
            return Err(Violation::RootHasParent);
        }

        let mut reachable = 0;
        self.check(self.root, None, None, 0, &mut reachable)?;
        if reachable != self.len() {
            return Err(Violation::Unreachable {
                reachable,
                stored: self.len(),
            });
        }
        Ok(())
    }

    /// Returns the black height of the subtree at `x`, nil leaves excluded.
    fn check(
        &self,
        x: Id,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        reachable: &mut usize,
    ) -> Result<usize, Violation> {
        if x.is_nil() {
            return Ok(0);
        }
        *reachable += 1;

        let node = self.nodes.node(x);
        if lower.is_some_and(|lo| node.key <= *lo) || upper.is_some_and(|hi| node.key >= *hi) {
            return Err(Violation::OutOfOrder { depth });
        }

        let (left, right) = (node.left(), node.right());
        for child in [left, right] {
            if child.is_nil() {
                continue;
            }
            if self.nodes.parent(child) != x {
                return Err(Violation::BrokenParentLink { depth: depth + 1 });
            }
            if node.is_red() && self.nodes.is_red(child) {
                return Err(Violation::RedRedEdge { depth });
            }
        }

        let left_bh = self.check(left, lower, Some(&node.key), depth + 1, reachable)?;
        let right_bh = self.check(right, Some(&node.key), upper, depth + 1, reachable)?;
        if left_bh != right_bh {
            return Err(Violation::BlackHeightMismatch {
                depth,
                left: left_bh,
                right: right_bh,
            });
        }
        Ok(left_bh + usize::from(node.is_black()))
    }
}
