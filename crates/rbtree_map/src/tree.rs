use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::node::{Colour, Id, Node, Nodes};

/// Ordered map backed by a red-black tree.
///
/// - Keys are unique; `put` on an existing key overwrites the value in place.
/// - Nodes live in an arena and are only released by [`RbTree::clear`].
/// - After every `put` the root is black, no red node has a red child, and all
///   root-to-nil paths carry the same number of black nodes.
pub struct RbTree<K, V> {
    pub(crate) nodes: Nodes<K, V>,
    pub(crate) root: Id,
}

/// Where a key lands relative to the current tree.
enum Slot {
    Occupied(Id),
    Empty,
    Left(Id),
    Right(Id),
}

impl<K, V> RbTree<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty map whose arena can hold `capacity` nodes without
    /// reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Nodes::with_capacity(capacity),
            root: Id::NIL,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_node_limit(limit: usize) -> Self {
        Self {
            nodes: Nodes::with_limit(limit),
            root: Id::NIL,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_nil()
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        debug!(len = self.nodes.len(), "clearing tree");
        self.nodes.clear();
        self.root = Id::NIL;
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = Vec::new();
        if !self.root.is_nil() {
            stack.push((self.root, 1));
        }
        while let Some((x, depth)) = stack.pop() {
            height = height.max(depth);
            for child in [self.nodes.left(x), self.nodes.right(x)] {
                if !child.is_nil() {
                    stack.push((child, depth + 1));
                }
            }
        }
        height
    }

    /// Black nodes on the leftmost root-to-nil path, root included.
    ///
    /// Equal for every path while the tree is valid; see [`RbTree::validate`].
    pub fn black_height(&self) -> usize {
        let mut count = 0;
        let mut cur = self.root;
        while !cur.is_nil() {
            if self.nodes.is_black(cur) {
                count += 1;
            }
            cur = self.nodes.left(cur);
        }
        count
    }

    /// Colour of the root, or `None` when empty.
    pub fn root_colour(&self) -> Option<Colour> {
        (!self.root.is_nil()).then(|| self.nodes.node(self.root).colour())
    }

    fn insert_fixup(&mut self, mut current: Id) {
        loop {
            if current == self.root {
                trace!(node = ?current, "fixup: paint root black");
                self.nodes.node_mut(current).set_black();
                return;
            }

            let parent = self.nodes.parent(current);
            if self.nodes.is_black(parent) {
                trace!(node = ?current, "fixup: parent is black");
                return;
            }

            // A red parent is never the root, so the grandparent exists.
            let grandparent = self.nodes.grandparent(current);
            debug_assert!(!grandparent.is_nil());

            let uncle = self.nodes.uncle(current);
            if self.nodes.is_red(uncle) {
                trace!(node = ?current, "fixup: red uncle, recolour");
                self.nodes.node_mut(parent).set_black();
                self.nodes.node_mut(uncle).set_black();
                self.nodes.node_mut(grandparent).set_red();
                current = grandparent;
                continue;
            }

            if self.nodes.is_left_child(parent) && self.nodes.is_right_child(current) {
                trace!(node = ?current, "fixup: left-right triangle");
                self.nodes.rotate_left(parent);
                current = parent;
            } else if self.nodes.is_right_child(parent) && self.nodes.is_left_child(current) {
                trace!(node = ?current, "fixup: right-left triangle");
                self.nodes.rotate_right(parent);
                current = parent;
            }

            self.fix_line(current);
            return;
        }
    }

    /// `current`, its parent and grandparent lie on a straight line with the
    /// parent red and the uncle black.
    fn fix_line(&mut self, current: Id) {
        let parent = self.nodes.parent(current);
        let grandparent = self.nodes.grandparent(current);
        self.nodes.node_mut(parent).set_black();
        self.nodes.node_mut(grandparent).set_red();

        let promoted = if self.nodes.is_left_child(current) {
            trace!(node = ?current, "fixup: left-left line");
            self.nodes.rotate_right(grandparent)
        } else {
            trace!(node = ?current, "fixup: right-right line");
            self.nodes.rotate_left(grandparent)
        };
        debug_assert_eq!(promoted, parent);

        if grandparent == self.root {
            debug!(old = ?grandparent, new = ?promoted, "rotation promoted a new root");
            self.root = promoted;
        }
    }
}

impl<K: Ord, V> RbTree<K, V> {
    fn locate<Q>(&self, key: &Q) -> Slot
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root;
        let mut slot = Slot::Empty;
        while !cur.is_nil() {
            let node = self.nodes.node(cur);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => {
                    slot = Slot::Left(cur);
                    cur = node.left();
                }
                Ordering::Greater => {
                    slot = Slot::Right(cur);
                    cur = node.right();
                }
                Ordering::Equal => return Slot::Occupied(cur),
            }
        }
        slot
    }

    fn find<Q>(&self, key: &Q) -> Option<Id>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.locate(key) {
            Slot::Occupied(x) => Some(x),
            _ => None,
        }
    }

    /// Inserts or overwrites `key`, returning the previous value.
    ///
    /// Fails with [`Error::InvalidArgument`] only when the arena cannot
    /// address another node; the map is left untouched in that case.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        let (parent, left) = match self.locate(&key) {
            Slot::Occupied(x) => {
                let old = std::mem::replace(&mut self.nodes.node_mut(x).value, value);
                return Ok(Some(old));
            }
            Slot::Empty => {
                self.root = self.nodes.alloc(Node::new(key, value, Colour::Black))?;
                return Ok(None);
            }
            Slot::Left(parent) => (parent, true),
            Slot::Right(parent) => (parent, false),
        };

        let x = self.nodes.alloc(Node::new(key, value, Colour::Red))?;
        if left {
            self.nodes.set_left(parent, x);
        } else {
            self.nodes.set_right(parent, x);
        }
        self.insert_fixup(x);
        Ok(None)
    }

    /// Fails with [`Error::NotFound`] when `key` is absent.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let x = self.find(key).ok_or(Error::NotFound)?;
        Ok(&self.nodes.node(x).value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let x = self.find(key).ok_or(Error::NotFound)?;
        Ok(&mut self.nodes.node_mut(x).value)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }
}

impl<K, V> Default for RbTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Display, V: fmt::Display> RbTree<K, V> {
    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, x: Id) -> fmt::Result {
        if x.is_nil() {
            return f.write_str("nil");
        }
        let node = self.nodes.node(x);
        write!(f, "{{ {}: ", node.colour())?;
        self.fmt_node(f, node.left())?;
        write!(f, " [{}, {}] ", node.key, node.value)?;
        self.fmt_node(f, node.right())?;
        f.write_str(" }")
    }
}

/// Structural snapshot: `RBT { BLACK: nil [1, a] nil } `.
impl<K: fmt::Display, V: fmt::Display> fmt::Display for RbTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RBT ")?;
        self.fmt_node(f, self.root)?;
        f.write_str(" ")
    }
}

struct DebugNode<'a, K, V> {
    tree: &'a RbTree<K, V>,
    id: Id,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for DebugNode<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id.is_nil() {
            return f.write_str("nil");
        }
        let node = self.tree.nodes.node(self.id);
        let child = |id| DebugNode {
            tree: self.tree,
            id,
        };
        f.debug_struct("Node")
            .field("colour", &node.colour())
            .field("key", &node.key)
            .field("value", &node.value)
            .field("left", &child(node.left()))
            .field("right", &child(node.right()))
            .finish()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RbTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RbTree")
            .field("len", &self.len())
            .field(
                "root",
                &DebugNode {
                    tree: self,
                    id: self.root,
                },
            )
            .finish()
    }
}
