use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};

/// Handle of a node inside [`Nodes`].
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Id(u32);

impl Id {
    pub(crate) const NIL: Self = Self(u32::MAX);

    #[inline(always)]
    pub(crate) fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline(always)]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Largest number of nodes an arena can address; `u32::MAX` itself is `NIL`.
pub(crate) const MAX_NODES: usize = u32::MAX as usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colour {
    Red,
    Black,
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("RED"),
            Self::Black => f.write_str("BLACK"),
        }
    }
}

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    colour: Colour,
    left: Id,
    right: Id,
    parent: Id,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V, colour: Colour) -> Self {
        Self {
            key,
            value,
            colour,
            left: Id::NIL,
            right: Id::NIL,
            parent: Id::NIL,
        }
    }

    #[inline]
    pub(crate) fn colour(&self) -> Colour {
        self.colour
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.colour == Colour::Red
    }

    #[inline]
    pub(crate) fn is_black(&self) -> bool {
        self.colour == Colour::Black
    }

    #[inline]
    pub(crate) fn set_red(&mut self) {
        self.colour = Colour::Red;
    }

    #[inline]
    pub(crate) fn set_black(&mut self) {
        self.colour = Colour::Black;
    }

    #[inline]
    pub(crate) fn left(&self) -> Id {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Id {
        self.right
    }
}

/// Node arena. Children are addressed by handle; `parent` is a back handle
/// used only to walk upward during fixup.
///
/// The link invariant `left.parent == x && right.parent == x` is kept by
/// [`Nodes::set_left`] and [`Nodes::set_right`]; rotations are expressed only
/// through those two mutators.
pub(crate) struct Nodes<K, V> {
    nodes: Vec<Node<K, V>>,
    limit: usize,
}

impl<K, V> Nodes<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity.min(MAX_NODES)),
            limit: MAX_NODES,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_limit(limit: usize) -> Self {
        Self {
            nodes: Vec::new(),
            limit: limit.min(MAX_NODES),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Stores a detached node and returns its handle.
    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> Result<Id> {
        if self.nodes.len() >= self.limit {
            return Err(Error::invalid_argument(format!(
                "cannot construct node: arena already holds {} nodes",
                self.nodes.len()
            )));
        }
        let id = Id(self.nodes.len() as u32);
        self.nodes.push(node);
        Ok(id)
    }

    #[inline(always)]
    pub(crate) fn node(&self, x: Id) -> &Node<K, V> {
        debug_assert!(!x.is_nil());
        &self.nodes[x.idx()]
    }

    #[inline(always)]
    pub(crate) fn node_mut(&mut self, x: Id) -> &mut Node<K, V> {
        debug_assert!(!x.is_nil());
        &mut self.nodes[x.idx()]
    }

    #[inline]
    pub(crate) fn parent(&self, x: Id) -> Id {
        self.node(x).parent
    }

    #[inline]
    pub(crate) fn left(&self, x: Id) -> Id {
        self.node(x).left
    }

    #[inline]
    pub(crate) fn right(&self, x: Id) -> Id {
        self.node(x).right
    }

    /// `NIL` counts as black.
    #[inline]
    pub(crate) fn is_red(&self, x: Id) -> bool {
        !x.is_nil() && self.node(x).is_red()
    }

    #[inline]
    pub(crate) fn is_black(&self, x: Id) -> bool {
        !self.is_red(x)
    }

    pub(crate) fn set_left(&mut self, x: Id, child: Id) {
        let old = self.node(x).left;
        if !old.is_nil() && self.node(old).parent == x {
            self.node_mut(old).parent = Id::NIL;
        }
        self.node_mut(x).left = child;
        if !child.is_nil() {
            self.node_mut(child).parent = x;
        }
    }

    pub(crate) fn set_right(&mut self, x: Id, child: Id) {
        let old = self.node(x).right;
        if !old.is_nil() && self.node(old).parent == x {
            self.node_mut(old).parent = Id::NIL;
        }
        self.node_mut(x).right = child;
        if !child.is_nil() {
            self.node_mut(child).parent = x;
        }
    }

    pub(crate) fn is_left_child(&self, x: Id) -> bool {
        let p = self.parent(x);
        !p.is_nil() && self.node(p).left == x
    }

    pub(crate) fn is_right_child(&self, x: Id) -> bool {
        let p = self.parent(x);
        !p.is_nil() && self.node(p).right == x
    }

    pub(crate) fn grandparent(&self, x: Id) -> Id {
        let p = self.parent(x);
        if p.is_nil() { Id::NIL } else { self.parent(p) }
    }

    pub(crate) fn uncle(&self, x: Id) -> Id {
        let g = self.grandparent(x);
        if g.is_nil() {
            return Id::NIL;
        }
        let p = self.parent(x);
        let g = self.node(g);
        if g.left == p { g.right } else { g.left }
    }

    /// Rotates `x` with its left child and returns the new subtree top.
    ///
    /// The caller owns the root handle; this only relinks `x`'s former parent.
    pub(crate) fn rotate_right(&mut self, x: Id) -> Id {
        let l = self.left(x);
        debug_assert!(!l.is_nil(), "rotate_right requires a left child");
        trace!(node = x.0, promoted = l.0, "rotate right");
        let inner = self.right(l);
        self.set_left(x, inner);
        self.replace_in_parent(x, l);
        self.set_right(l, x);
        l
    }

    /// Rotates `x` with its right child and returns the new subtree top.
    pub(crate) fn rotate_left(&mut self, x: Id) -> Id {
        let r = self.right(x);
        debug_assert!(!r.is_nil(), "rotate_left requires a right child");
        trace!(node = x.0, promoted = r.0, "rotate left");
        let inner = self.left(r);
        self.set_right(x, inner);
        self.replace_in_parent(x, r);
        self.set_left(r, x);
        r
    }

    fn replace_in_parent(&mut self, x: Id, replacement: Id) {
        let p = self.parent(x);
        if p.is_nil() {
            return;
        }
        if self.node(p).left == x {
            self.set_left(p, replacement);
        } else {
            self.set_right(p, replacement);
        }
    }
}
