use std::borrow::Borrow;
use std::fmt;

use parking_lot::Mutex;

use crate::error::Result;
use crate::tree::RbTree;
use crate::validate::Violation;

/// [`RbTree`] behind a single mutex.
///
/// Every operation, reads included, takes the one lock and runs to
/// completion before releasing it, so no caller ever observes a tree in the
/// middle of a rebalance.
#[derive(Debug)]
pub struct RedBlackTree<K, V> {
    inner: Mutex<RbTree<K, V>>,
}

impl<K, V> RedBlackTree<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(RbTree::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn into_inner(self) -> RbTree<K, V> {
        self.inner.into_inner()
    }
}

impl<K: Ord, V> RedBlackTree<K, V> {
    pub fn put(&self, key: K, value: V) -> Result<Option<V>> {
        self.inner.lock().put(key, value)
    }

    /// Clones the value out; use [`RedBlackTree::get_with`] to borrow it
    /// under the lock instead.
    pub fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Runs `f` on the value while the lock is held.
    pub fn get_with<Q, R, F>(&self, key: &Q, f: F) -> Result<R>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        F: FnOnce(&V) -> R,
    {
        self.inner.lock().get(key).map(f)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    pub fn validate(&self) -> std::result::Result<(), Violation> {
        self.inner.lock().validate()
    }
}

impl<K, V> Default for RedBlackTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<RbTree<K, V>> for RedBlackTree<K, V> {
    fn from(tree: RbTree<K, V>) -> Self {
        Self {
            inner: Mutex::new(tree),
        }
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for RedBlackTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner.lock(), f)
    }
}
