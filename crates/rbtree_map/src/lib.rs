//! Ordered key-value map backed by a red-black tree.
//!
//! [`RbTree`] is the single-owner map; [`RedBlackTree`] wraps it in one
//! exclusive lock for shared use. Both support upsert, lookup, membership and
//! clear. There is no removal of individual keys.

mod error;
mod node;
mod sync;
mod tree;
mod validate;

pub use error::{Error, Result};
pub use node::Colour;
pub use sync::RedBlackTree;
pub use tree::RbTree;
pub use validate::Violation;
