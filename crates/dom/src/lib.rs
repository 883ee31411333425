//! DOM crate
//!
//! Arena-based document tree exposing the traversal primitives a selector
//! engine needs: parent/sibling links, element indices, attribute reads and
//! owning-document lookup.

pub mod node;
pub mod tree;

pub use node::*;
pub use tree::Dom;
