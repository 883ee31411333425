//! # relsel
//!
//! Context-relative CSS selectors over an arena DOM.
//!
//! Standard selectors go straight to the native engine in the `matching`
//! crate. A clause may also start with a prefix that is resolved against a
//! context element first:
//!
//! | prefix | meaning |
//! |--------|---------|
//! | `!sel [rest]` | closest ancestor of the context's parent matching `sel` |
//! | `-sel [rest]` | previous element sibling, if it matches `sel` |
//! | `+ sel` / `~ sel` | next / following siblings of the context |
//! | `> sel` | children of the context |
//!
//! Queries never fail: malformed selectors produce `None` or an empty list.

pub mod engine;
pub mod escape;
pub mod host;
pub mod parse;
pub mod path;
pub mod resolve;

use dom::NodeId;

pub use engine::{Engine, Target};
pub use escape::{EscapeInput, css_escape, escape};
pub use host::{NativeQuery, guarded_all, guarded_one, index_of};
pub use parse::{ParsedSelector, PositionClause};
pub use path::dom_path;

/// First match for `target` from `context` (the host's first document when `None`).
///
/// A plain selector given an element context searches that element's document.
pub fn query<'a, H: NativeQuery + ?Sized>(
    host: &H,
    target: impl Into<Target<'a>>,
    context: Option<NodeId>,
) -> Option<NodeId> {
    Engine::global().query(host, target, context)
}

/// Every match for `target` in `context` (the host's first document when `None`).
pub fn query_all<'a, H: NativeQuery + ?Sized>(
    host: &H,
    target: impl Into<Target<'a>>,
    context: Option<NodeId>,
) -> Vec<NodeId> {
    Engine::global().query_all(host, target, context)
}

/// First match for `target` searched at `context` exactly, with no widening.
pub fn find<'a, H: NativeQuery + ?Sized>(
    host: &H,
    target: impl Into<Target<'a>>,
    context: NodeId,
) -> Option<NodeId> {
    Engine::global().find(host, target, context)
}

/// Every match for `target` searched at `context` exactly, with no widening.
pub fn find_all<'a, H: NativeQuery + ?Sized>(
    host: &H,
    target: impl Into<Target<'a>>,
    context: NodeId,
) -> Vec<NodeId> {
    Engine::global().find_all(host, target, context)
}
