//! # Selector matching
//!
//! The native query primitives over [`dom::Dom`]: `matches`, `closest`,
//! `query_selector` and `query_selector_all`, with `:scope` bound to the
//! node a query runs against.

pub mod error;
pub mod matcher;
pub mod query;

pub use error::QueryError;
pub use matcher::{MatchContext, matches_compound, matches_list, matches_selector};
pub use query::{closest, matches, query_selector, query_selector_all};
