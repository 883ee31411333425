//! The host document model the engine resolves against.

use std::fmt::Display;

use dom::{Dom, NodeId};
use matching::QueryError;
use tracing::debug;

/// Native selector primitives plus the traversal the resolver needs.
///
/// Query methods may fail (bad syntax, stale handle); the engine only calls
/// them through [`guarded_one`] / [`guarded_all`].
pub trait NativeQuery {
    type Error: Display;

    fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>, Self::Error>;
    fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, Self::Error>;
    fn closest(&self, element: NodeId, selector: &str) -> Result<Option<NodeId>, Self::Error>;
    fn matches(&self, element: NodeId, selector: &str) -> Result<bool, Self::Error>;

    /// Any parent node, document included.
    fn parent_node(&self, node: NodeId) -> Option<NodeId>;
    fn parent_element(&self, node: NodeId) -> Option<NodeId>;
    fn prev_element_sibling(&self, node: NodeId) -> Option<NodeId>;
    /// 0-based position among the parent's element children.
    fn element_index(&self, node: NodeId) -> Option<usize>;
    fn attr(&self, element: NodeId, name: &str) -> Option<&str>;
    fn tag_name(&self, element: NodeId) -> Option<&str>;
    fn is_document(&self, node: NodeId) -> bool;
    fn owner_document(&self, node: NodeId) -> Option<NodeId>;
    /// Topmost ancestor, or `node` itself.
    fn root(&self, node: NodeId) -> NodeId;
    /// Context used when a caller supplies none.
    fn default_context(&self) -> Option<NodeId>;
}

impl NativeQuery for Dom {
    type Error = QueryError;

    fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>, QueryError> {
        matching::query_selector(self, scope, selector)
    }

    fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, QueryError> {
        matching::query_selector_all(self, scope, selector)
    }

    fn closest(&self, element: NodeId, selector: &str) -> Result<Option<NodeId>, QueryError> {
        matching::closest(self, element, selector)
    }

    fn matches(&self, element: NodeId, selector: &str) -> Result<bool, QueryError> {
        matching::matches(self, element, selector)
    }

    fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node)
    }

    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        Dom::parent_element(self, node)
    }

    fn prev_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        Dom::prev_element_sibling(self, node)
    }

    fn element_index(&self, node: NodeId) -> Option<usize> {
        Dom::element_index(self, node)
    }

    fn attr(&self, element: NodeId, name: &str) -> Option<&str> {
        Dom::attr(self, element, name)
    }

    fn tag_name(&self, element: NodeId) -> Option<&str> {
        Dom::tag_name(self, element)
    }

    fn is_document(&self, node: NodeId) -> bool {
        Dom::is_document(self, node)
    }

    fn owner_document(&self, node: NodeId) -> Option<NodeId> {
        Dom::owner_document(self, node)
    }

    fn root(&self, node: NodeId) -> NodeId {
        Dom::root(self, node)
    }

    fn default_context(&self) -> Option<NodeId> {
        self.first_document()
    }
}

/// Run a single-result native call, mapping failure to `None`.
pub fn guarded_one<T, E: Display>(selector: &str, outcome: Result<Option<T>, E>) -> Option<T> {
    outcome.unwrap_or_else(|err| {
        debug!(selector, %err, "native query failed");
        None
    })
}

/// Run a multi-result native call, mapping failure to an empty list.
pub fn guarded_all<T, E: Display>(selector: &str, outcome: Result<Vec<T>, E>) -> Vec<T> {
    outcome.unwrap_or_else(|err| {
        debug!(selector, %err, "native query failed");
        Vec::new()
    })
}

/// 1-based position of `element` among its parent's element children.
pub fn index_of<H: NativeQuery + ?Sized>(host: &H, element: NodeId) -> Option<usize> {
    host.element_index(element).map(|idx| idx + 1)
}
