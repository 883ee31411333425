//! `querySelector`-family entry points over a [`Dom`].

use css::{SelectorList, parse_selector_list};
use dom::{Dom, NodeId};
use tracing::trace;

use crate::error::QueryError;
use crate::matcher::{MatchContext, matches_list};

fn parse(selector: &str) -> Result<SelectorList, QueryError> {
    parse_selector_list(selector).map_err(|source| QueryError::syntax(selector, source))
}

/// The element `:scope` binds to for a query rooted at `scope`.
/// A document scope binds to its root element.
fn scope_element(dom: &Dom, scope: NodeId) -> Result<Option<NodeId>, QueryError> {
    if dom.is_document(scope) {
        Ok(dom.document_element(scope))
    } else if dom.is_element(scope) {
        Ok(Some(scope))
    } else {
        Err(QueryError::InvalidNode(scope))
    }
}

fn require_element(dom: &Dom, node: NodeId) -> Result<(), QueryError> {
    if dom.is_element(node) {
        Ok(())
    } else {
        Err(QueryError::InvalidNode(node))
    }
}

/// First descendant of `scope` (document order) matching `selector`.
pub fn query_selector(dom: &Dom, scope: NodeId, selector: &str) -> Result<Option<NodeId>, QueryError> {
    let list = parse(selector)?;
    let ctx = MatchContext::scoped(scope_element(dom, scope)?);
    Ok(dom
        .descendants(scope)
        .into_iter()
        .find(|&n| matches_list(dom, n, &list.selectors, &ctx)))
}

/// Every descendant of `scope` matching `selector`, in document order.
///
/// Only descendants are candidates, but the selector itself may reach
/// above `scope` (`div p` scoped at a `p`'s parent still sees the `div`).
pub fn query_selector_all(dom: &Dom, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, QueryError> {
    let list = parse(selector)?;
    let ctx = MatchContext::scoped(scope_element(dom, scope)?);
    let found: Vec<NodeId> = dom
        .descendants(scope)
        .into_iter()
        .filter(|&n| matches_list(dom, n, &list.selectors, &ctx))
        .collect();
    trace!(selector, count = found.len(), "query_selector_all");
    Ok(found)
}

/// Nearest inclusive ancestor of `element` matching `selector`.
pub fn closest(dom: &Dom, element: NodeId, selector: &str) -> Result<Option<NodeId>, QueryError> {
    let list = parse(selector)?;
    require_element(dom, element)?;
    let ctx = MatchContext::scoped(Some(element));
    Ok(std::iter::once(element)
        .chain(dom.ancestors(element))
        .take_while(|&n| dom.is_element(n))
        .find(|&n| matches_list(dom, n, &list.selectors, &ctx)))
}

/// Does `element` itself match `selector`?
pub fn matches(dom: &Dom, element: NodeId, selector: &str) -> Result<bool, QueryError> {
    let list = parse(selector)?;
    require_element(dom, element)?;
    let ctx = MatchContext::scoped(Some(element));
    Ok(matches_list(dom, element, &list.selectors, &ctx))
}
