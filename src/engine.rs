//! Memoized parsing plus the query entry points.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use dom::NodeId;
use tracing::trace;

use crate::host::{NativeQuery, guarded_all, guarded_one};
use crate::parse::{ParsedSelector, PositionClause};
use crate::resolve::{Plan, document_scope, plan};

static GLOBAL: LazyLock<Engine> = LazyLock::new(Engine::new);

/// What a query resolves: selector text, or a node that is passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Selector(&'a str),
    Node(NodeId),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(selector: &'a str) -> Self {
        Target::Selector(selector)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(selector: &'a String) -> Self {
        Target::Selector(selector)
    }
}

impl From<NodeId> for Target<'_> {
    fn from(node: NodeId) -> Self {
        Target::Node(node)
    }
}

/// Selector engine with its two parse caches.
///
/// Cache entries are a pure function of their key and are never evicted.
#[derive(Debug, Default)]
pub struct Engine {
    selectors: DashMap<String, Arc<ParsedSelector>>,
    positions: DashMap<String, Arc<PositionClause>>,
}

impl Engine {
    /// An engine with empty caches of its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide engine used by the crate-level functions.
    pub fn global() -> &'static Engine {
        &GLOBAL
    }

    /// Split and classify `selector`, memoized by its raw text.
    pub fn parse(&self, selector: &str) -> Arc<ParsedSelector> {
        if let Some(hit) = self.selectors.get(selector) {
            trace!(selector, "selector cache hit");
            return Arc::clone(hit.value());
        }
        trace!(selector, "selector cache miss");
        let entry = self
            .selectors
            .entry(selector.to_string())
            .or_insert_with(|| Arc::new(ParsedSelector::parse(selector)));
        Arc::clone(entry.value())
    }

    /// Split a `!`/`-` clause into anchor and filter, memoized by clause text.
    pub fn parse_position(&self, clause: &str) -> Arc<PositionClause> {
        if let Some(hit) = self.positions.get(clause) {
            trace!(clause, "position cache hit");
            return Arc::clone(hit.value());
        }
        trace!(clause, "position cache miss");
        let entry = self
            .positions
            .entry(clause.to_string())
            .or_insert_with(|| Arc::new(PositionClause::parse(clause)));
        Arc::clone(entry.value())
    }

    /// Number of memoized selectors.
    pub fn cached_selectors(&self) -> usize {
        self.selectors.len()
    }

    /// Number of memoized position clauses.
    pub fn cached_positions(&self) -> usize {
        self.positions.len()
    }

    /// Where a `query` call actually searches.
    ///
    /// A plain selector given an element context searches that element's
    /// whole document (the subtree root when detached). Context selectors and
    /// document contexts are kept as given.
    fn effective_context<H: NativeQuery + ?Sized>(&self, host: &H, selector: &str, context: NodeId) -> NodeId {
        if selector.is_empty() || host.is_document(context) || self.parse(selector).is_context_selector {
            context
        } else {
            document_scope(host, context)
        }
    }

    /// First match for `target`; `None` as context means the host's default document.
    pub fn query<'a, H: NativeQuery + ?Sized>(
        &self,
        host: &H,
        target: impl Into<Target<'a>>,
        context: Option<NodeId>,
    ) -> Option<NodeId> {
        let selector = match target.into() {
            Target::Node(node) => return Some(node),
            Target::Selector(selector) => selector,
        };
        let context = context.or_else(|| host.default_context())?;
        self.find(host, selector, self.effective_context(host, selector, context))
    }

    /// Every match for `target`; `None` as context means the host's default document.
    pub fn query_all<'a, H: NativeQuery + ?Sized>(
        &self,
        host: &H,
        target: impl Into<Target<'a>>,
        context: Option<NodeId>,
    ) -> Vec<NodeId> {
        let selector = match target.into() {
            Target::Node(node) => return vec![node],
            Target::Selector(selector) => selector,
        };
        match context.or_else(|| host.default_context()) {
            Some(context) => self.find_all(host, selector, self.effective_context(host, selector, context)),
            None => Vec::new(),
        }
    }

    /// First match for `target` searched exactly at `context`.
    pub fn find<'a, H: NativeQuery + ?Sized>(
        &self,
        host: &H,
        target: impl Into<Target<'a>>,
        context: NodeId,
    ) -> Option<NodeId> {
        let selector = match target.into() {
            Target::Node(node) => return Some(node),
            Target::Selector(selector) if selector.is_empty() => return None,
            Target::Selector(selector) => selector,
        };
        match plan(self, host, &self.parse(selector), context) {
            Plan::Direct(found) => found,
            Plan::Query { scope, selector } => guarded_one(&selector, host.query_selector(scope, &selector)),
        }
    }

    /// Every match for `target` searched exactly at `context`.
    pub fn find_all<'a, H: NativeQuery + ?Sized>(
        &self,
        host: &H,
        target: impl Into<Target<'a>>,
        context: NodeId,
    ) -> Vec<NodeId> {
        let selector = match target.into() {
            Target::Node(node) => return vec![node],
            Target::Selector(selector) if selector.is_empty() => return Vec::new(),
            Target::Selector(selector) => selector,
        };
        match plan(self, host, &self.parse(selector), context) {
            Plan::Direct(found) => found.into_iter().collect(),
            Plan::Query { scope, selector } => guarded_all(&selector, host.query_selector_all(scope, &selector)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::Dom;

    #[test]
    fn parse_results_are_shared() {
        let engine = Engine::new();
        let first = engine.parse("!ul li, p");
        let second = engine.parse("!ul li, p");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(engine.cached_selectors(), 1);

        engine.parse("p");
        assert_eq!(engine.cached_selectors(), 2);
    }

    #[test]
    fn position_cache_keys_include_the_prefix() {
        let engine = Engine::new();
        let ancestor = engine.parse_position("!li a");
        let sibling = engine.parse_position("-li a");
        assert_eq!(ancestor, sibling);
        assert!(!Arc::ptr_eq(&ancestor, &sibling));
        assert_eq!(engine.cached_positions(), 2);
    }

    #[test]
    fn separate_engines_do_not_share_caches() {
        let a = Engine::new();
        let b = Engine::new();
        a.parse("p");
        assert_eq!(a.cached_selectors(), 1);
        assert_eq!(b.cached_selectors(), 0);
    }

    #[test]
    fn node_targets_pass_through() {
        let mut dom = Dom::new();
        let orphan = dom.element("div", &[]);
        let engine = Engine::new();
        assert_eq!(engine.query(&dom, orphan, None), Some(orphan));
        assert_eq!(engine.query_all(&dom, orphan, None), vec![orphan]);
        assert_eq!(engine.find(&dom, orphan, orphan), Some(orphan));
    }

    #[test]
    fn missing_document_yields_nothing() {
        let dom = Dom::new();
        let engine = Engine::new();
        assert_eq!(engine.query(&dom, "div", None), None);
        assert!(engine.query_all(&dom, "div", None).is_empty());
    }

    #[test]
    fn query_widens_plain_selectors_but_find_does_not() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let list = dom.element("ul", &[]);
        let items = [dom.element("li", &[]), dom.element("li", &[])];
        dom.append_child(doc, list);
        for li in items {
            dom.append_child(list, li);
        }
        let engine = Engine::new();
        assert_eq!(engine.query_all(&dom, "li", Some(items[0])), items.to_vec());
        assert_eq!(engine.query(&dom, "ul", Some(items[1])), Some(list));
        assert!(engine.find_all(&dom, "li", items[0]).is_empty());
        assert_eq!(engine.find(&dom, "li", list), Some(items[0]));
        assert_eq!(engine.query(&dom, "~ li", Some(items[0])), Some(items[1]));
    }

    #[test]
    fn empty_selector_yields_nothing() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let engine = Engine::new();
        assert_eq!(engine.find(&dom, "", doc), None);
        assert!(engine.find_all(&dom, "", doc).is_empty());
        assert_eq!(engine.query(&dom, "", Some(doc)), None);
        assert_eq!(engine.cached_selectors(), 0);
    }
}
