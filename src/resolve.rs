//! Anchor resolution: turning a parsed selector plus a live context into
//! one native query (or a finished answer).

use dom::NodeId;
use tracing::debug;

use crate::engine::Engine;
use crate::host::{NativeQuery, guarded_one, index_of};
use crate::parse::ParsedSelector;
use crate::path::dom_path;

/// What to hand the native engine for one `find` / `find_all` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Resolution already produced the answer.
    Direct(Option<NodeId>),
    /// Run `selector` with `scope` as the native query root.
    Query { scope: NodeId, selector: String },
}

/// Build the plan for `parsed` evaluated at `context`.
pub fn plan<H: NativeQuery + ?Sized>(
    engine: &Engine,
    host: &H,
    parsed: &ParsedSelector,
    context: NodeId,
) -> Plan {
    if !parsed.is_context_selector {
        return Plan::Query {
            scope: context,
            selector: parsed.normalized.clone(),
        };
    }

    let single = parsed.is_single();
    let mut compound: Vec<String> = Vec::new();

    for clause in &parsed.clauses {
        let mut anchor = Some(context);
        let mut rest = clause.clone();

        if rest.starts_with('!') {
            let position = engine.parse_position(&rest);
            anchor = host
                .parent_element(context)
                .and_then(|parent| guarded_one(&position.anchor, host.closest(parent, &position.anchor)));
            rest = position.filter.clone();
            if rest.is_empty() && single {
                debug!(selector = %parsed.raw, ?anchor, "ancestor fast path");
                return Plan::Direct(anchor);
            }
        }

        if let Some(current) = anchor.filter(|_| rest.starts_with('-')) {
            let position = engine.parse_position(&rest);
            anchor = host.prev_element_sibling(current).filter(|&prev| {
                guarded_one(
                    &position.anchor,
                    host.matches(prev, &position.anchor).map(|hit| hit.then_some(())),
                )
                .is_some()
            });
            rest = position.filter.clone();
            if rest.is_empty() && single {
                debug!(selector = %parsed.raw, ?anchor, "sibling fast path");
                return Plan::Direct(anchor);
            }
        }

        let Some(anchor) = anchor else {
            debug!(selector = %parsed.raw, clause = %clause, "no anchor, clause dropped");
            continue;
        };

        if single {
            return scoped_single(host, anchor, rest);
        }

        let path = dom_path(host, anchor);
        if path.is_empty() && rest.starts_with(['>', '+', '~']) {
            debug!(selector = %parsed.raw, clause = %clause, "combinator at a document, clause dropped");
            continue;
        }
        compound.push(format!("{path} {rest}").trim().to_string());
    }

    if compound.is_empty() {
        return Plan::Direct(None);
    }

    Plan::Query {
        scope: document_scope(host, context),
        selector: compound.join(","),
    }
}

/// The document `context` belongs to, or the root of its detached subtree.
pub fn document_scope<H: NativeQuery + ?Sized>(host: &H, context: NodeId) -> NodeId {
    if host.is_document(context) {
        context
    } else {
        host.owner_document(context).unwrap_or_else(|| host.root(context))
    }
}

/// Rewrite a lone clause so `:scope` stands in for its anchor.
fn scoped_single<H: NativeQuery + ?Sized>(host: &H, anchor: NodeId, rest: String) -> Plan {
    match rest.chars().next() {
        Some('+' | '~') => {
            let parent = host.parent_element(anchor);
            let index = index_of(host, anchor);
            match parent.zip(index) {
                Some((scope, index)) => Plan::Query {
                    scope,
                    selector: format!(":scope > :nth-child({index}) {rest}"),
                },
                None => Plan::Direct(None),
            }
        }
        Some('>') => Plan::Query {
            scope: anchor,
            selector: format!(":scope {rest}"),
        },
        _ => Plan::Query {
            scope: anchor,
            selector: rest,
        },
    }
}
