//! Selector matching: does a DOM element match a CSS selector?
//!
//! Complex selectors are matched **right-to-left**: we start with the rightmost
//! (subject) compound selector, then walk up/sideways through the DOM tree
//! following each combinator, backtracking when a later step fails.

use css::{AttrOp, Combinator, ComplexSelector, CompoundSelector, PseudoClass, SimpleSelector};
use dom::{Dom, ElementData, Node, NodeId};

/// Per-query matching state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchContext {
    /// Element that `:scope` refers to. `None` makes `:scope` behave as `:root`.
    pub scope: Option<NodeId>,
}

impl MatchContext {
    pub fn scoped(scope: Option<NodeId>) -> Self {
        Self { scope }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Does `node_id` match any selector of the list?
pub fn matches_list(
    dom: &Dom,
    node_id: NodeId,
    selectors: &[ComplexSelector],
    ctx: &MatchContext,
) -> bool {
    selectors.iter().any(|sel| matches_selector(dom, node_id, sel, ctx))
}

/// Test whether the element `node_id` matches a full complex selector.
///
/// Returns `false` if `node_id` does not refer to an element.
pub fn matches_selector(
    dom: &Dom,
    node_id: NodeId,
    selector: &ComplexSelector,
    ctx: &MatchContext,
) -> bool {
    // Parts are stored right-to-left: parts[0] is the subject.
    let Some((subject, _)) = selector.parts.first() else {
        return false;
    };
    matches_compound(dom, node_id, subject, ctx) && matches_leftward(dom, node_id, selector, 0, ctx)
}

/// Test whether the element `node_id` matches a compound selector (all simples must match).
pub fn matches_compound(
    dom: &Dom,
    node_id: NodeId,
    compound: &CompoundSelector,
    ctx: &MatchContext,
) -> bool {
    let Some(elem) = dom.element_data(node_id) else {
        return false;
    };
    compound
        .simples
        .iter()
        .all(|simple| matches_simple(dom, node_id, elem, simple, ctx))
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────────────────────────

/// `node_id` matched `parts[index]`; check the remainder of the chain to its left.
fn matches_leftward(
    dom: &Dom,
    node_id: NodeId,
    selector: &ComplexSelector,
    index: usize,
    ctx: &MatchContext,
) -> bool {
    let Some(combinator) = selector.parts[index].1 else {
        return true;
    };
    let Some((compound, _)) = selector.parts.get(index + 1) else {
        return true;
    };
    let candidate_matches = |candidate: NodeId| {
        matches_compound(dom, candidate, compound, ctx)
            && matches_leftward(dom, candidate, selector, index + 1, ctx)
    };

    match combinator {
        Combinator::Descendant => {
            let mut ancestor = dom.parent_element(node_id);
            while let Some(anc_id) = ancestor {
                if candidate_matches(anc_id) {
                    return true;
                }
                ancestor = dom.parent_element(anc_id);
            }
            false
        }
        Combinator::Child => dom.parent_element(node_id).is_some_and(candidate_matches),
        Combinator::NextSibling => dom.prev_element_sibling(node_id).is_some_and(candidate_matches),
        Combinator::SubsequentSibling => {
            let mut sibling = dom.prev_element_sibling(node_id);
            while let Some(sib_id) = sibling {
                if candidate_matches(sib_id) {
                    return true;
                }
                sibling = dom.prev_element_sibling(sib_id);
            }
            false
        }
    }
}

fn matches_simple(
    dom: &Dom,
    node_id: NodeId,
    elem: &ElementData,
    simple: &SimpleSelector,
    ctx: &MatchContext,
) -> bool {
    match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(tag) => elem.tag_name.eq_ignore_ascii_case(tag),
        SimpleSelector::Id(id) => elem.id.as_deref() == Some(id.as_str()),
        SimpleSelector::Class(cls) => elem.has_class(cls),
        SimpleSelector::Attribute { name, op, value } => {
            matches_attribute(elem, name, *op, value.as_deref())
        }
        SimpleSelector::PseudoClass(pc) => matches_pseudo_class(dom, node_id, elem, pc, ctx),
        // Pseudo-elements are never elements of the tree, so a query can't return them.
        SimpleSelector::PseudoElement(_) => false,
    }
}

fn matches_attribute(elem: &ElementData, name: &str, op: AttrOp, value: Option<&str>) -> bool {
    let Some(attr_val) = elem.attr(name) else {
        return false;
    };
    let Some(v) = value else {
        return op == AttrOp::Exists;
    };

    match op {
        AttrOp::Exists => true,
        AttrOp::Eq => attr_val == v,
        AttrOp::Includes => attr_val.split_whitespace().any(|word| word == v),
        AttrOp::DashMatch => {
            attr_val == v || attr_val.strip_prefix(v).is_some_and(|rest| rest.starts_with('-'))
        }
        AttrOp::Prefix => !v.is_empty() && attr_val.starts_with(v),
        AttrOp::Suffix => !v.is_empty() && attr_val.ends_with(v),
        AttrOp::Substring => !v.is_empty() && attr_val.contains(v),
    }
}

fn matches_pseudo_class(
    dom: &Dom,
    node_id: NodeId,
    elem: &ElementData,
    pc: &PseudoClass,
    ctx: &MatchContext,
) -> bool {
    match pc {
        PseudoClass::Scope => match ctx.scope {
            Some(scope) => scope == node_id,
            None => is_root(dom, node_id),
        },

        PseudoClass::Root => is_root(dom, node_id),

        // Interaction state lives outside the tree; a static query never sees it.
        PseudoClass::Hover
        | PseudoClass::Active
        | PseudoClass::Focus
        | PseudoClass::FocusVisible
        | PseudoClass::FocusWithin
        | PseudoClass::Visited => false,

        PseudoClass::Link | PseudoClass::AnyLink => {
            matches!(elem.tag_name.as_str(), "a" | "area") && elem.attr("href").is_some()
        }

        PseudoClass::Disabled => is_form_control(elem) && elem.attr("disabled").is_some(),
        PseudoClass::Enabled => is_form_control(elem) && elem.attr("disabled").is_none(),
        PseudoClass::Checked => match elem.tag_name.as_str() {
            "input" => elem.attr("checked").is_some(),
            "option" => elem.attr("selected").is_some(),
            _ => false,
        },

        PseudoClass::FirstChild => dom.prev_element_sibling(node_id).is_none() && has_parent(dom, node_id),
        PseudoClass::LastChild => dom.next_element_sibling(node_id).is_none() && has_parent(dom, node_id),
        PseudoClass::OnlyChild => {
            has_parent(dom, node_id)
                && dom.prev_element_sibling(node_id).is_none()
                && dom.next_element_sibling(node_id).is_none()
        }

        PseudoClass::FirstOfType => same_type_siblings(dom, node_id, elem).first() == Some(&node_id),
        PseudoClass::LastOfType => same_type_siblings(dom, node_id, elem).last() == Some(&node_id),
        PseudoClass::OnlyOfType => same_type_siblings(dom, node_id, elem) == [node_id],

        PseudoClass::Empty => is_empty_element(dom, node_id),

        PseudoClass::NthChild(nth) => dom
            .element_index(node_id)
            .is_some_and(|idx| has_parent(dom, node_id) && nth.matches(idx as i32 + 1)),

        PseudoClass::NthLastChild(nth) => {
            let Some(parent) = dom.parent(node_id) else {
                return false;
            };
            let siblings = dom.element_children(parent);
            siblings
                .iter()
                .rev()
                .position(|&s| s == node_id)
                .is_some_and(|idx| nth.matches(idx as i32 + 1))
        }

        PseudoClass::Not(list) => !matches_list(dom, node_id, list, ctx),
        PseudoClass::Is(list) | PseudoClass::Where(list) => matches_list(dom, node_id, list, ctx),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DOM helpers
// ─────────────────────────────────────────────────────────────────────────────

/// The root element has a document as its parent.
fn is_root(dom: &Dom, node_id: NodeId) -> bool {
    dom.parent(node_id).is_some_and(|p| dom.is_document(p))
}

fn has_parent(dom: &Dom, node_id: NodeId) -> bool {
    dom.parent(node_id).is_some()
}

fn is_form_control(elem: &ElementData) -> bool {
    matches!(
        elem.tag_name.as_str(),
        "button" | "input" | "select" | "textarea" | "option" | "optgroup" | "fieldset"
    )
}

/// Element siblings (including `node_id`) sharing its tag name, in document order.
fn same_type_siblings(dom: &Dom, node_id: NodeId, elem: &ElementData) -> Vec<NodeId> {
    let Some(parent) = dom.parent(node_id) else {
        return Vec::new();
    };
    dom.element_children(parent)
        .into_iter()
        .filter(|&c| dom.tag_name(c) == Some(elem.tag_name.as_str()))
        .collect()
}

/// `:empty`: no element children and no non-whitespace text.
fn is_empty_element(dom: &Dom, node_id: NodeId) -> bool {
    !dom.children(node_id)
        .into_iter()
        .any(|c| dom.nodes.get(c).is_some_and(Node::is_content))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use css::parse_selector_list;

    /// Build a small DOM tree for testing:
    /// ```text
    /// document
    /// └── html
    ///     └── body
    ///         ├── div#main.container.wrapper
    ///         │   ├── h1
    ///         │   ├── p.intro  (with data-x="foo bar")
    ///         │   └── p
    ///         └── footer
    /// ```
    fn build_test_dom() -> (Dom, NodeId, NodeId, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let html = dom.element("html", &[]);
        let body = dom.element("body", &[]);
        let div = dom.element("div", &[("id", "main"), ("class", "container wrapper")]);
        let h1 = dom.element("h1", &[]);
        let p1 = dom.element("p", &[("class", "intro"), ("data-x", "foo bar")]);
        let p2 = dom.element("p", &[]);
        let footer = dom.element("footer", &[]);

        dom.append_child(doc, html);
        dom.append_child(html, body);
        dom.append_child(body, div);
        dom.append_child(div, h1);
        dom.append_child(div, p1);
        dom.append_child(div, p2);
        dom.append_child(body, footer);

        (dom, html, body, div, h1, p1, p2, footer)
    }

    fn is_match(dom: &Dom, node: NodeId, css: &str) -> bool {
        let list = parse_selector_list(css).unwrap();
        matches_list(dom, node, &list.selectors, &MatchContext::default())
    }

    fn is_match_scoped(dom: &Dom, node: NodeId, css: &str, scope: NodeId) -> bool {
        let list = parse_selector_list(css).unwrap();
        matches_list(dom, node, &list.selectors, &MatchContext::scoped(Some(scope)))
    }

    #[test]
    fn type_id_and_class() {
        let (dom, _, _, div, ..) = build_test_dom();
        assert!(is_match(&dom, div, "div"));
        assert!(is_match(&dom, div, "*"));
        assert!(is_match(&dom, div, "#main"));
        assert!(is_match(&dom, div, ".wrapper"));
        assert!(is_match(&dom, div, "div#main.container"));
        assert!(!is_match(&dom, div, "#other"));
        assert!(!is_match(&dom, div, ".missing"));
    }

    #[test]
    fn descendant_and_child() {
        let (dom, _, _, _, h1, p1, ..) = build_test_dom();
        assert!(is_match(&dom, p1, "div p"));
        assert!(is_match(&dom, p1, "body p"));
        assert!(is_match(&dom, h1, "div > h1"));
        assert!(!is_match(&dom, h1, "body > h1"));
    }

    #[test]
    fn descendant_backtracks_past_first_candidate() {
        // `section > div p`: the nearest div ancestor has the wrong parent,
        // a farther one matches.
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let section = dom.element("section", &[]);
        let outer = dom.element("div", &[]);
        let inner = dom.element("div", &[]);
        let p = dom.element("p", &[]);
        dom.append_child(doc, section);
        dom.append_child(section, outer);
        dom.append_child(outer, inner);
        dom.append_child(inner, p);
        assert!(is_match(&dom, p, "section > div p"));
    }

    #[test]
    fn sibling_combinators() {
        let (dom, _, _, _, _, p1, p2, _) = build_test_dom();
        assert!(is_match(&dom, p1, "h1 + p"));
        assert!(!is_match(&dom, p2, "h1 + p"));
        assert!(is_match(&dom, p2, "h1 ~ p"));
    }

    #[test]
    fn attributes() {
        let (dom, _, _, _, _, p1, ..) = build_test_dom();
        assert!(is_match(&dom, p1, "[data-x]"));
        assert!(is_match(&dom, p1, "[data-x~=\"foo\"]"));
        assert!(is_match(&dom, p1, "[data-x^=fo]"));
        assert!(is_match(&dom, p1, "[data-x$=bar]"));
        assert!(is_match(&dom, p1, "[data-x*=\"o b\"]"));
        assert!(!is_match(&dom, p1, "[data-x=foo]"));
        assert!(!is_match(&dom, p1, "[missing]"));
    }

    #[test]
    fn dash_match() {
        let mut dom = Dom::new();
        let el = dom.element("p", &[("lang", "en-US")]);
        assert!(is_match(&dom, el, "[lang|=en]"));
        assert!(!is_match(&dom, el, "[lang|=e]"));
    }

    #[test]
    fn structural_pseudo_classes() {
        let (dom, html, body, div, h1, p1, p2, footer) = build_test_dom();
        assert!(is_match(&dom, html, ":root"));
        assert!(!is_match(&dom, body, ":root"));
        assert!(is_match(&dom, h1, ":first-child"));
        assert!(is_match(&dom, p2, ":last-child"));
        assert!(is_match(&dom, p1, "p:first-of-type"));
        assert!(is_match(&dom, p2, "p:last-of-type"));
        assert!(is_match(&dom, h1, "h1:only-of-type"));
        assert!(is_match(&dom, body, ":only-child"));
        assert!(is_match(&dom, footer, ":empty"));
        assert!(!is_match(&dom, div, ":empty"));
    }

    #[test]
    fn nth_child_counts_from_one() {
        let (dom, _, _, _, h1, p1, p2, _) = build_test_dom();
        assert!(is_match(&dom, h1, ":nth-child(1)"));
        assert!(is_match(&dom, p1, ":nth-child(2)"));
        assert!(is_match(&dom, p2, ":nth-child(odd)"));
        assert!(is_match(&dom, p2, ":nth-last-child(1)"));
        assert!(is_match(&dom, h1, ":nth-last-child(3)"));
    }

    #[test]
    fn scope_binds_to_context() {
        let (dom, html, _, div, h1, ..) = build_test_dom();
        assert!(is_match_scoped(&dom, h1, ":scope > h1", div));
        assert!(!is_match_scoped(&dom, h1, ":scope > h1", html));
        // Unscoped `:scope` is the root element.
        assert!(is_match(&dom, html, ":scope"));
    }

    #[test]
    fn logical_pseudo_classes() {
        let (dom, _, _, _, h1, p1, ..) = build_test_dom();
        assert!(is_match(&dom, h1, ":not(p)"));
        assert!(!is_match(&dom, p1, ":not(p)"));
        assert!(is_match(&dom, p1, ":is(h1, .intro)"));
        assert!(is_match(&dom, p1, ":where(div > p)"));
    }

    #[test]
    fn pseudo_elements_and_dynamic_state_never_match() {
        let (dom, _, _, _, _, p1, ..) = build_test_dom();
        assert!(!is_match(&dom, p1, "p::before"));
        assert!(!is_match(&dom, p1, "p:hover"));
    }

    #[test]
    fn form_states() {
        let mut dom = Dom::new();
        let on = dom.element("input", &[("checked", "")]);
        let off = dom.element("input", &[("disabled", "")]);
        assert!(is_match(&dom, on, ":checked"));
        assert!(is_match(&dom, on, ":enabled"));
        assert!(is_match(&dom, off, ":disabled"));
        assert!(!is_match(&dom, off, ":checked"));
    }
}
