//! Absolute selector paths to a concrete element.

use dom::NodeId;

use crate::escape::css_escape;
use crate::host::{NativeQuery, index_of};

/// Build a selector that matches `element` from its document.
///
/// The walk climbs through parent nodes and stops early at an element with a
/// non-empty `id`, which becomes `#id`. The document's root element needs no
/// index; every other step is `tag:nth-child(n)`. A document yields an empty
/// path. In a detached subtree the walk ends at the subtree root, which is
/// emitted as `:scope`, so the path only holds when queried at that root.
pub fn dom_path<H: NativeQuery + ?Sized>(host: &H, element: NodeId) -> String {
    let mut names = Vec::new();
    let mut cursor = element;

    loop {
        let Some(parent) = host.parent_node(cursor) else {
            if !host.is_document(cursor) {
                names.push(":scope".to_string());
            }
            break;
        };
        if let Some(id) = host.attr(cursor, "id").filter(|id| !id.is_empty()) {
            names.push(format!("#{}", css_escape(id)));
            break;
        }
        let tag = host.tag_name(cursor).unwrap_or("*");
        // A document's element child is its root element, the only one there.
        if host.is_document(parent) {
            names.push(tag.to_string());
        } else {
            let index = index_of(host, cursor).unwrap_or(1);
            names.push(format!("{tag}:nth-child({index})"));
        }
        cursor = parent;
    }

    names.reverse();
    names.join(" > ")
}
