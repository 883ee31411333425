//! The [`Dom`]: an arena of nodes plus the operations that keep their
//! parent and sibling links consistent.

use arena::Arena;

use crate::node::{Attr, ElementData, Links, Node, NodeData, NodeId};

/// Every node of every document, plus any detached subtrees.
#[derive(Default)]
pub struct Dom {
    pub nodes: Arena<Node>,
}

impl Dom {
    /// Create an empty DOM (no document node yet).
    pub fn new() -> Self {
        Self::default()
    }

    // -- construction -------------------------------------------------------

    /// Allocate a new, empty document node.
    pub fn create_document(&mut self) -> NodeId {
        self.nodes.allocate(Node::new(NodeData::Document))
    }

    /// Create a detached element. The tag name is lower-cased.
    pub fn create_element(&mut self, tag_name: &str, attrs: Vec<Attr>) -> NodeId {
        let elem = ElementData::new(tag_name, attrs);
        self.nodes.allocate(Node::new(NodeData::Element(elem)))
    }

    /// [`Dom::create_element`] from `(name, value)` pairs.
    pub fn element(&mut self, tag_name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let attrs = attrs.iter().map(|&(name, value)| Attr::new(name, value)).collect();
        self.create_element(tag_name, attrs)
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.nodes.allocate(Node::new(NodeData::Text(data.to_string())))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.nodes.allocate(Node::new(NodeData::Comment(data.to_string())))
    }

    // -- mutation -----------------------------------------------------------

    /// No-op on non-elements.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(elem) = self.nodes.get_mut(node).and_then(Node::as_element_mut) {
            elem.set_attr(name, value);
        }
    }

    /// Remove `name` from an element; no-op on non-elements.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(elem) = self.nodes.get_mut(node).and_then(Node::as_element_mut) {
            elem.remove_attr(name);
        }
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.links(parent).last_child;
        self.splice(parent, child, last, None);
    }

    /// Move `child` in front of `reference`; appends when `reference` is `None`
    /// or is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        match reference.filter(|&r| self.parent(r) == Some(parent) && r != child) {
            Some(reference) => {
                self.detach(child);
                let prev = self.links(reference).prev_sibling;
                self.splice(parent, child, prev, Some(reference));
            }
            None => self.append_child(parent, child),
        }
    }

    /// Detach `child` if `parent` is its parent; the child keeps its subtree.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    /// Detach `node` and free it along with its descendants. Handles to the
    /// freed nodes go stale.
    pub fn drop_subtree(&mut self, node: NodeId) {
        self.detach(node);
        for id in self.descendants(node) {
            self.nodes.remove(id);
        }
        self.nodes.remove(node);
    }

    /// Is `node` a live handle?
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(node)
    }

    fn links(&self, node: NodeId) -> Links {
        self.nodes.get(node).map(|n| n.links).unwrap_or_default()
    }

    fn links_mut(&mut self, node: Option<NodeId>) -> Option<&mut Links> {
        self.nodes.get_mut(node?).map(|n| &mut n.links)
    }

    /// Link a detached `child` between `prev` and `next` under `parent`.
    fn splice(&mut self, parent: NodeId, child: NodeId, prev: Option<NodeId>, next: Option<NodeId>) {
        if let Some(links) = self.links_mut(Some(child)) {
            links.parent = Some(parent);
            links.prev_sibling = prev;
            links.next_sibling = next;
        }
        match self.links_mut(prev) {
            Some(links) => links.next_sibling = Some(child),
            None => {
                if let Some(links) = self.links_mut(Some(parent)) {
                    links.first_child = Some(child);
                }
            }
        }
        match self.links_mut(next) {
            Some(links) => links.prev_sibling = Some(child),
            None => {
                if let Some(links) = self.links_mut(Some(parent)) {
                    links.last_child = Some(child);
                }
            }
        }
    }

    /// Unlink `node` from its parent and siblings.
    fn detach(&mut self, node: NodeId) {
        let Links { parent, prev_sibling: prev, next_sibling: next, .. } = self.links(node);
        if parent.is_none() {
            return;
        }
        match self.links_mut(prev) {
            Some(links) => links.next_sibling = next,
            None => {
                if let Some(links) = self.links_mut(parent) {
                    links.first_child = next;
                }
            }
        }
        match self.links_mut(next) {
            Some(links) => links.prev_sibling = prev,
            None => {
                if let Some(links) = self.links_mut(parent) {
                    links.last_child = prev;
                }
            }
        }
        if let Some(links) = self.links_mut(Some(node)) {
            links.parent = None;
            links.prev_sibling = None;
            links.next_sibling = None;
        }
    }

    // -- traversal ----------------------------------------------------------

    /// Parent node of any kind, document included.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.links.parent
    }

    /// The parent unless it is a document.
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|&p| self.is_element(p))
    }

    /// Follow `step` from `node` until it reaches an element.
    fn element_along(&self, node: NodeId, step: impl Fn(&Links) -> Option<NodeId>) -> Option<NodeId> {
        let mut cursor = step(&self.nodes.get(node)?.links);
        while let Some(id) = cursor {
            let candidate = self.nodes.get(id)?;
            if candidate.is_element() {
                return Some(id);
            }
            cursor = step(&candidate.links);
        }
        None
    }

    /// Skips text and comment siblings.
    pub fn prev_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.element_along(node, |links| links.prev_sibling)
    }

    /// Skips text and comment siblings.
    pub fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.element_along(node, |links| links.next_sibling)
    }

    /// All child nodes in order.
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        std::iter::successors(self.links(parent).first_child, |&id| self.links(id).next_sibling).collect()
    }

    /// Child elements in order.
    pub fn element_children(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent)
            .into_iter()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    /// 0-based position among the parent's element children. `None` for
    /// non-elements.
    pub fn element_index(&self, node: NodeId) -> Option<usize> {
        self.is_element(node).then(|| {
            std::iter::successors(self.prev_element_sibling(node), |&prev| self.prev_element_sibling(prev))
                .count()
        })
    }

    /// Parent first, root last.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        std::iter::successors(self.parent(node), |&id| self.parent(id)).collect()
    }

    /// Pre-order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending: Vec<NodeId> = self.children(node);
        pending.reverse();
        while let Some(id) = pending.pop() {
            out.push(id);
            pending.extend(self.children(id).into_iter().rev());
        }
        out
    }

    /// Topmost ancestor of `node` (the node itself when it has no parent).
    pub fn root(&self, node: NodeId) -> NodeId {
        self.ancestors(node).last().copied().unwrap_or(node)
    }

    // -- inspection ---------------------------------------------------------

    /// Is `node` a live element?
    pub fn is_element(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(Node::is_element)
    }

    /// Is `node` a live document?
    pub fn is_document(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(Node::is_document)
    }

    /// Element payload, `None` for other node kinds.
    pub fn element_data(&self, node: NodeId) -> Option<&ElementData> {
        self.nodes.get(node)?.as_element()
    }

    /// Lower-case tag name of an element.
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element_data(node).map(|e| e.tag_name.as_str())
    }

    /// Attribute value, looked up case-insensitively.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element_data(node)?.attr(name)
    }

    /// The document this node belongs to. A document is its own owner;
    /// detached subtrees have none.
    pub fn owner_document(&self, node: NodeId) -> Option<NodeId> {
        let root = self.root(node);
        self.is_document(root).then_some(root)
    }

    /// The root element of `document` (its first element child).
    pub fn document_element(&self, document: NodeId) -> Option<NodeId> {
        if !self.is_document(document) {
            return None;
        }
        self.element_children(document).into_iter().next()
    }

    /// First document node allocated in this DOM.
    pub fn first_document(&self) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.is_document())
            .map(|(id, _)| id)
    }
}
