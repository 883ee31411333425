//! Node payloads and the intrusive links that place them in a tree.
//!
//! Nodes live in an `Arena<Node>` owned by [`crate::Dom`] and are addressed
//! by [`NodeId`], a generational index, so a handle to a freed node never
//! aliases a newer one.

pub type NodeId = arena::GenIndex;

/// One `name="value"` pair on an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Attribute names compare ASCII-case-insensitively.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Element payload. `id` and `classes` mirror the attribute list and are
/// rebuilt whenever it changes through [`ElementData::set_attr`] or
/// [`ElementData::remove_attr`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementData {
    /// Always lower case.
    pub tag_name: String,
    pub attrs: Vec<Attr>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl ElementData {
    pub fn new(tag_name: &str, attrs: Vec<Attr>) -> Self {
        let mut elem = Self {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs,
            id: None,
            classes: Vec::new(),
        };
        elem.sync_selectors();
        elem
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.is_named(name))
            .map(|a| a.value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|a| a.is_named(name)) {
            Some(attr) => attr.value = value.to_string(),
            None => self.attrs.push(Attr::new(name, value)),
        }
        self.sync_selectors();
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|a| !a.is_named(name));
        self.sync_selectors();
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn sync_selectors(&mut self) {
        self.id = self.attr("id").map(str::to_string);
        self.classes = self
            .attr("class")
            .map(|v| v.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

/// Parent and sibling links. Children form a doubly-linked list hung off
/// `first_child` / `last_child`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Links {
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub data: NodeData,
    pub links: Links,
}

impl Node {
    /// A node with no parent, siblings or children.
    pub fn new(data: NodeData) -> Self {
        Self {
            data,
            links: Links::default(),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document)
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Does this node count as content for `:empty`? Elements and
    /// non-whitespace text do; comments and blank text do not.
    pub fn is_content(&self) -> bool {
        match &self.data {
            NodeData::Element(_) => true,
            NodeData::Text(text) => !text.trim().is_empty(),
            NodeData::Document | NodeData::Comment(_) => false,
        }
    }
}
