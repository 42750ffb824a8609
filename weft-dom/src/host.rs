use std::fmt;

use crate::MarkupError;

/// The kind of a node in a host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Doctype,
    Element,
    Text,
    Comment,
    Fragment,
}

impl NodeKind {
    /// Containers that can never be spliced into another node's children as themselves.
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::Doctype | NodeKind::Fragment)
    }
}

/// Attribute identity: namespace plus qualified name (`prefix:local` or `local`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeName {
    pub namespace: Option<String>,
    pub name: String,
}

impl AttributeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    pub fn with_namespace(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Namespace and local name both match; the prefix is not part of identity.
    pub fn matches(&self, other: &AttributeName) -> bool {
        self.namespace == other.namespace && self.local_name() == other.local_name()
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for AttributeName {
    fn from(name: &str) -> Self {
        AttributeName::new(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: AttributeName,
    pub value: String,
}

/// Capability interface over a mutable ordered tree.
///
/// Every query returns an owned snapshot; nothing aliases the tree's own
/// child lists. Hosts are expected to be cheap shared handles, so `&self`
/// is enough to mutate.
pub trait TreeHost {
    type Node: Clone + PartialEq + fmt::Debug;

    fn node_kind(&self, node: &Self::Node) -> NodeKind;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;
    fn previous_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
    fn tag_name(&self, node: &Self::Node) -> Option<String>;

    fn first_child(&self, node: &Self::Node) -> Option<Self::Node> {
        self.children(node).into_iter().next()
    }

    /// Data of a text or comment node.
    fn text_data(&self, node: &Self::Node) -> Option<String>;
    fn set_text_data(&self, node: &Self::Node, data: &str);

    fn text_content(&self, node: &Self::Node) -> String {
        match self.node_kind(node) {
            NodeKind::Text | NodeKind::Comment => self.text_data(node).unwrap_or_default(),
            NodeKind::Doctype => String::new(),
            _ => self
                .children(node)
                .iter()
                .filter(|child| self.node_kind(child) != NodeKind::Comment)
                .map(|child| self.text_content(child))
                .collect(),
        }
    }

    fn create_text(&self, data: &str) -> Self::Node;
    fn create_fragment(&self) -> Self::Node;

    /// Parse markup into a new fragment. `context` is the element the markup
    /// is destined for, when known.
    fn parse_fragment(
        &self,
        markup: &str,
        context: Option<&Self::Node>,
    ) -> Result<Self::Node, MarkupError>;

    fn clone_node(&self, node: &Self::Node, deep: bool) -> Self::Node;

    /// Insert `node` into `parent` before `reference`, or at the end when
    /// `reference` is `None`.
    fn insert_before(&self, parent: &Self::Node, node: &Self::Node, reference: Option<&Self::Node>);

    fn append_child(&self, parent: &Self::Node, node: &Self::Node) {
        self.insert_before(parent, node, None);
    }

    /// Detach `node` from its parent, if any.
    fn remove(&self, node: &Self::Node);

    fn attributes(&self, element: &Self::Node) -> Vec<Attribute>;
    fn get_attribute(&self, element: &Self::Node, name: &AttributeName) -> Option<String>;
    fn set_attribute(&self, element: &Self::Node, name: &AttributeName, value: &str);
    fn remove_attribute(&self, element: &Self::Node, name: &AttributeName);

    fn has_attribute(&self, element: &Self::Node, name: &AttributeName) -> bool {
        self.get_attribute(element, name).is_some()
    }

    /// True when `a` comes before `b` in tree order. Nodes in different
    /// trees never precede each other.
    fn precedes(&self, a: &Self::Node, b: &Self::Node) -> bool {
        let path_a = tree_path(self, a);
        let path_b = tree_path(self, b);
        if path_a.0 != path_b.0 {
            return false;
        }
        path_a.1 < path_b.1
    }
}

// (root, child indices from root down to node)
fn tree_path<H: TreeHost + ?Sized>(host: &H, node: &H::Node) -> (H::Node, Vec<usize>) {
    let mut indices = Vec::new();
    let mut current = node.clone();
    while let Some(parent) = host.parent(&current) {
        let index = host
            .children(&parent)
            .iter()
            .position(|child| *child == current)
            .unwrap_or(0);
        indices.push(index);
        current = parent;
    }
    indices.reverse();
    (current, indices)
}
