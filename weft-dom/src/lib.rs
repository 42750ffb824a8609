//! Arena-backed document tree used as the host for template instances.

use std::cell::RefCell;
use std::rc::Rc;

pub mod host;
pub mod markup;
mod serialize;

pub use serialize::is_void_element;

pub use host::{Attribute, AttributeName, NodeKind, TreeHost};
pub use markup::MarkupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeData {
    Document,
    Doctype(String),
    Element { tag: String, attrs: Vec<Attribute> },
    Text(String),
    Comment(String),
    Fragment,
}

impl NodeData {
    fn kind(&self) -> NodeKind {
        match self {
            NodeData::Document => NodeKind::Document,
            NodeData::Doctype(_) => NodeKind::Doctype,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
            NodeData::Fragment => NodeKind::Fragment,
        }
    }
}

#[derive(Debug)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.node(node).parent {
                Some(p) => node = p,
                None => return false,
            }
        }
    }

    fn deep_clone(&mut self, id: NodeId, deep: bool) -> NodeId {
        let data = self.node(id).data.clone();
        let copy = self.alloc(data);
        if deep {
            let children = self.node(id).children.clone();
            for child in children {
                let child_copy = self.deep_clone(child, true);
                self.node_mut(child_copy).parent = Some(copy);
                self.node_mut(copy).children.push(child_copy);
            }
        }
        copy
    }
}

/// Shared handle to a document. Cloning the handle shares the tree, so
/// application code and template instances can mutate the same nodes.
#[derive(Debug, Clone)]
pub struct Document {
    arena: Rc<RefCell<Arena>>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut arena = Arena::default();
        let root = arena.alloc(NodeData::Document);
        Self {
            arena: Rc::new(RefCell::new(arena)),
            root,
        }
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn create_element(&self, tag: impl Into<String>) -> NodeId {
        self.arena.borrow_mut().alloc(NodeData::Element {
            tag: tag.into(),
            attrs: Vec::new(),
        })
    }

    pub fn create_comment(&self, data: impl Into<String>) -> NodeId {
        self.arena.borrow_mut().alloc(NodeData::Comment(data.into()))
    }

    pub fn create_doctype(&self, name: impl Into<String>) -> NodeId {
        self.arena.borrow_mut().alloc(NodeData::Doctype(name.into()))
    }

    /// Build an element with attributes and children in one go.
    pub fn h(&self, tag: impl Into<String>, attrs: Vec<(&str, &str)>, children: Vec<NodeId>) -> NodeId {
        let el = self.create_element(tag);
        for (k, v) in attrs {
            self.set_attribute(&el, &AttributeName::new(k), v);
        }
        for child in children {
            self.append_child(&el, &child);
        }
        el
    }

    pub fn text(&self, t: impl AsRef<str>) -> NodeId {
        self.create_text(t.as_ref())
    }

    /// Convenience lookup by plain (namespace-less) attribute name.
    pub fn attr(&self, element: NodeId, name: &str) -> Option<String> {
        self.get_attribute(&element, &AttributeName::new(name))
    }

    /// Parse markup into a new fragment owned by this document.
    pub fn parse_html(&self, markup: &str) -> Result<NodeId, MarkupError> {
        markup::parse_into(self, markup)
    }

    pub fn elements_by_tag_name(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(&root).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if self.tag_name(&node).is_some_and(|t| t.eq_ignore_ascii_case(tag)) {
                found.push(node);
            }
            stack.extend(self.children(&node).into_iter().rev());
        }
        found
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        serialize::inner_html(self, node)
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        serialize::outer_html(self, node)
    }

    pub(crate) fn data(&self, node: NodeId) -> NodeData {
        self.arena.borrow().node(node).data.clone()
    }
}

impl TreeHost for Document {
    type Node = NodeId;

    fn node_kind(&self, node: &NodeId) -> NodeKind {
        self.arena.borrow().node(*node).data.kind()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.arena.borrow().node(*node).parent
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.arena.borrow().node(*node).children.clone()
    }

    fn previous_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let arena = self.arena.borrow();
        let parent = arena.node(*node).parent?;
        let siblings = &arena.node(parent).children;
        let index = siblings.iter().position(|c| c == node)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let arena = self.arena.borrow();
        let parent = arena.node(*node).parent?;
        let siblings = &arena.node(parent).children;
        let index = siblings.iter().position(|c| c == node)?;
        siblings.get(index + 1).copied()
    }

    fn tag_name(&self, node: &NodeId) -> Option<String> {
        match &self.arena.borrow().node(*node).data {
            NodeData::Element { tag, .. } => Some(tag.clone()),
            _ => None,
        }
    }

    fn text_data(&self, node: &NodeId) -> Option<String> {
        match &self.arena.borrow().node(*node).data {
            NodeData::Text(t) | NodeData::Comment(t) => Some(t.clone()),
            _ => None,
        }
    }

    fn set_text_data(&self, node: &NodeId, data: &str) {
        let mut arena = self.arena.borrow_mut();
        match &mut arena.node_mut(*node).data {
            NodeData::Text(t) | NodeData::Comment(t) => {
                t.clear();
                t.push_str(data);
            }
            other => log::debug!("set_text_data ignored on {:?}", other.kind()),
        }
    }

    fn create_text(&self, data: &str) -> NodeId {
        self.arena.borrow_mut().alloc(NodeData::Text(data.to_string()))
    }

    fn create_fragment(&self) -> NodeId {
        self.arena.borrow_mut().alloc(NodeData::Fragment)
    }

    fn parse_fragment(&self, markup: &str, _context: Option<&NodeId>) -> Result<NodeId, MarkupError> {
        self.parse_html(markup)
    }

    fn clone_node(&self, node: &NodeId, deep: bool) -> NodeId {
        self.arena.borrow_mut().deep_clone(*node, deep)
    }

    fn insert_before(&self, parent: &NodeId, node: &NodeId, reference: Option<&NodeId>) {
        let mut arena = self.arena.borrow_mut();
        if arena.is_inclusive_ancestor(*node, *parent) {
            log::debug!("refusing to insert {node:?} into its own subtree");
            return;
        }

        // Inserting a fragment moves its children and leaves it empty.
        let moving: Vec<NodeId> = if arena.node(*node).data == NodeData::Fragment {
            std::mem::take(&mut arena.node_mut(*node).children)
        } else {
            vec![*node]
        };

        // A reference that is itself being moved is replaced by its next
        // sibling outside the moved set.
        let mut reference = reference.copied();
        while let Some(r) = reference {
            if !moving.contains(&r) {
                break;
            }
            let siblings = &arena.node(*parent).children;
            reference = siblings
                .iter()
                .position(|c| *c == r)
                .and_then(|i| siblings.get(i + 1).copied());
        }

        for id in &moving {
            arena.detach(*id);
        }

        let index = reference
            .and_then(|r| arena.node(*parent).children.iter().position(|c| *c == r))
            .unwrap_or(arena.node(*parent).children.len());
        for (offset, id) in moving.iter().enumerate() {
            arena.node_mut(*id).parent = Some(*parent);
            arena.node_mut(*parent).children.insert(index + offset, *id);
        }
    }

    fn remove(&self, node: &NodeId) {
        self.arena.borrow_mut().detach(*node);
    }

    fn attributes(&self, element: &NodeId) -> Vec<Attribute> {
        match &self.arena.borrow().node(*element).data {
            NodeData::Element { attrs, .. } => attrs.clone(),
            _ => Vec::new(),
        }
    }

    fn get_attribute(&self, element: &NodeId, name: &AttributeName) -> Option<String> {
        match &self.arena.borrow().node(*element).data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.matches(name))
                .map(|a| a.value.clone()),
            _ => None,
        }
    }

    fn set_attribute(&self, element: &NodeId, name: &AttributeName, value: &str) {
        let mut arena = self.arena.borrow_mut();
        if let NodeData::Element { attrs, .. } = &mut arena.node_mut(*element).data {
            match attrs.iter_mut().find(|a| a.name.matches(name)) {
                Some(existing) => existing.value = value.to_string(),
                None => attrs.push(Attribute {
                    name: name.clone(),
                    value: value.to_string(),
                }),
            }
        }
    }

    fn remove_attribute(&self, element: &NodeId, name: &AttributeName) {
        let mut arena = self.arena.borrow_mut();
        if let NodeData::Element { attrs, .. } = &mut arena.node_mut(*element).data {
            attrs.retain(|a| !a.name.matches(name));
        }
    }
}
