use std::fmt;

use weft_dom::{NodeKind, TreeHost};

use crate::error::PartError;
use crate::setter::{AttributeValueSetter, GroupEntry, NodeValueSetter};
use crate::{attribute_apply, node_apply};

/// Position of a part in its instance's part list (document order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub(crate) usize);

impl PartId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// Bound into an attribute value.
    Attribute,
    /// Bound to inline text content.
    Node,
    /// Bound where a nested sub-template element used to be.
    Inner,
}

#[derive(Debug, Clone)]
pub(crate) struct InnerTemplate<N> {
    pub(crate) template: N,
    pub(crate) directive: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) enum Binding<N> {
    Attribute {
        setter: usize,
        value: Option<String>,
    },
    Node {
        setter: usize,
        replacement_nodes: Vec<N>,
        inner: Option<InnerTemplate<N>>,
    },
}

/// A live binding between an expression and a place in the rendered tree.
///
/// Parts are read through the instance; mutation goes through [`PartMut`]
/// so every write reconciles the tree immediately.
#[derive(Debug, Clone)]
pub struct TemplatePart<N> {
    expression: String,
    pub(crate) binding: Binding<N>,
}

impl<N> TemplatePart<N> {
    pub(crate) fn attribute(expression: String, setter: usize) -> Self {
        Self {
            expression,
            binding: Binding::Attribute {
                setter,
                value: Some(String::new()),
            },
        }
    }

    pub(crate) fn node(expression: String, setter: usize, inner: Option<InnerTemplate<N>>) -> Self {
        Self {
            expression,
            binding: Binding::Node {
                setter,
                replacement_nodes: Vec::new(),
                inner,
            },
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn kind(&self) -> PartKind {
        match &self.binding {
            Binding::Attribute { .. } => PartKind::Attribute,
            Binding::Node { inner: None, .. } => PartKind::Node,
            Binding::Node { inner: Some(_), .. } => PartKind::Inner,
        }
    }

    pub(crate) fn setter_index(&self) -> usize {
        match &self.binding {
            Binding::Attribute { setter, .. } | Binding::Node { setter, .. } => *setter,
        }
    }

    pub(crate) fn replacement_nodes(&self) -> &[N] {
        match &self.binding {
            Binding::Node {
                replacement_nodes, ..
            } => replacement_nodes,
            Binding::Attribute { .. } => &[],
        }
    }

    pub(crate) fn attribute_value(&self) -> Option<&str> {
        match &self.binding {
            Binding::Attribute { value, .. } => value.as_deref(),
            Binding::Node { .. } => None,
        }
    }
}

/// Content handed to [`NodePartMut::replace`].
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement<N> {
    Text(String),
    Node(N),
}

impl<N> From<&str> for Replacement<N> {
    fn from(text: &str) -> Self {
        Replacement::Text(text.to_string())
    }
}

impl<N> From<String> for Replacement<N> {
    fn from(text: String) -> Self {
        Replacement::Text(text)
    }
}

/// Parts and setters of one instance. Setters refer to parts by id and parts
/// refer to setters by index, so the whole graph lives in flat vectors.
#[derive(Debug)]
pub(crate) struct PartStore<N> {
    pub(crate) root: N,
    pub(crate) parts: Vec<TemplatePart<N>>,
    pub(crate) attribute_setters: Vec<AttributeValueSetter<N>>,
    pub(crate) node_setters: Vec<NodeValueSetter<N>>,
}

impl<N> PartStore<N> {
    pub(crate) fn new(root: N) -> Self {
        Self {
            root,
            parts: Vec::new(),
            attribute_setters: Vec::new(),
            node_setters: Vec::new(),
        }
    }

    pub(crate) fn push_part(&mut self, part: TemplatePart<N>) -> PartId {
        self.parts.push(part);
        PartId(self.parts.len() - 1)
    }

    pub(crate) fn part(&self, id: PartId) -> &TemplatePart<N> {
        &self.parts[id.0]
    }
}

/// Mutable access to one part of an instance.
pub enum PartMut<'a, H: TreeHost> {
    Attribute(AttributePartMut<'a, H>),
    Node(NodePartMut<'a, H>),
}

impl<'a, H: TreeHost> PartMut<'a, H> {
    pub(crate) fn new(host: &'a H, store: &'a mut PartStore<H::Node>, id: PartId) -> Option<Self> {
        let is_attribute = matches!(store.parts.get(id.0)?.binding, Binding::Attribute { .. });
        Some(if is_attribute {
            PartMut::Attribute(AttributePartMut { host, store, id })
        } else {
            PartMut::Node(NodePartMut { host, store, id })
        })
    }

    pub fn id(&self) -> PartId {
        match self {
            PartMut::Attribute(part) => part.id,
            PartMut::Node(part) => part.id,
        }
    }

    pub fn expression(&self) -> &str {
        match self {
            PartMut::Attribute(part) => part.expression(),
            PartMut::Node(part) => part.expression(),
        }
    }

    pub fn kind(&self) -> PartKind {
        match self {
            PartMut::Attribute(part) => part.store.part(part.id).kind(),
            PartMut::Node(part) => part.store.part(part.id).kind(),
        }
    }

    pub fn value(&self) -> Option<String> {
        match self {
            PartMut::Attribute(part) => part.value(),
            PartMut::Node(part) => Some(part.value()),
        }
    }

    /// `None` removes a fully templatized attribute; node parts render it as
    /// empty text.
    pub fn set_value(&mut self, value: Option<&str>) {
        match self {
            PartMut::Attribute(part) => part.set_value(value),
            PartMut::Node(part) => part.set_value(value.unwrap_or_default()),
        }
    }
}

/// Formats the part's current value; an absent attribute value is empty.
impl<H: TreeHost> fmt::Display for PartMut<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value().unwrap_or_default())
    }
}

pub struct AttributePartMut<'a, H: TreeHost> {
    host: &'a H,
    store: &'a mut PartStore<H::Node>,
    id: PartId,
}

impl<H: TreeHost> AttributePartMut<'_, H> {
    fn setter(&self) -> &AttributeValueSetter<H::Node> {
        &self.store.attribute_setters[self.store.part(self.id).setter_index()]
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn expression(&self) -> &str {
        self.store.part(self.id).expression()
    }

    pub fn element(&self) -> &H::Node {
        &self.setter().element
    }

    /// Qualified name of the bound attribute.
    pub fn attribute_name(&self) -> &str {
        &self.setter().name.name
    }

    pub fn attribute_namespace(&self) -> Option<&str> {
        self.setter().name.namespace.as_deref()
    }

    pub fn is_fully_templatized(&self) -> bool {
        self.setter().is_fully_templatized()
    }

    /// The live attribute value when the part owns the whole attribute,
    /// otherwise this part's own string.
    pub fn value(&self) -> Option<String> {
        let setter = self.setter();
        if setter.is_fully_templatized() {
            self.host.get_attribute(&setter.element, &setter.name)
        } else {
            self.store.part(self.id).attribute_value().map(str::to_string)
        }
    }

    pub fn set_value(&mut self, value: Option<&str>) {
        let stored = if self.is_fully_templatized() {
            value.map(str::to_string)
        } else {
            Some(value.unwrap_or_default().to_string())
        };
        self.store_value(stored);
        self.apply();
    }

    /// Whether the element currently carries the attribute.
    pub fn boolean_value(&self) -> bool {
        let setter = self.setter();
        self.host.has_attribute(&setter.element, &setter.name)
    }

    pub fn set_boolean_value(&mut self, value: bool) -> Result<(), PartError> {
        if !self.is_fully_templatized() {
            return Err(PartError::UnsupportedOperation);
        }
        self.store_value(value.then(String::new));
        self.apply();
        Ok(())
    }

    fn store_value(&mut self, new_value: Option<String>) {
        if let Binding::Attribute { value, .. } = &mut self.store.parts[self.id.0].binding {
            *value = new_value;
        }
    }

    fn apply(&self) {
        attribute_apply::apply(self.host, &*self.store, self.store.part(self.id).setter_index());
    }
}

pub struct NodePartMut<'a, H: TreeHost> {
    host: &'a H,
    store: &'a mut PartStore<H::Node>,
    id: PartId,
}

impl<H: TreeHost> NodePartMut<'_, H> {
    fn setter_index(&self) -> usize {
        self.store.part(self.id).setter_index()
    }

    fn setter(&self) -> &NodeValueSetter<H::Node> {
        &self.store.node_setters[self.setter_index()]
    }

    fn inner(&self) -> Option<&InnerTemplate<H::Node>> {
        match &self.store.part(self.id).binding {
            Binding::Node { inner, .. } => inner.as_ref(),
            Binding::Attribute { .. } => None,
        }
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn expression(&self) -> &str {
        self.store.part(self.id).expression()
    }

    /// Nodes currently rendered for this part.
    pub fn replacement_nodes(&self) -> &[H::Node] {
        self.store.part(self.id).replacement_nodes()
    }

    /// Text content of the replacement nodes, concatenated.
    pub fn value(&self) -> String {
        self.replacement_nodes()
            .iter()
            .map(|node| self.host.text_content(node))
            .collect()
    }

    /// Render `value` as a single text node.
    ///
    /// A lone text node already rendered for this part is updated in place
    /// as long as the region is intact, so a detached region never has its
    /// last rendered text changed underneath it.
    pub fn set_value(&mut self, value: &str) {
        let reusable = match self.replacement_nodes() {
            [only]
                if self.host.node_kind(only) == NodeKind::Text
                    && node_apply::is_consistent(self.host, self.setter()) =>
            {
                Some(only.clone())
            }
            _ => None,
        };
        match reusable {
            Some(text) => self.host.set_text_data(&text, value),
            None => {
                let text = self.host.create_text(value);
                self.set_replacement_nodes(vec![text]);
            }
        }
        self.apply();
    }

    /// Render `items` in order; text items become new text nodes.
    pub fn replace<I>(&mut self, items: I) -> Result<(), PartError>
    where
        I: IntoIterator<Item = Replacement<H::Node>>,
    {
        let items: Vec<_> = items.into_iter().collect();
        for item in &items {
            if let Replacement::Node(node) = item {
                let kind = self.host.node_kind(node);
                if kind.is_container() {
                    return Err(PartError::InvalidContentKind(kind));
                }
            }
        }
        let nodes = items
            .into_iter()
            .map(|item| match item {
                Replacement::Text(text) => self.host.create_text(&text),
                Replacement::Node(node) => node,
            })
            .collect();
        self.set_replacement_nodes(nodes);
        self.apply();
        Ok(())
    }

    /// Parse `markup` in the context of the region's parent and render the
    /// resulting nodes.
    pub fn replace_html(&mut self, markup: &str) -> Result<(), PartError> {
        let context = self.parent().unwrap_or_else(|| self.store.root.clone());
        let fragment = self.host.parse_fragment(markup, Some(&context))?;
        let nodes = self.host.children(&fragment);
        self.set_replacement_nodes(nodes);
        self.apply();
        Ok(())
    }

    pub fn is_detached(&self) -> bool {
        self.setter().detached
    }

    pub fn is_fully_templatized(&self) -> bool {
        self.setter().fully_templatized
    }

    pub fn parent(&self) -> Option<H::Node> {
        node_apply::effective_parent(self.host, self.setter())
    }

    /// The node rendered just before this part's content: the nearest
    /// literal or non-empty neighbouring part in the group, else the region
    /// anchor.
    pub fn previous_sibling(&self) -> Option<H::Node> {
        let setter = self.setter();
        let position = self.group_position();
        setter.group[..position]
            .iter()
            .rev()
            .find_map(|entry| match entry {
                GroupEntry::Literal(node) => Some(node.clone()),
                GroupEntry::Part(id) => self.store.part(*id).replacement_nodes().last().cloned(),
            })
            .or_else(|| setter.previous_sibling.clone())
    }

    pub fn next_sibling(&self) -> Option<H::Node> {
        let setter = self.setter();
        let position = self.group_position();
        setter.group[position + 1..]
            .iter()
            .find_map(|entry| match entry {
                GroupEntry::Literal(node) => Some(node.clone()),
                GroupEntry::Part(id) => self.store.part(*id).replacement_nodes().first().cloned(),
            })
            .or_else(|| setter.next_sibling.clone())
    }

    /// The sub-template element an inner part replaced.
    pub fn template(&self) -> Option<&H::Node> {
        self.inner().map(|inner| &inner.template)
    }

    pub fn directive(&self) -> Option<&str> {
        self.inner().and_then(|inner| inner.directive.as_deref())
    }

    fn group_position(&self) -> usize {
        self.setter()
            .group
            .iter()
            .position(|entry| *entry == GroupEntry::Part(self.id))
            .unwrap_or(0)
    }

    fn set_replacement_nodes(&mut self, nodes: Vec<H::Node>) {
        if let Binding::Node {
            replacement_nodes, ..
        } = &mut self.store.parts[self.id.0].binding
        {
            *replacement_nodes = nodes;
        }
    }

    fn apply(&mut self) {
        let setter = self.setter_index();
        node_apply::apply(self.host, self.store, setter);
    }
}
