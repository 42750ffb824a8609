//! Records tying parts to their location in the live tree.

use weft_dom::AttributeName;

use crate::part::PartId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttributeEntry {
    Literal(String),
    Part(PartId),
}

/// One attribute of one element, rendered from literals and parts.
#[derive(Debug, Clone)]
pub(crate) struct AttributeValueSetter<N> {
    pub(crate) element: N,
    pub(crate) name: AttributeName,
    pub(crate) entries: Vec<AttributeEntry>,
}

impl<N> AttributeValueSetter<N> {
    /// The whole attribute value is a single placeholder.
    pub(crate) fn is_fully_templatized(&self) -> bool {
        matches!(self.entries.as_slice(), [AttributeEntry::Part(_)])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GroupEntry<N> {
    Literal(N),
    Part(PartId),
}

/// A contiguous templatized region of a parent's children.
///
/// A fully templatized setter owns every child of `parent`. Otherwise the
/// region is the span strictly between the two anchors; `parent` is `None`
/// for regions at the instance root, whose parent changes when the fragment
/// is mounted.
#[derive(Debug, Clone)]
pub(crate) struct NodeValueSetter<N> {
    pub(crate) parent: Option<N>,
    pub(crate) previous_sibling: Option<N>,
    pub(crate) next_sibling: Option<N>,
    pub(crate) fully_templatized: bool,
    pub(crate) group: Vec<GroupEntry<N>>,
    pub(crate) previous_replacement_nodes: Vec<N>,
    pub(crate) detached: bool,
}

impl<N> NodeValueSetter<N> {
    pub(crate) fn new(
        parent: Option<N>,
        previous_sibling: Option<N>,
        next_sibling: Option<N>,
        fully_templatized: bool,
    ) -> Self {
        Self {
            parent,
            previous_sibling,
            next_sibling,
            fully_templatized,
            group: Vec::new(),
            previous_replacement_nodes: Vec::new(),
            detached: false,
        }
    }
}
