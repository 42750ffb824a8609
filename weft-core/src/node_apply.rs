use weft_dom::TreeHost;

use crate::part::PartStore;
use crate::setter::{GroupEntry, NodeValueSetter};

/// A resolved region: everything strictly between `previous` and `next`
/// under `parent`. A missing anchor means the start or end of `parent`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Region<N> {
    pub(crate) parent: N,
    pub(crate) previous: Option<N>,
    pub(crate) next: Option<N>,
}

/// Parents the setter might render into, most likely first: its recorded
/// parent, or for a root-level setter wherever the last rendered nodes and
/// the anchors currently live.
fn candidate_parents<H: TreeHost>(host: &H, setter: &NodeValueSetter<H::Node>) -> Vec<H::Node> {
    if let Some(parent) = &setter.parent {
        return vec![parent.clone()];
    }
    let mut candidates: Vec<H::Node> = Vec::new();
    let nodes = setter
        .previous_replacement_nodes
        .iter()
        .chain(&setter.next_sibling)
        .chain(&setter.previous_sibling);
    for parent in nodes.filter_map(|node| host.parent(node)) {
        if !candidates.contains(&parent) {
            candidates.push(parent);
        }
    }
    candidates
}

/// The parent the setter renders into: the one its region resolves under,
/// else the most likely candidate.
pub(crate) fn effective_parent<H: TreeHost>(host: &H, setter: &NodeValueSetter<H::Node>) -> Option<H::Node> {
    match resolve_anchors(host, setter) {
        Some(region) => Some(region.parent),
        None => candidate_parents(host, setter).into_iter().next(),
    }
}

/// Re-derive the region of a partially templatized setter.
///
/// When one anchor has been moved out of the parent, it is recovered from
/// the nodes rendered last time on that side, provided the other anchor is
/// still in place. Returns `None` when the region cannot be traced under
/// any candidate parent.
pub(crate) fn resolve_anchors<H: TreeHost>(
    host: &H,
    setter: &NodeValueSetter<H::Node>,
) -> Option<Region<H::Node>> {
    candidate_parents(host, setter)
        .into_iter()
        .find_map(|parent| resolve_under(host, setter, parent))
}

fn resolve_under<H: TreeHost>(
    host: &H,
    setter: &NodeValueSetter<H::Node>,
    parent: H::Node,
) -> Option<Region<H::Node>> {
    let is_child = |node: &H::Node| host.parent(node).as_ref() == Some(&parent);
    let in_place = |anchor: &Option<H::Node>| anchor.as_ref().is_none_or(|node| is_child(node));

    let mut previous = setter.previous_sibling.clone();
    let mut next = setter.next_sibling.clone();

    match (in_place(&previous), in_place(&next)) {
        (true, true) => {}
        (true, false) => {
            let last = setter.previous_replacement_nodes.last().filter(|n| is_child(n))?;
            next = host.next_sibling(last);
        }
        (false, true) => {
            let first = setter.previous_replacement_nodes.first().filter(|n| is_child(n))?;
            previous = host.previous_sibling(first);
        }
        (false, false) => return None,
    }

    if let (Some(p), Some(n)) = (&previous, &next) {
        if p == n || host.precedes(n, p) {
            return None;
        }
    }

    Some(Region {
        parent,
        previous,
        next,
    })
}

/// Whether a write would currently reach the tree.
pub(crate) fn is_consistent<H: TreeHost>(host: &H, setter: &NodeValueSetter<H::Node>) -> bool {
    setter.fully_templatized || resolve_anchors(host, setter).is_some()
}

fn rendered_nodes<N: Clone>(store: &PartStore<N>, setter: &NodeValueSetter<N>) -> Vec<N> {
    let mut nodes = Vec::new();
    for entry in &setter.group {
        match entry {
            GroupEntry::Literal(node) => nodes.push(node.clone()),
            GroupEntry::Part(id) => nodes.extend(store.part(*id).replacement_nodes().iter().cloned()),
        }
    }
    nodes
}

/// Render the binding group of setter `index` into the tree, or mark the
/// setter detached and leave the tree alone.
pub(crate) fn apply<H: TreeHost>(host: &H, store: &mut PartStore<H::Node>, index: usize) {
    let nodes = rendered_nodes(store, &store.node_setters[index]);
    let setter = &mut store.node_setters[index];
    log::trace!("reconciling node setter {index} with {} nodes", nodes.len());

    if setter.fully_templatized {
        let Some(parent) = setter.parent.clone() else {
            setter.detached = true;
            return;
        };
        for child in host.children(&parent) {
            host.remove(&child);
        }
        for node in &nodes {
            host.append_child(&parent, node);
        }
    } else {
        let Some(region) = resolve_anchors(host, setter) else {
            if !setter.detached {
                log::debug!("node setter {index} detached: anchors no longer frame its region");
            }
            setter.detached = true;
            return;
        };

        let mut cursor = match &region.previous {
            Some(previous) => host.next_sibling(previous),
            None => host.first_child(&region.parent),
        };
        while let Some(node) = cursor {
            if region.next.as_ref() == Some(&node) {
                break;
            }
            cursor = host.next_sibling(&node);
            host.remove(&node);
        }
        for node in &nodes {
            host.insert_before(&region.parent, node, region.next.as_ref());
        }

        if setter.detached {
            log::debug!("node setter {index} re-attached");
        }
        setter.previous_sibling = region.previous;
        setter.next_sibling = region.next;
    }

    setter.previous_replacement_nodes = nodes;
    setter.detached = false;
}
