use weft_dom::{AttributeName, NodeKind, TreeHost};

use crate::config::TemplateConfig;
use crate::part::{InnerTemplate, PartStore, TemplatePart};
use crate::setter::{AttributeEntry, AttributeValueSetter, GroupEntry, NodeValueSetter};
use crate::templatize::is_fully_templatizable;
use crate::tokenizer::{Token, tokenize};
use crate::{attribute_apply, node_apply};

/// Walk the cloned content under `root` once, turn every placeholder into a
/// part and render the initial (placeholder-free) tree.
pub(crate) fn build_parts<H: TreeHost>(host: &H, root: H::Node, config: &TemplateConfig) -> PartStore<H::Node> {
    let mut store = PartStore::new(root);
    let root = store.root.clone();

    // Classify against the untouched tree: building removes templatized nodes.
    let plan: Vec<(H::Node, Option<bool>)> = descendants(host, &root, config)
        .into_iter()
        .map(|node| {
            let fully = is_templatized(host, &node, config).then(|| is_fully_templatizable(host, &node, &root));
            (node, fully)
        })
        .collect();
    insert_anchors(host, &root, &plan);

    for (node, fully) in plan {
        match (host.node_kind(&node), fully) {
            (NodeKind::Element, Some(fully)) => build_inner_part(host, &mut store, &node, fully, config),
            (NodeKind::Element, None) => build_attribute_parts(host, &mut store, &node),
            (NodeKind::Text, Some(fully)) => build_text_parts(host, &mut store, &node, fully),
            _ => {}
        }
    }
    store
}

/// Whether `node` is replaced by a node setter during the build.
fn is_templatized<H: TreeHost>(host: &H, node: &H::Node, config: &TemplateConfig) -> bool {
    match host.node_kind(node) {
        NodeKind::Element => is_template(host, node, config),
        NodeKind::Text => host
            .text_data(node)
            .is_some_and(|data| tokenize(data.trim()).len() > 1),
        _ => false,
    }
}

/// Give every templatized node anchors that survive the build.
///
/// Root-level nodes are framed by empty text on both sides so the region
/// stays traceable once the fragment is mounted elsewhere. Elsewhere an
/// empty text node separates two adjacent templatized siblings.
fn insert_anchors<H: TreeHost>(host: &H, root: &H::Node, plan: &[(H::Node, Option<bool>)]) {
    let templatized = |node: &H::Node| plan.iter().any(|(n, fully)| fully.is_some() && n == node);

    for (node, fully) in plan {
        let Some(fully) = fully else { continue };
        let Some(parent) = host.parent(node) else { continue };

        if parent == *root {
            let anchor = host.create_text("");
            host.insert_before(root, &anchor, Some(node));
            let next = host.next_sibling(node);
            if !next.as_ref().is_some_and(&templatized) {
                let anchor = host.create_text("");
                host.insert_before(root, &anchor, next.as_ref());
            }
        } else if !fully && host.previous_sibling(node).as_ref().is_some_and(&templatized) {
            let anchor = host.create_text("");
            host.insert_before(&parent, &anchor, Some(node));
        }
    }
}

fn is_template<H: TreeHost>(host: &H, node: &H::Node, config: &TemplateConfig) -> bool {
    host.tag_name(node)
        .is_some_and(|tag| tag.eq_ignore_ascii_case(&config.template_tag))
}

// Pre-order snapshot; nested templates are visited but not entered.
fn descendants<H: TreeHost>(host: &H, root: &H::Node, config: &TemplateConfig) -> Vec<H::Node> {
    let mut out = Vec::new();
    let mut stack: Vec<H::Node> = host.children(root).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        if !is_template(host, &node, config) {
            stack.extend(host.children(&node).into_iter().rev());
        }
        out.push(node);
    }
    out
}

/// Create a node setter anchored on `node`'s current siblings.
fn node_setter_for<H: TreeHost>(host: &H, root: &H::Node, node: &H::Node, fully: bool) -> NodeValueSetter<H::Node> {
    let parent = host.parent(node).filter(|parent| parent != root);
    NodeValueSetter::new(parent, host.previous_sibling(node), host.next_sibling(node), fully)
}

fn build_inner_part<H: TreeHost>(
    host: &H,
    store: &mut PartStore<H::Node>,
    template: &H::Node,
    fully: bool,
    config: &TemplateConfig,
) {
    let mut setter = node_setter_for(host, &store.root, template, fully);
    let expression = host
        .get_attribute(template, &AttributeName::new(config.expression_attribute.as_str()))
        .map(|e| e.trim().to_string())
        .unwrap_or_default();
    let directive = host.get_attribute(template, &AttributeName::new(config.directive_attribute.as_str()));

    let index = store.node_setters.len();
    let inner = InnerTemplate {
        template: template.clone(),
        directive,
    };
    let id = store.push_part(TemplatePart::node(expression, index, Some(inner)));
    setter.group.push(GroupEntry::Part(id));
    store.node_setters.push(setter);

    host.remove(template);
    node_apply::apply(host, store, index);
}

fn build_attribute_parts<H: TreeHost>(host: &H, store: &mut PartStore<H::Node>, element: &H::Node) {
    for attribute in host.attributes(element) {
        let tokens = tokenize(attribute.value.trim());
        if tokens.len() <= 1 {
            continue;
        }

        let index = store.attribute_setters.len();
        let mut entries = Vec::with_capacity(tokens.len());
        for token in tokens {
            match token {
                Token::Literal(text) if text.is_empty() => {}
                Token::Literal(text) => entries.push(AttributeEntry::Literal(text)),
                Token::Placeholder(expression) => {
                    let id = store.push_part(TemplatePart::attribute(expression, index));
                    entries.push(AttributeEntry::Part(id));
                }
            }
        }
        store.attribute_setters.push(AttributeValueSetter {
            element: element.clone(),
            name: attribute.name,
            entries,
        });
        attribute_apply::apply(host, store, index);
    }
}

fn build_text_parts<H: TreeHost>(host: &H, store: &mut PartStore<H::Node>, text: &H::Node, fully: bool) {
    let data = host.text_data(text).unwrap_or_default();
    let tokens = tokenize(data.trim());

    let mut setter = node_setter_for(host, &store.root, text, fully);
    let index = store.node_setters.len();
    for token in tokens {
        match token {
            Token::Literal(literal) if literal.is_empty() => {}
            Token::Literal(literal) => setter.group.push(GroupEntry::Literal(host.create_text(&literal))),
            Token::Placeholder(expression) => {
                let id = store.push_part(TemplatePart::node(expression, index, None));
                setter.group.push(GroupEntry::Part(id));
            }
        }
    }
    store.node_setters.push(setter);

    host.remove(text);
    node_apply::apply(host, store, index);
}
