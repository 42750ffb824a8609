use crate::{Document, NodeData, NodeId, TreeHost};

/// Void elements: no children, no closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

pub(crate) fn inner_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    for child in doc.children(&node) {
        write_node(doc, child, &mut out);
    }
    out
}

pub(crate) fn outer_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match doc.data(node) {
        NodeData::Document | NodeData::Fragment => {
            for child in doc.children(&node) {
                write_node(doc, child, out);
            }
        }
        NodeData::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(&name);
            out.push('>');
        }
        NodeData::Text(t) => escape_into(&t, false, out),
        NodeData::Comment(c) => {
            out.push_str("<!--");
            out.push_str(&c);
            out.push_str("-->");
        }
        NodeData::Element { tag, attrs } => {
            out.push('<');
            out.push_str(&tag);
            for a in &attrs {
                out.push(' ');
                out.push_str(&a.name.name);
                out.push_str("=\"");
                escape_into(&a.value, true, out);
                out.push('"');
            }
            out.push('>');
            if is_void_element(&tag) {
                return;
            }
            for child in doc.children(&node) {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        }
    }
}

fn escape_into(s: &str, attribute: bool, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
