use weft_dom::{NodeKind, TreeHost};

/// Whether a binding at `node` owns all of its parent's content.
///
/// Never true directly under the instance `root`; otherwise true when every
/// other sibling is whitespace-only text.
pub(crate) fn is_fully_templatizable<H: TreeHost>(host: &H, node: &H::Node, root: &H::Node) -> bool {
    let Some(parent) = host.parent(node) else {
        return false;
    };
    if parent == *root {
        return false;
    }
    host.children(&parent)
        .iter()
        .filter(|sibling| *sibling != node)
        .all(|sibling| {
            host.node_kind(sibling) == NodeKind::Text
                && host
                    .text_data(sibling)
                    .is_some_and(|data| data.chars().all(char::is_whitespace))
        })
}

#[cfg(test)]
mod tests {
    use weft_dom::{Document, TreeHost};

    use super::*;

    #[test]
    fn root_children_are_never_fully_templatized() {
        let doc = Document::new();
        let frag = doc.create_fragment();
        let text = doc.text("{{ x }}");
        doc.append_child(&frag, &text);
        assert!(!is_fully_templatizable(&doc, &text, &frag));
    }

    #[test]
    fn whitespace_siblings_do_not_count() {
        let doc = Document::new();
        let text = doc.text("{{ x }}");
        let pad = doc.text("\n  ");
        let li = doc.h("li", vec![], vec![pad, text]);
        let frag = doc.create_fragment();
        doc.append_child(&frag, &li);
        assert!(is_fully_templatizable(&doc, &text, &frag));
    }

    #[test]
    fn element_or_text_siblings_make_it_partial() {
        let doc = Document::new();
        let text = doc.text("{{ x }}");
        let label = doc.text("Name: ");
        let p = doc.h("p", vec![], vec![label, text]);
        let frag = doc.create_fragment();
        doc.append_child(&frag, &p);
        assert!(!is_fully_templatizable(&doc, &text, &frag));

        doc.remove(&label);
        let b = doc.h("b", vec![], vec![]);
        doc.append_child(&p, &b);
        assert!(!is_fully_templatizable(&doc, &text, &frag));
    }
}
