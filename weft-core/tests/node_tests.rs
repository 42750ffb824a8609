use serde_json::Value;
use weft_core::{NodePartMut, PartError, PartKind, PartMut, Replacement, TemplateEngine, TemplateInstance};
use weft_dom::{Document, NodeId, NodeKind, TreeHost};

fn instantiate(markup: &str) -> (Document, TemplateInstance<Document>) {
    let doc = Document::new();
    let template = doc.parse_html(markup).unwrap();
    let engine = TemplateEngine::new(doc.clone());
    let instance = engine.create_instance(&template, &Value::Null).unwrap();
    (doc, instance)
}

fn node_part<'a>(instance: &'a mut TemplateInstance<Document>, expression: &str) -> NodePartMut<'a, Document> {
    let id = instance.find(expression).unwrap();
    match instance.part_mut(id) {
        Some(PartMut::Node(part)) => part,
        _ => panic!("expected node part for {expression}"),
    }
}

fn element(doc: &Document, instance: &TemplateInstance<Document>, tag: &str) -> NodeId {
    doc.elements_by_tag_name(*instance.fragment(), tag)[0]
}

fn texts(doc: &Document, parent: NodeId) -> Vec<String> {
    doc.children(&parent).iter().map(|c| doc.text_content(c)).collect()
}

const FRAMED: &str = "<div><b>L</b>A{{ x }}B<i>R</i></div>";

#[test]
fn group_renders_in_order_between_anchors() {
    let (doc, mut instance) = instantiate(FRAMED);
    let div = element(&doc, &instance, "div");
    assert_eq!(texts(&doc, div), ["L", "A", "B", "R"]);

    let mut part = node_part(&mut instance, "x");
    assert!(!part.is_fully_templatized());
    part.set_value("X");
    assert_eq!(texts(&doc, div), ["L", "A", "X", "B", "R"]);
    assert_eq!(part.value(), "X");
    assert!(!part.is_detached());
}

#[test]
fn rewriting_keeps_the_text_node() {
    let (doc, mut instance) = instantiate(FRAMED);
    let div = element(&doc, &instance, "div");

    let mut part = node_part(&mut instance, "x");
    part.set_value("one");
    let first = part.replacement_nodes().to_vec();
    part.set_value("two");
    assert_eq!(part.replacement_nodes(), first.as_slice());
    assert_eq!(texts(&doc, div), ["L", "A", "two", "B", "R"]);
}

#[test]
fn detachment_is_sticky_then_recoverable() {
    let (doc, mut instance) = instantiate(FRAMED);
    let div = element(&doc, &instance, "div");
    let b = element(&doc, &instance, "b");
    let i = element(&doc, &instance, "i");

    let mut part = node_part(&mut instance, "x");
    part.set_value("X");

    doc.remove(&b);
    doc.remove(&i);
    part.set_value("Y");
    assert!(part.is_detached());
    assert_eq!(texts(&doc, div), ["A", "X", "B"]);

    part.set_value("Z");
    assert!(part.is_detached());
    assert_eq!(texts(&doc, div), ["A", "X", "B"]);
    assert_eq!(part.value(), "Z");

    // Put the leading anchor back in front of the last rendered content.
    let first = doc.first_child(&div);
    doc.insert_before(&div, &b, first.as_ref());
    part.set_value("W");
    assert!(!part.is_detached());
    assert_eq!(texts(&doc, div), ["L", "A", "W", "B"]);

    part.set_value("V");
    assert_eq!(texts(&doc, div), ["L", "A", "V", "B"]);
}

#[test]
fn trailing_anchor_alone_is_enough_to_recover() {
    let (doc, mut instance) = instantiate(FRAMED);
    let div = element(&doc, &instance, "div");
    let b = element(&doc, &instance, "b");
    let i = element(&doc, &instance, "i");

    let mut part = node_part(&mut instance, "x");
    part.set_value("X");
    doc.remove(&b);
    part.set_value("Y");
    assert!(!part.is_detached());
    assert_eq!(texts(&doc, div), ["A", "Y", "B", "R"]);
    assert_eq!(doc.next_sibling(&doc.children(&div)[2]), Some(i));
}

#[test]
fn swapped_anchors_detach() {
    let (doc, mut instance) = instantiate(FRAMED);
    let div = element(&doc, &instance, "div");
    let b = element(&doc, &instance, "b");

    let mut part = node_part(&mut instance, "x");
    part.set_value("X");
    doc.append_child(&div, &b);
    part.set_value("Y");
    assert!(part.is_detached());
    assert_eq!(texts(&doc, div), ["A", "X", "B", "R", "L"]);
}

#[test]
fn fully_templatized_owns_all_children() {
    let (doc, mut instance) = instantiate("<h2>{{ title }}</h2>");
    let h2 = element(&doc, &instance, "h2");

    let mut part = node_part(&mut instance, "title");
    assert!(part.is_fully_templatized());
    part.set_value("Hi");
    assert_eq!(doc.inner_html(h2), "Hi");

    let stray = doc.h("span", vec![], vec![]);
    doc.append_child(&h2, &stray);
    part.set_value("Yo");
    assert_eq!(doc.inner_html(h2), "Yo");
    assert_eq!(part.parent(), Some(h2));
}

#[test]
fn replace_mixes_text_and_nodes() {
    let (doc, mut instance) = instantiate("<p>Hello {{ who }}!</p>");
    let p = element(&doc, &instance, "p");
    let w = doc.text("W");
    let strong = doc.h("strong", vec![], vec![w]);

    let mut part = node_part(&mut instance, "who");
    part.replace([Replacement::from("big "), Replacement::Node(strong)])
        .unwrap();
    assert_eq!(doc.inner_html(p), "Hello big <strong>W</strong>!");
    assert_eq!(part.value(), "big W");
}

#[test]
fn replace_rejects_container_nodes() {
    let (doc, mut instance) = instantiate("<p>Hello {{ who }}!</p>");
    let p = element(&doc, &instance, "p");
    let fragment = doc.create_fragment();
    let doctype = doc.create_doctype("html");

    let mut part = node_part(&mut instance, "who");
    part.set_value("you");
    assert_eq!(
        part.replace([Replacement::Node(fragment)]),
        Err(PartError::InvalidContentKind(NodeKind::Fragment))
    );
    assert_eq!(
        part.replace([Replacement::from("ok"), Replacement::Node(doc.root())]),
        Err(PartError::InvalidContentKind(NodeKind::Document))
    );
    assert_eq!(
        part.replace([Replacement::Node(doctype)]),
        Err(PartError::InvalidContentKind(NodeKind::Doctype))
    );
    assert_eq!(doc.inner_html(p), "Hello you!");
}

#[test]
fn replace_html_parses_markup() {
    let (doc, mut instance) = instantiate("<ul>{{ items }}</ul>");
    let ul = element(&doc, &instance, "ul");

    let mut part = node_part(&mut instance, "items");
    part.replace_html("<li>a</li><li>b</li>").unwrap();
    assert_eq!(doc.inner_html(ul), "<li>a</li><li>b</li>");
    assert_eq!(part.replacement_nodes().len(), 2);

    assert!(matches!(part.replace_html("<li>"), Err(PartError::Markup(_))));
    assert_eq!(doc.inner_html(ul), "<li>a</li><li>b</li>");
}

#[test]
fn siblings_are_computed_across_the_group() {
    let (doc, mut instance) = instantiate("<p><b>x</b>A{{ one }}{{ two }}B</p>");
    let p = element(&doc, &instance, "p");

    let one = node_part(&mut instance, "one");
    let before = one.previous_sibling().unwrap();
    assert_eq!(doc.text_content(&before), "A");
    assert_eq!(doc.text_content(&one.next_sibling().unwrap()), "B");
    assert_eq!(one.parent(), Some(p));

    node_part(&mut instance, "two").set_value("2");
    let one = node_part(&mut instance, "one");
    assert_eq!(doc.text_content(&one.next_sibling().unwrap()), "2");

    let two = node_part(&mut instance, "two");
    assert_eq!(two.previous_sibling(), Some(before));
    assert_eq!(doc.inner_html(p), "<b>x</b>A2B");
}

#[test]
fn inner_part_exposes_template_and_directive() {
    let (doc, mut instance) = instantiate(
        r#"<ul><template expression="rows" directive="each"><li>row</li></template></ul>"#,
    );
    let ul = element(&doc, &instance, "ul");
    assert_eq!(doc.inner_html(ul), "");
    assert_eq!(instance.parts()[0].kind(), PartKind::Inner);

    let mut part = node_part(&mut instance, "rows");
    assert_eq!(part.directive(), Some("each"));
    let template = *part.template().unwrap();
    assert_eq!(doc.tag_name(&template).as_deref(), Some("template"));

    let rows: Vec<_> = (0..2)
        .map(|_| Replacement::Node(doc.clone_node(&doc.children(&template)[0], true)))
        .collect();
    part.replace(rows).unwrap();
    assert_eq!(doc.inner_html(ul), "<li>row</li><li>row</li>");
}

#[test]
fn mounted_fragment_keeps_updating() {
    let doc = Document::new();
    let template = doc.parse_html("{{ greeting }}, <b>{{ name }}</b>").unwrap();
    let engine = TemplateEngine::new(doc.clone());
    let state = serde_json::json!({ "greeting": "Hello", "name": "Ann" });
    let mut instance = engine.create_instance(&template, &state).unwrap();

    let body = doc.h("body", vec![], vec![]);
    doc.append_child(&body, instance.fragment());
    assert_eq!(doc.inner_html(body), "Hello,<b>Ann</b>");
    assert!(doc.children(instance.fragment()).is_empty());

    instance
        .update(&serde_json::json!({ "greeting": "Bye", "name": "Bo" }))
        .unwrap();
    assert_eq!(doc.inner_html(body), "Bye,<b>Bo</b>");
    assert_eq!(node_part(&mut instance, "greeting").parent(), Some(body));
}

#[test]
fn text_before_inner_template_stays_attached() {
    let (doc, mut instance) = instantiate(r#"<li>{{ a }}<template expression="rows"></template></li>"#);
    let li = element(&doc, &instance, "li");

    let mut a = node_part(&mut instance, "a");
    assert!(!a.is_fully_templatized());
    a.set_value("A");
    assert!(!a.is_detached());

    let mut rows = node_part(&mut instance, "rows");
    assert!(!rows.is_fully_templatized());
    rows.replace_html("<b>r</b>").unwrap();
    assert!(!rows.is_detached());
    assert_eq!(doc.inner_html(li), "A<b>r</b>");

    node_part(&mut instance, "a").set_value("B");
    assert_eq!(doc.inner_html(li), "B<b>r</b>");
}

#[test]
fn inner_template_before_text_stays_attached() {
    let (doc, mut instance) = instantiate(r#"<li><template expression="rows"></template>{{ a }}</li>"#);
    let li = element(&doc, &instance, "li");

    let mut rows = node_part(&mut instance, "rows");
    assert!(!rows.is_fully_templatized());
    rows.replace_html("<b>r</b>").unwrap();
    assert!(!rows.is_detached());

    let mut a = node_part(&mut instance, "a");
    assert!(!a.is_fully_templatized());
    a.set_value("A");
    assert!(!a.is_detached());
    assert_eq!(doc.inner_html(li), "<b>r</b>A");
}

#[test]
fn root_level_text_before_inner_template_stays_attached() {
    let (doc, mut instance) = instantiate(r#"{{ a }}<template expression="rows"></template>"#);

    let mut a = node_part(&mut instance, "a");
    a.set_value("A");
    assert!(!a.is_detached());

    let mut rows = node_part(&mut instance, "rows");
    rows.replace_html("<b>r</b>").unwrap();
    assert!(!rows.is_detached());
    assert_eq!(doc.inner_html(*instance.fragment()), "A<b>r</b>");
}

#[test]
fn mounted_part_survives_a_moved_neighbour() {
    let doc = Document::new();
    let template = doc.parse_html("<b>x</b>{{ a }}").unwrap();
    let engine = TemplateEngine::new(doc.clone());
    let mut instance = engine
        .create_instance(&template, &serde_json::json!({ "a": "1" }))
        .unwrap();

    let body = doc.h("body", vec![], vec![]);
    doc.append_child(&body, instance.fragment());
    let b = doc.elements_by_tag_name(body, "b")[0];
    let aside = doc.h("aside", vec![], vec![]);
    doc.append_child(&aside, &b);

    let mut part = node_part(&mut instance, "a");
    part.set_value("A");
    assert!(!part.is_detached());
    assert_eq!(part.parent(), Some(body));
    assert_eq!(doc.inner_html(body), "A");
    assert_eq!(doc.inner_html(aside), "<b>x</b>");
}

#[test]
fn part_displays_its_value() {
    let (_doc, mut instance) = instantiate(FRAMED);
    node_part(&mut instance, "x").set_value("X");

    let id = instance.find("x").unwrap();
    assert_eq!(instance.part_mut(id).unwrap().to_string(), "X");
}
