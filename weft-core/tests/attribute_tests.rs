use serde_json::Value;
use weft_core::{AttributePartMut, PartError, PartMut, TemplateEngine, TemplateInstance};
use weft_dom::{AttributeName, Document, NodeId, TreeHost};

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

fn instantiate(markup: &str) -> (Document, TemplateInstance<Document>) {
    let doc = Document::new();
    let template = doc.parse_html(markup).unwrap();
    let engine = TemplateEngine::new(doc.clone());
    let instance = engine.create_instance(&template, &Value::Null).unwrap();
    (doc, instance)
}

fn attribute_part<'a>(
    instance: &'a mut TemplateInstance<Document>,
    expression: &str,
) -> AttributePartMut<'a, Document> {
    let id = instance.find(expression).unwrap();
    match instance.part_mut(id) {
        Some(PartMut::Attribute(part)) => part,
        _ => panic!("expected attribute part for {expression}"),
    }
}

fn element(doc: &Document, instance: &TemplateInstance<Document>, tag: &str) -> NodeId {
    doc.elements_by_tag_name(*instance.fragment(), tag)[0]
}

#[test]
fn fully_templatized_value_and_null() {
    let (doc, mut instance) = instantiate(r#"<a href="{{ url }}">x</a>"#);
    let a = element(&doc, &instance, "a");
    assert_eq!(doc.attr(a, "href").as_deref(), Some(""));

    let mut part = attribute_part(&mut instance, "url");
    assert!(part.is_fully_templatized());
    assert_eq!(part.attribute_name(), "href");
    assert_eq!(*part.element(), a);

    part.set_value(Some("/home"));
    assert_eq!(doc.attr(a, "href").as_deref(), Some("/home"));
    assert_eq!(part.value().as_deref(), Some("/home"));

    part.set_value(None);
    assert_eq!(doc.attr(a, "href"), None);
    assert_eq!(part.value(), None);
    assert!(!part.boolean_value());
}

#[test]
fn partial_attribute_concatenates_and_is_idempotent() {
    let (doc, mut instance) = instantiate(r#"<div class="card {{ tone }} wide"></div>"#);
    let div = element(&doc, &instance, "div");
    assert_eq!(doc.attr(div, "class").as_deref(), Some("card  wide"));

    let mut part = attribute_part(&mut instance, "tone");
    assert!(!part.is_fully_templatized());
    part.set_value(Some("warm"));
    assert_eq!(doc.attr(div, "class").as_deref(), Some("card warm wide"));
    part.set_value(Some("warm"));
    assert_eq!(doc.attr(div, "class").as_deref(), Some("card warm wide"));
    assert_eq!(part.value().as_deref(), Some("warm"));
}

#[test]
fn boolean_value_rejected_on_partial_attribute() {
    let (doc, mut instance) = instantiate(r#"<div class="card {{ tone }}"></div>"#);
    let div = element(&doc, &instance, "div");

    let mut part = attribute_part(&mut instance, "tone");
    part.set_value(Some("cold"));
    assert_eq!(part.set_boolean_value(false), Err(PartError::UnsupportedOperation));
    assert_eq!(doc.attr(div, "class").as_deref(), Some("card cold"));
}

#[test]
fn boolean_value_toggles_presence() {
    let (doc, mut instance) = instantiate(r#"<button disabled="{{ locked }}">go</button>"#);
    let button = element(&doc, &instance, "button");

    let mut part = attribute_part(&mut instance, "locked");
    part.set_boolean_value(false).unwrap();
    assert_eq!(doc.attr(button, "disabled"), None);
    assert!(!part.boolean_value());

    part.set_boolean_value(true).unwrap();
    assert_eq!(doc.attr(button, "disabled").as_deref(), Some(""));
    assert!(part.boolean_value());
}

#[test]
fn several_parts_share_one_attribute() {
    let (doc, mut instance) = instantiate(r#"<img alt="{{ first }} {{ last }}">"#);
    let img = element(&doc, &instance, "img");

    attribute_part(&mut instance, "first").set_value(Some("Ada"));
    attribute_part(&mut instance, "last").set_value(Some("Lovelace"));
    assert_eq!(doc.attr(img, "alt").as_deref(), Some("Ada Lovelace"));
    assert!(!attribute_part(&mut instance, "first").is_fully_templatized());
}

#[test]
fn namespaced_attribute() {
    let (doc, mut instance) = instantiate(r##"<svg><use xlink:href="#{{ icon }}"/></svg>"##);
    let use_el = element(&doc, &instance, "use");

    let mut part = attribute_part(&mut instance, "icon");
    assert_eq!(part.attribute_name(), "xlink:href");
    assert_eq!(part.attribute_namespace(), Some(XLINK_NS));

    part.set_value(Some("star"));
    let name = AttributeName::with_namespace(XLINK_NS, "xlink:href");
    assert_eq!(doc.get_attribute(&use_el, &name).as_deref(), Some("#star"));
}
