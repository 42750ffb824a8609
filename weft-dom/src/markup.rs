use pest::Parser;
use pest::iterators::Pair;
use thiserror::Error;

use crate::{AttributeName, Document, NodeId, TreeHost};

#[derive(pest_derive::Parser)]
#[grammar = "markup.pest"]
struct MarkupParser;

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Markup could not be turned into nodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("invalid markup: {0}")]
    Syntax(String),
}

/// Parse `source` into a new fragment node of `doc`.
pub(crate) fn parse_into(doc: &Document, source: &str) -> Result<NodeId, MarkupError> {
    let mut pairs =
        MarkupParser::parse(Rule::fragment, source).map_err(|e| MarkupError::Syntax(e.to_string()))?;
    let file = pairs
        .next()
        .ok_or_else(|| MarkupError::Syntax("empty parse".to_string()))?;

    let fragment = doc.create_fragment();
    for node in file.into_inner() {
        append_pair(doc, fragment, node);
    }
    Ok(fragment)
}

fn append_pair(doc: &Document, parent: NodeId, pair: Pair<Rule>) {
    let node = match pair.as_rule() {
        Rule::text => Some(doc.create_text(&decode_entities(pair.as_str()))),
        Rule::comment => {
            let body = pair.into_inner().next().map(|p| p.as_str()).unwrap_or_default();
            Some(doc.create_comment(body))
        }
        Rule::doctype => {
            let name = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("html");
            Some(doc.create_doctype(name))
        }
        Rule::self_closing | Rule::void_element | Rule::paired_element => build_element(doc, pair),
        // EOI
        _ => None,
    };
    if let Some(node) = node {
        doc.append_child(&parent, &node);
    }
}

fn build_element(doc: &Document, pair: Pair<Rule>) -> Option<NodeId> {
    let mut el: Option<NodeId> = None;
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::tag_name | Rule::void_name => {
                el = Some(doc.create_element(part.as_str().to_ascii_lowercase()));
            }
            Rule::attribute => {
                if let Some(el) = el {
                    let (name, value) = parse_attr(part);
                    doc.set_attribute(&el, &name, &value);
                }
            }
            _ => {
                if let Some(el) = el {
                    append_pair(doc, el, part);
                }
            }
        }
    }
    el
}

fn parse_attr(attr: Pair<Rule>) -> (AttributeName, String) {
    // attribute = attr_name ( "=" value )?
    let mut name = String::new();
    let mut value = String::new();

    for part in attr.into_inner() {
        match part.as_rule() {
            Rule::attr_name => name = part.as_str().to_string(),
            Rule::dq_value | Rule::sq_value | Rule::unquoted_value => {
                value = decode_entities(part.as_str())
            }
            _ => {}
        }
    }

    let name = match name.split_once(':') {
        Some(("xlink", _)) => AttributeName::with_namespace(XLINK_NS, name),
        Some(("xml", _)) => AttributeName::with_namespace(XML_NS, name),
        _ => AttributeName::new(name),
    };
    (name, value)
}

/// Decode the handful of character references templates actually use.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
