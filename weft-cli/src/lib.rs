use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use weft_core::{PartKind, PartMut, TemplateConfig, TemplateEngine, TemplateTypeInit};
use weft_dom::{AttributeName, Document, NodeId, TreeHost};

/// Template type whose string values are rendered as markup in node parts.
pub const MARKUP_TYPE: &str = "markup";

/// Read a JSON file; no path means `null` state.
pub fn load_json(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Null);
    };
    let src =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&src).with_context(|| format!("invalid JSON in {}", path.display()))
}

pub fn load_config(path: Option<&Path>) -> Result<TemplateConfig> {
    match path {
        Some(_) => serde_json::from_value(load_json(path)?).context("invalid template config"),
        None => Ok(TemplateConfig::default()),
    }
}

/// Parse a markup file and return its first template element. A file
/// without one is wrapped in a fresh template element as a whole.
pub fn load_template(doc: &Document, input: &Path, config: &TemplateConfig) -> Result<NodeId> {
    let src =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    let fragment = doc
        .parse_html(&src)
        .with_context(|| format!("failed to parse {}", input.display()))?;

    if let Some(template) = doc
        .elements_by_tag_name(fragment, &config.template_tag)
        .into_iter()
        .next()
    {
        return Ok(template);
    }
    let wrapper = doc.create_element(config.template_tag.as_str());
    doc.append_child(&wrapper, &fragment);
    Ok(wrapper)
}

fn markup_type() -> TemplateTypeInit<Document> {
    TemplateTypeInit::new(|instance, state| {
        let Some(object) = state.as_object() else {
            return Ok(());
        };
        for id in instance.part_ids() {
            let Some(part) = instance.part_mut(id) else {
                continue;
            };
            let text = match object.get(part.expression()) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Null) => None,
                Some(other) => Some(other.to_string()),
                None => continue,
            };
            match part {
                PartMut::Node(mut node) => node
                    .replace_html(text.as_deref().unwrap_or_default())
                    .with_context(|| format!("part `{}`", node.expression()))?,
                PartMut::Attribute(mut attr) => attr.set_value(text.as_deref()),
            }
        }
        Ok(())
    })
}

fn engine_for(doc: &Document, config: TemplateConfig) -> TemplateEngine<Document> {
    let engine = TemplateEngine::new(doc.clone()).with_config(config);
    engine.register_template_type(MARKUP_TYPE, markup_type());
    engine
}

/// Instantiate `input` with `state`, then apply each update in turn.
/// Returns the rendered markup after every step.
pub fn render_cmd(
    input: &Path,
    state: Option<&Path>,
    updates: &[PathBuf],
    config: Option<&Path>,
    template_type: Option<&str>,
) -> Result<Vec<String>> {
    let config = load_config(config)?;
    let doc = Document::new();
    let template = load_template(&doc, input, &config)?;
    if let Some(name) = template_type {
        let attribute = AttributeName::new(config.type_attribute.as_str());
        doc.set_attribute(&template, &attribute, name);
    }

    let engine = engine_for(&doc, config);
    let state = load_json(state)?;
    let mut instance = engine
        .create_instance(&template, &state)
        .with_context(|| format!("no instance for {}: no placeholders, or a callback failed", input.display()))?;
    log::info!("{} parts in {}", instance.len(), input.display());

    let mut frames = vec![doc.inner_html(*instance.fragment())];
    for update in updates {
        let state = load_json(Some(update))?;
        instance
            .update(&state)
            .with_context(|| format!("update from {} failed", update.display()))?;
        frames.push(doc.inner_html(*instance.fragment()));
    }
    Ok(frames)
}

fn kind_label(kind: PartKind) -> &'static str {
    match kind {
        PartKind::Attribute => "attribute",
        PartKind::Node => "node",
        PartKind::Inner => "inner",
    }
}

/// One `index\tkind\texpression` line per part of `input`.
pub fn parts_cmd(input: &Path, config: Option<&Path>) -> Result<Vec<String>> {
    let config = load_config(config)?;
    let doc = Document::new();
    let template = load_template(&doc, input, &config)?;
    let instance = engine_for(&doc, config)
        .create_instance(&template, &Value::Null)
        .with_context(|| format!("no placeholders in {}", input.display()))?;

    Ok(instance
        .parts()
        .iter()
        .enumerate()
        .map(|(index, part)| format!("{index}\t{}\t{}", kind_label(part.kind()), part.expression()))
        .collect())
}
