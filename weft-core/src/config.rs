use serde::{Deserialize, Serialize};

/// Markup conventions the instantiation builder relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Elements with this tag are nested sub-templates.
    pub template_tag: String,
    /// Attribute on a template element naming its registered type.
    pub type_attribute: String,
    pub directive_attribute: String,
    /// Attribute holding the expression of an inner part.
    pub expression_attribute: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            template_tag: "template".to_string(),
            type_attribute: "type".to_string(),
            directive_attribute: "directive".to_string(),
            expression_attribute: "expression".to_string(),
        }
    }
}
