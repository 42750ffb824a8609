use serde_json::Value;
use weft_dom::{AttributeName, TreeHost};

use crate::builder::build_parts;
use crate::config::TemplateConfig;
use crate::instance::TemplateInstance;
use crate::registry::{TemplateTypeInit, TemplateTypeRegistry};

/// Entry point: owns the host handle, the template type registry and the
/// markup conventions, and stamps out instances.
pub struct TemplateEngine<H: TreeHost> {
    host: H,
    registry: TemplateTypeRegistry<H>,
    config: TemplateConfig,
}

impl<H: TreeHost + Clone> TemplateEngine<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            registry: TemplateTypeRegistry::new(),
            config: TemplateConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TemplateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    pub fn registry(&self) -> &TemplateTypeRegistry<H> {
        &self.registry
    }

    pub fn register_template_type(&self, name: impl Into<String>, init: TemplateTypeInit<H>) {
        self.registry.register(name, init);
    }

    /// Clone the content of `template`, discover its parts and render it
    /// with `state`.
    ///
    /// Returns `None` when the content has no placeholders or when a
    /// callback of the template's type fails; nothing built is kept.
    pub fn create_instance(&self, template: &H::Node, state: &Value) -> Option<TemplateInstance<H>> {
        let fragment = self.host.create_fragment();
        for child in self.host.children(template) {
            let copy = self.host.clone_node(&child, true);
            self.host.append_child(&fragment, &copy);
        }

        let template_type = self
            .host
            .get_attribute(template, &AttributeName::new(self.config.type_attribute.as_str()));
        let store = build_parts(&self.host, fragment, &self.config);
        if store.parts.is_empty() {
            log::debug!("no placeholders found; no instance created");
            return None;
        }

        let mut instance =
            TemplateInstance::new(self.host.clone(), template_type, self.registry.clone(), store);
        let init = self.registry.resolve(instance.template_type());

        if let Some(create) = &init.create {
            if let Err(err) = create(&mut instance, state) {
                log::warn!("create callback failed: {err:#}");
                return None;
            }
        }
        if let Err(err) = (init.process)(&mut instance, state) {
            log::warn!("process callback failed: {err:#}");
            return None;
        }
        Some(instance)
    }
}
