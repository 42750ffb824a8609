use serde_json::Value;
use weft_dom::TreeHost;

use crate::part::{PartId, PartMut, PartStore, TemplatePart};
use crate::registry::TemplateTypeRegistry;

/// A rendered copy of a template together with its parts.
///
/// The fragment's children can be moved into a document; parts keep
/// reconciling wherever their nodes end up.
pub struct TemplateInstance<H: TreeHost> {
    host: H,
    fragment: H::Node,
    template_type: Option<String>,
    registry: TemplateTypeRegistry<H>,
    store: PartStore<H::Node>,
}

impl<H: TreeHost> TemplateInstance<H> {
    pub(crate) fn new(
        host: H,
        template_type: Option<String>,
        registry: TemplateTypeRegistry<H>,
        store: PartStore<H::Node>,
    ) -> Self {
        Self {
            host,
            fragment: store.root.clone(),
            template_type,
            registry,
            store,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn fragment(&self) -> &H::Node {
        &self.fragment
    }

    pub fn template_type(&self) -> Option<&str> {
        self.template_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.store.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.parts.is_empty()
    }

    pub fn part_ids(&self) -> Vec<PartId> {
        (0..self.store.parts.len()).map(PartId).collect()
    }

    pub fn parts(&self) -> &[TemplatePart<H::Node>] {
        &self.store.parts
    }

    pub fn part(&self, id: PartId) -> Option<&TemplatePart<H::Node>> {
        self.store.parts.get(id.0)
    }

    pub fn part_mut(&mut self, id: PartId) -> Option<PartMut<'_, H>> {
        PartMut::new(&self.host, &mut self.store, id)
    }

    /// First part bound to `expression`, in document order.
    pub fn find(&self, expression: &str) -> Option<PartId> {
        self.store
            .parts
            .iter()
            .position(|part| part.expression() == expression)
            .map(PartId)
    }

    /// Run the process callback of this instance's type with `state`.
    pub fn update(&mut self, state: &Value) -> anyhow::Result<()> {
        let init = self.registry.resolve(self.template_type.as_deref());
        (init.process)(self, state)
    }
}
