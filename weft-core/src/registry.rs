use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;
use weft_dom::TreeHost;

use crate::instance::TemplateInstance;

/// Signature shared by process and create callbacks.
pub type TemplateCallback<H> = Rc<dyn Fn(&mut TemplateInstance<H>, &Value) -> anyhow::Result<()>>;

/// Update logic for one template type.
pub struct TemplateTypeInit<H: TreeHost> {
    pub process: TemplateCallback<H>,
    /// Runs once before the first `process` call.
    pub create: Option<TemplateCallback<H>>,
}

impl<H: TreeHost> TemplateTypeInit<H> {
    pub fn new<F>(process: F) -> Self
    where
        F: Fn(&mut TemplateInstance<H>, &Value) -> anyhow::Result<()> + 'static,
    {
        Self {
            process: Rc::new(process),
            create: None,
        }
    }

    pub fn with_create<F>(mut self, create: F) -> Self
    where
        F: Fn(&mut TemplateInstance<H>, &Value) -> anyhow::Result<()> + 'static,
    {
        self.create = Some(Rc::new(create));
        self
    }

    /// Assigns each key of a state object to the parts whose expression
    /// matches it. Strings go in verbatim, `null` clears, anything else is
    /// written as compact JSON.
    pub fn key_matching() -> Self {
        Self::new(|instance, state| {
            let Some(object) = state.as_object() else {
                return Ok(());
            };
            for id in instance.part_ids() {
                let Some(mut part) = instance.part_mut(id) else {
                    continue;
                };
                match object.get(part.expression()) {
                    Some(Value::String(text)) => part.set_value(Some(text.as_str())),
                    Some(Value::Null) => part.set_value(None),
                    Some(other) => part.set_value(Some(other.to_string().as_str())),
                    None => {}
                }
            }
            Ok(())
        })
    }
}

/// Named template types. Clones share the same table, so types registered
/// after an instance was created still apply on its next update.
pub struct TemplateTypeRegistry<H: TreeHost> {
    types: Rc<RefCell<HashMap<String, Rc<TemplateTypeInit<H>>>>>,
    fallback: Rc<TemplateTypeInit<H>>,
}

impl<H: TreeHost> Clone for TemplateTypeRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            types: Rc::clone(&self.types),
            fallback: Rc::clone(&self.fallback),
        }
    }
}

impl<H: TreeHost> Default for TemplateTypeRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: TreeHost> TemplateTypeRegistry<H> {
    pub fn new() -> Self {
        Self {
            types: Rc::new(RefCell::new(HashMap::new())),
            fallback: Rc::new(TemplateTypeInit::key_matching()),
        }
    }

    /// Register (or replace) the callbacks for `name`.
    pub fn register(&self, name: impl Into<String>, init: TemplateTypeInit<H>) {
        let name = name.into();
        if self.types.borrow_mut().insert(name.clone(), Rc::new(init)).is_some() {
            log::debug!("template type `{name}` redefined");
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.types.borrow().contains_key(name)
    }

    /// Callbacks for `name`; absent or unknown types get key matching.
    pub fn resolve(&self, name: Option<&str>) -> Rc<TemplateTypeInit<H>> {
        name.filter(|n| !n.is_empty())
            .and_then(|n| self.types.borrow().get(n).cloned())
            .unwrap_or_else(|| Rc::clone(&self.fallback))
    }
}
