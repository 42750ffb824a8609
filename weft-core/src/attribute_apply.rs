use weft_dom::TreeHost;

use crate::part::PartStore;
use crate::setter::AttributeEntry;

/// Write the attribute owned by setter `index` back to its element.
pub(crate) fn apply<H: TreeHost>(host: &H, store: &PartStore<H::Node>, index: usize) {
    let setter = &store.attribute_setters[index];

    if let [AttributeEntry::Part(id)] = setter.entries.as_slice() {
        match store.part(*id).attribute_value() {
            Some(value) => host.set_attribute(&setter.element, &setter.name, value),
            None => host.remove_attribute(&setter.element, &setter.name),
        }
        return;
    }

    let value: String = setter
        .entries
        .iter()
        .map(|entry| match entry {
            AttributeEntry::Literal(text) => text.as_str(),
            AttributeEntry::Part(id) => store.part(*id).attribute_value().unwrap_or_default(),
        })
        .collect();
    host.set_attribute(&setter.element, &setter.name, &value);
}
