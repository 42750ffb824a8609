//! Live template parts over a host tree.
//!
//! An instance is a rendered copy of a template whose `{{ expression }}`
//! placeholders have become parts. Writing a part's value updates the tree
//! on the spot, while surrounding content stays free to change.

mod attribute_apply;
mod builder;
pub mod config;
mod engine;
mod error;
mod instance;
mod node_apply;
mod part;
mod registry;
mod setter;
mod templatize;
pub mod tokenizer;

pub use config::TemplateConfig;
pub use engine::TemplateEngine;
pub use error::PartError;
pub use instance::TemplateInstance;
pub use part::{AttributePartMut, NodePartMut, PartId, PartKind, PartMut, Replacement, TemplatePart};
pub use registry::{TemplateCallback, TemplateTypeInit, TemplateTypeRegistry};
pub use tokenizer::{Token, tokenize};
