use thiserror::Error;
use weft_dom::{MarkupError, NodeKind};

/// Errors raised synchronously by part operations.
///
/// A node setter losing its anchors is not an error; see
/// [`NodePartMut::is_detached`](crate::NodePartMut::is_detached).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartError {
    #[error("a {0:?} node cannot be used as replacement content")]
    InvalidContentKind(NodeKind),
    #[error("attribute is not fully templatized")]
    UnsupportedOperation,
    #[error(transparent)]
    Markup(#[from] MarkupError),
}
