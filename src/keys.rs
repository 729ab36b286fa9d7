//! Seam to the external semantic key generator.

use async_trait::async_trait;

use crate::classify::FieldType;
use crate::dom::{Document, NodeId};

/// What a key resolver gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub element: NodeId,
    pub label: &'a str,
    pub field_type: FieldType,
}

/// Maps a discovered field to a canonical profile attribute.
///
/// Returning `None` is normal; the field is emitted without a key.
#[async_trait(?Send)]
pub trait KeyResolver {
    async fn resolve(&self, doc: &dyn Document, field: FieldContext<'_>) -> Option<String>;
}

/// Assigns no keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoKeys;

#[async_trait(?Send)]
impl KeyResolver for NoKeys {
    async fn resolve(&self, _doc: &dyn Document, _field: FieldContext<'_>) -> Option<String> {
        None
    }
}

/// Synchronous resolver built from a closure over the field context.
pub struct KeyFn<F>(pub F);

impl<F> KeyFn<F>
where
    F: Fn(FieldContext<'_>) -> Option<String>,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait(?Send)]
impl<F> KeyResolver for KeyFn<F>
where
    F: Fn(FieldContext<'_>) -> Option<String>,
{
    async fn resolve(&self, _doc: &dyn Document, field: FieldContext<'_>) -> Option<String> {
        (self.0)(field)
    }
}
