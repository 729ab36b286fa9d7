//! Collapsing a fieldset of checkboxes into one multi-choice field.

use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::label::{clean_label, linked_label, resolve_label};

const CHECKBOX: &str = "input[type=\"checkbox\"]";

/// Ancestors that wrap a single checkbox together with its caption.
const CHECKBOX_WRAPPER: &str = "label, li, [class*=\"checkbox\"]";

/// A fieldset's checkboxes, seen as one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxGroup {
    pub fieldset: NodeId,
    /// First checkbox in document order.
    pub representative: NodeId,
    pub members: Vec<NodeId>,
    pub label: String,
    /// Captions of the members whose label could be resolved.
    pub options: Vec<String>,
}

/// Build the group for `fieldset`, or `None` if it holds no checkboxes.
pub async fn aggregate_fieldset(doc: &dyn Document, fieldset: NodeId) -> Result<Option<CheckboxGroup>> {
    let members = doc.query_within(fieldset, CHECKBOX).await?;
    let Some(&representative) = members.first() else {
        return Ok(None);
    };

    let label = match legend_text(doc, fieldset).await? {
        Some(legend) => legend,
        None => resolve_label(doc, representative).await?,
    };

    let mut options = Vec::with_capacity(members.len());
    for &checkbox in &members {
        if let Some(caption) = checkbox_caption(doc, checkbox).await? {
            options.push(caption);
        }
    }

    Ok(Some(CheckboxGroup {
        fieldset,
        representative,
        members,
        label,
        options,
    }))
}

async fn legend_text(doc: &dyn Document, fieldset: NodeId) -> Result<Option<String>> {
    let Some(legend) = doc.query_first_within(fieldset, "legend").await? else {
        return Ok(None);
    };
    let text = clean_label(&doc.text(legend).await?);
    Ok(Some(text).filter(|t| !t.is_empty()))
}

/// Caption of one checkbox: `label[for]`, then the text right after it, then
/// a label inside its wrapper.
pub async fn checkbox_caption(doc: &dyn Document, checkbox: NodeId) -> Result<Option<String>> {
    let info = doc.describe(checkbox).await?;
    if let Some(id) = info.non_empty_attr("id") {
        if let Some(label) = linked_label(doc, id).await? {
            return Ok(Some(label));
        }
    }

    if let Some(text) = doc.following_text(checkbox).await? {
        let text = clean_label(&text);
        if !text.is_empty() {
            return Ok(Some(text));
        }
    }

    let Some(parent) = doc.parent(checkbox).await? else {
        return Ok(None);
    };
    let Some(wrapper) = doc.closest(parent, CHECKBOX_WRAPPER).await? else {
        return Ok(None);
    };
    let label = if doc.describe(wrapper).await?.tag == "label" {
        Some(wrapper)
    } else {
        doc.query_first_within(wrapper, "label").await?
    };
    match label {
        Some(label) => {
            let text = clean_label(&doc.text(label).await?);
            Ok(Some(text).filter(|t| !t.is_empty()))
        }
        None => Ok(None),
    }
}
