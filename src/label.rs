//! Human-readable labels for form controls.

use crate::dom::{css_string, Document, NodeId};
use crate::error::Result;

/// Wrappers that group a control with its question text.
pub const FIELD_CONTAINER: &str = "fieldset, .field, .form-group, [class*=\"field\"], \
    [class*=\"question\"], [class*=\"form-group\"]";

/// Label-like descendants of a field container; the first one with text wins.
const CONTAINER_LABEL: &str =
    "legend, label, h1, h2, h3, h4, h5, h6, [class*=\"label\"]";

pub const UNKNOWN_FIELD: &str = "Unknown Field";

/// Normalize raw label text: drop required-marker asterisks, collapse
/// whitespace, strip a trailing colon or semicolon.
pub fn clean_label(raw: &str) -> String {
    let collapsed = raw
        .replace('*', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    collapsed
        .trim_end_matches([':', ';'])
        .trim_end()
        .to_string()
}

fn non_empty(raw: &str) -> Option<String> {
    Some(clean_label(raw)).filter(|label| !label.is_empty())
}

/// Text of the `<label for=id>` pointing at `id`, if any.
pub(crate) async fn linked_label(doc: &dyn Document, id: &str) -> Result<Option<String>> {
    let selector = format!("label[for={}]", css_string(id));
    for label in doc.query_all(&selector).await? {
        if let Some(text) = non_empty(&doc.text(label).await?) {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

/// Nearest field container strictly above `node`.
pub(crate) async fn field_container(doc: &dyn Document, node: NodeId) -> Result<Option<NodeId>> {
    match doc.parent(node).await? {
        Some(parent) => doc.closest(parent, FIELD_CONTAINER).await,
        None => Ok(None),
    }
}

/// First label-like text inside the nearest field container.
async fn container_label(doc: &dyn Document, node: NodeId) -> Result<Option<String>> {
    let Some(container) = field_container(doc, node).await? else {
        return Ok(None);
    };
    for candidate in doc.query_within(container, CONTAINER_LABEL).await? {
        if let Some(text) = non_empty(&doc.text(candidate).await?) {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

/// Resolve a label for `node`. Never returns an empty string.
pub async fn resolve_label(doc: &dyn Document, node: NodeId) -> Result<String> {
    let info = doc.describe(node).await?;

    if let Some(id) = info.non_empty_attr("id") {
        if let Some(label) = linked_label(doc, id).await? {
            return Ok(label);
        }
    }

    if let Some(label) = info.attr("aria-label").and_then(non_empty) {
        return Ok(label);
    }
    if let Some(first) = info
        .attr("aria-labelledby")
        .and_then(|ids| ids.split_whitespace().next())
    {
        let selector = format!("[id={}]", css_string(first));
        if let Some(target) = doc.query_first(&selector).await? {
            if let Some(label) = non_empty(&doc.text(target).await?) {
                return Ok(label);
            }
        }
    }

    if let Some(label) = container_label(doc, node).await? {
        return Ok(label);
    }

    if let Some(label) = info.attr("placeholder").and_then(non_empty) {
        return Ok(label);
    }

    Ok(info
        .attr("name")
        .and_then(non_empty)
        .unwrap_or_else(|| UNKNOWN_FIELD.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markers_and_punctuation() {
        assert_eq!(clean_label("  First Name *  "), "First Name");
        assert_eq!(clean_label("Email:"), "Email");
        assert_eq!(clean_label("Phone;"), "Phone");
        assert_eq!(clean_label("Are you\n   authorized\tto work? *:"), "Are you authorized to work?");
    }

    #[test]
    fn marker_only_text_is_empty() {
        assert_eq!(clean_label(" * "), "");
        assert!(non_empty("*").is_none());
    }

    #[test]
    fn inner_colons_are_kept() {
        assert_eq!(clean_label("Start: date"), "Start: date");
    }
}
