//! Options that are already present in the document.

use serde::Serialize;

use crate::dom::{Document, NodeId};
use crate::error::Result;

/// One `<option>` of a native choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceEntry {
    /// Display text, trimmed.
    pub text: String,
    /// Submitted value; the display text when no `value` attribute is set.
    pub value: String,
    pub disabled: bool,
    /// `value=""` was written explicitly.
    #[serde(skip)]
    pub explicit_empty_value: bool,
}

impl ChoiceEntry {
    /// Prompt entries such as "Please select" carry an explicit empty value.
    pub fn is_placeholder(&self) -> bool {
        self.explicit_empty_value || self.text.is_empty()
    }
}

/// Every entry of a native `<select>`, in document order.
pub async fn read_choice_entries(doc: &dyn Document, select: NodeId) -> Result<Vec<ChoiceEntry>> {
    let mut entries = Vec::new();
    for option in doc.query_within(select, "option").await? {
        let info = doc.describe(option).await?;
        let text = doc.text(option).await?.trim().to_string();
        let value_attr = info.attr("value");
        entries.push(ChoiceEntry {
            value: value_attr.map(str::to_string).unwrap_or_else(|| text.clone()),
            explicit_empty_value: value_attr.is_some_and(|v| v.trim().is_empty()),
            disabled: info.has_attr("disabled"),
            text,
        });
    }
    Ok(entries)
}

/// Display text of every non-placeholder entry of a native `<select>`.
pub async fn static_options(doc: &dyn Document, select: NodeId) -> Result<Vec<String>> {
    Ok(read_choice_entries(doc, select)
        .await?
        .into_iter()
        .filter(|entry| !entry.is_placeholder())
        .map(|entry| entry.text)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, value: &str, explicit_empty: bool) -> ChoiceEntry {
        ChoiceEntry {
            text: text.into(),
            value: value.into(),
            disabled: false,
            explicit_empty_value: explicit_empty,
        }
    }

    #[test]
    fn placeholder_detection() {
        assert!(entry("Please select", "", true).is_placeholder());
        assert!(entry("", "x", false).is_placeholder());
        assert!(!entry("Yes", "Yes", false).is_placeholder());
        assert!(!entry("No", "0", false).is_placeholder());
    }
}
