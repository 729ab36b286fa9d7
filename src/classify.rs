//! Semantic field types and the classification table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::NodeInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Textarea,
    Select,
    Checkbox,
    Radio,
    ReactSelect,
    ReactMultiSelect,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::ReactSelect => "react-select",
            FieldType::ReactMultiSelect => "react-multi-select",
        }
    }

    /// Combobox widgets whose options only exist while open.
    pub fn is_combobox(&self) -> bool {
        matches!(self, FieldType::ReactSelect | FieldType::ReactMultiSelect)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input types that accept free text.
const TEXT_LIKE: &[&str] = &["", "text", "email", "tel", "url", "number", "search", "date"];

/// What the classifier needs to know about a candidate element.
///
/// `widget_marker` and `in_multi_container` depend on the element's
/// surroundings and are filled in by the caller.
#[derive(Debug, Clone, Default)]
pub struct ElementShape {
    pub tag: String,
    pub input_type: String,
    pub id: String,
    pub role: String,
    pub aria_autocomplete: String,
    pub aria_multiselectable: bool,
    /// Carries the combobox widget's class-name marker.
    pub widget_marker: bool,
    /// Sits inside a multi-value container of a combobox widget.
    pub in_multi_container: bool,
}

impl ElementShape {
    pub fn from_info(info: &NodeInfo) -> Self {
        let lower = |name: &str| info.attr(name).unwrap_or_default().trim().to_ascii_lowercase();
        Self {
            tag: info.tag.clone(),
            input_type: info.input_type(),
            id: info.attr("id").unwrap_or_default().to_string(),
            role: lower("role"),
            aria_autocomplete: lower("aria-autocomplete"),
            aria_multiselectable: lower("aria-multiselectable") == "true",
            widget_marker: false,
            in_multi_container: false,
        }
    }

    fn is_text_like(&self) -> bool {
        self.tag == "input" && TEXT_LIKE.contains(&self.input_type.as_str())
    }

    fn is_combobox(&self) -> bool {
        (self.role == "combobox" && self.aria_autocomplete == "list") || self.widget_marker
    }

    fn is_multi(&self) -> bool {
        self.id.contains("[]") || self.aria_multiselectable || self.in_multi_container
    }
}

/// Map an element to its field type; `None` means the element is not a
/// fillable field.
pub fn classify(shape: &ElementShape) -> Option<FieldType> {
    match shape.tag.as_str() {
        "textarea" => return Some(FieldType::Textarea),
        "select" => return Some(FieldType::Select),
        "input" => {}
        _ => return None,
    }
    match shape.input_type.as_str() {
        "checkbox" => return Some(FieldType::Checkbox),
        "radio" => return Some(FieldType::Radio),
        _ => {}
    }
    if !shape.is_text_like() {
        return None;
    }
    if shape.is_combobox() {
        if shape.is_multi() {
            Some(FieldType::ReactMultiSelect)
        } else {
            Some(FieldType::ReactSelect)
        }
    } else {
        Some(FieldType::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(ty: &str) -> ElementShape {
        ElementShape {
            tag: "input".into(),
            input_type: ty.into(),
            ..Default::default()
        }
    }

    #[test]
    fn native_controls() {
        let textarea = ElementShape {
            tag: "textarea".into(),
            ..Default::default()
        };
        let select = ElementShape {
            tag: "select".into(),
            ..Default::default()
        };
        assert_eq!(classify(&textarea), Some(FieldType::Textarea));
        assert_eq!(classify(&select), Some(FieldType::Select));
        assert_eq!(classify(&input("checkbox")), Some(FieldType::Checkbox));
        assert_eq!(classify(&input("radio")), Some(FieldType::Radio));
        assert_eq!(classify(&input("")), Some(FieldType::Text));
        assert_eq!(classify(&input("email")), Some(FieldType::Text));
    }

    #[test]
    fn non_fields_are_dropped() {
        assert_eq!(classify(&input("hidden")), None);
        assert_eq!(classify(&input("submit")), None);
        assert_eq!(classify(&input("file")), None);
        let button = ElementShape {
            tag: "button".into(),
            ..Default::default()
        };
        assert_eq!(classify(&button), None);
    }

    #[test]
    fn aria_combobox_needs_list_autocomplete() {
        let mut shape = input("text");
        shape.role = "combobox".into();
        assert_eq!(classify(&shape), Some(FieldType::Text));
        shape.aria_autocomplete = "list".into();
        assert_eq!(classify(&shape), Some(FieldType::ReactSelect));
    }

    #[test]
    fn multi_select_conventions() {
        let mut by_id = input("text");
        by_id.widget_marker = true;
        by_id.id = "question_7[]".into();
        assert_eq!(classify(&by_id), Some(FieldType::ReactMultiSelect));

        let mut by_aria = input("text");
        by_aria.widget_marker = true;
        by_aria.aria_multiselectable = true;
        assert_eq!(classify(&by_aria), Some(FieldType::ReactMultiSelect));

        let mut by_container = input("text");
        by_container.widget_marker = true;
        by_container.in_multi_container = true;
        assert_eq!(classify(&by_container), Some(FieldType::ReactMultiSelect));
    }

    #[test]
    fn multi_marker_without_widget_is_plain_text() {
        let mut shape = input("text");
        shape.id = "tags[]".into();
        assert_eq!(classify(&shape), Some(FieldType::Text));
    }

    #[test]
    fn serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&FieldType::ReactMultiSelect).unwrap(),
            "\"react-multi-select\""
        );
        assert_eq!(FieldType::ReactSelect.to_string(), "react-select");
    }
}
