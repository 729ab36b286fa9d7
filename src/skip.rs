//! Bot-mitigation widgets that must never be treated as form fields.

use crate::dom::NodeInfo;

/// Name fragments identifying captcha and challenge widgets.
const SKIP_PATTERNS: &[&str] = &["recaptcha", "g-recaptcha", "captcha", "hcaptcha", "cf-turnstile"];

/// Attributes inspected by the skip filter.
const IDENTITY_ATTRS: &[&str] = &["id", "class", "name", "data-testid"];

/// First skip pattern found in the element's identifying attributes.
pub fn skip_reason(info: &NodeInfo) -> Option<&'static str> {
    IDENTITY_ATTRS
        .iter()
        .filter_map(|attr| info.attr(attr))
        .map(str::to_ascii_lowercase)
        .find_map(|value| SKIP_PATTERNS.iter().copied().find(|p| value.contains(p)))
}

pub fn should_skip(info: &NodeInfo) -> bool {
    skip_reason(info).is_some()
}
