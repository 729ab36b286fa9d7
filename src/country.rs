//! Calling-code lookup for country and phone-prefix selectors.
//!
//! Every helper here is pure over a static registry. Calling codes shared by
//! several countries ("+1", "+7", ...) resolve to a single representative
//! entry; nothing else is used to tell them apart.

use serde::Serialize;

use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::options::{read_choice_entries, ChoiceEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountryPhoneInfo {
    #[serde(rename = "countryCode")]
    pub country_code: &'static str,
    #[serde(rename = "countryName")]
    pub country_name: &'static str,
    #[serde(rename = "countryISO")]
    pub country_iso: &'static str,
}

const fn entry(
    country_code: &'static str,
    country_name: &'static str,
    country_iso: &'static str,
) -> CountryPhoneInfo {
    CountryPhoneInfo {
        country_code,
        country_name,
        country_iso,
    }
}

/// Known calling codes. Prefix correction walks this list in order.
static REGISTRY: &[CountryPhoneInfo] = &[
    entry("+1", "United States", "US"),
    entry("+7", "Russia", "RU"),
    entry("+20", "Egypt", "EG"),
    entry("+27", "South Africa", "ZA"),
    entry("+30", "Greece", "GR"),
    entry("+31", "Netherlands", "NL"),
    entry("+32", "Belgium", "BE"),
    entry("+33", "France", "FR"),
    entry("+34", "Spain", "ES"),
    entry("+36", "Hungary", "HU"),
    entry("+39", "Italy", "IT"),
    entry("+40", "Romania", "RO"),
    entry("+41", "Switzerland", "CH"),
    entry("+43", "Austria", "AT"),
    entry("+44", "United Kingdom", "GB"),
    entry("+45", "Denmark", "DK"),
    entry("+46", "Sweden", "SE"),
    entry("+47", "Norway", "NO"),
    entry("+48", "Poland", "PL"),
    entry("+49", "Germany", "DE"),
    entry("+51", "Peru", "PE"),
    entry("+52", "Mexico", "MX"),
    entry("+54", "Argentina", "AR"),
    entry("+55", "Brazil", "BR"),
    entry("+56", "Chile", "CL"),
    entry("+57", "Colombia", "CO"),
    entry("+58", "Venezuela", "VE"),
    entry("+60", "Malaysia", "MY"),
    entry("+61", "Australia", "AU"),
    entry("+62", "Indonesia", "ID"),
    entry("+63", "Philippines", "PH"),
    entry("+64", "New Zealand", "NZ"),
    entry("+65", "Singapore", "SG"),
    entry("+66", "Thailand", "TH"),
    entry("+81", "Japan", "JP"),
    entry("+82", "South Korea", "KR"),
    entry("+84", "Vietnam", "VN"),
    entry("+86", "China", "CN"),
    entry("+90", "Turkey", "TR"),
    entry("+91", "India", "IN"),
    entry("+92", "Pakistan", "PK"),
    entry("+94", "Sri Lanka", "LK"),
    entry("+98", "Iran", "IR"),
    entry("+212", "Morocco", "MA"),
    entry("+216", "Tunisia", "TN"),
    entry("+233", "Ghana", "GH"),
    entry("+234", "Nigeria", "NG"),
    entry("+254", "Kenya", "KE"),
    entry("+351", "Portugal", "PT"),
    entry("+352", "Luxembourg", "LU"),
    entry("+353", "Ireland", "IE"),
    entry("+354", "Iceland", "IS"),
    entry("+356", "Malta", "MT"),
    entry("+357", "Cyprus", "CY"),
    entry("+358", "Finland", "FI"),
    entry("+359", "Bulgaria", "BG"),
    entry("+370", "Lithuania", "LT"),
    entry("+371", "Latvia", "LV"),
    entry("+372", "Estonia", "EE"),
    entry("+380", "Ukraine", "UA"),
    entry("+381", "Serbia", "RS"),
    entry("+385", "Croatia", "HR"),
    entry("+386", "Slovenia", "SI"),
    entry("+420", "Czech Republic", "CZ"),
    entry("+421", "Slovakia", "SK"),
    entry("+506", "Costa Rica", "CR"),
    entry("+507", "Panama", "PA"),
    entry("+852", "Hong Kong", "HK"),
    entry("+880", "Bangladesh", "BD"),
    entry("+886", "Taiwan", "TW"),
    entry("+966", "Saudi Arabia", "SA"),
    entry("+971", "United Arab Emirates", "AE"),
    entry("+972", "Israel", "IL"),
    entry("+974", "Qatar", "QA"),
    entry("+977", "Nepal", "NP"),
];

fn normalize_code(code: &str) -> String {
    let code = code.trim();
    if code.starts_with('+') {
        code.to_string()
    } else {
        format!("+{code}")
    }
}

fn lookup(code: &str) -> Option<&'static CountryPhoneInfo> {
    REGISTRY.iter().find(|info| info.country_code == code)
}

/// Country for a calling code such as `"+48"` or `"48"`.
///
/// Codes with extra trailing digits (`"+486"`) fall back to the first known
/// code they start with.
pub fn get_country_info_from_code(code: &str) -> Option<&'static CountryPhoneInfo> {
    let code = normalize_code(code);
    lookup(&code).or_else(|| {
        REGISTRY
            .iter()
            .find(|info| code.starts_with(info.country_code))
    })
}

pub fn is_valid_country_code(code: &str) -> bool {
    lookup(&normalize_code(code)).is_some()
}

/// Every known calling code, in registry order.
pub fn get_all_country_codes() -> Vec<&'static str> {
    REGISTRY.iter().map(|info| info.country_code).collect()
}

/// Strip spaces, hyphens, parentheses and dots from a phone number.
pub fn normalize_phone_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect()
}

/// The option list of a country or phone-prefix selector.
#[derive(Debug, Clone, Copy)]
pub enum CountryOptions<'a> {
    /// Entries of a native `<select>`.
    Native(&'a [ChoiceEntry]),
    /// Option captions of any other widget.
    Plain(&'a [&'a str]),
}

fn search_terms(info: &CountryPhoneInfo) -> [String; 4] {
    [
        info.country_code.to_string(),
        info.country_code.trim_start_matches('+').to_string(),
        info.country_name.to_lowercase(),
        info.country_iso.to_lowercase(),
    ]
}

/// Index of the option for the country owning `code`.
///
/// Disabled and valueless native entries are never chosen. The index refers
/// to the full option list.
pub fn find_country_option_index(options: CountryOptions<'_>, code: &str) -> Option<usize> {
    let info = get_country_info_from_code(code)?;
    let terms = search_terms(info);
    let hit = |haystack: &str| terms.iter().any(|term| haystack.contains(term.as_str()));

    match options {
        CountryOptions::Native(entries) => entries.iter().position(|entry| {
            !entry.disabled
                && !entry.value.trim().is_empty()
                && hit(&format!("{} {}", entry.text, entry.value).to_lowercase())
        }),
        CountryOptions::Plain(texts) => texts.iter().position(|text| hit(&text.to_lowercase())),
    }
}

/// [`find_country_option_index`] against a native `<select>` on the page.
pub async fn find_country_option_in_select(
    doc: &dyn Document,
    select: NodeId,
    code: &str,
) -> Result<Option<usize>> {
    let entries = read_choice_entries(doc, select).await?;
    Ok(find_country_option_index(CountryOptions::Native(&entries), code))
}
