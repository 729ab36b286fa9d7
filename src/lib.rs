pub mod browser;
pub mod checkbox;
pub mod classify;
pub mod collector;
pub mod config;
pub mod country;
pub mod dom;
pub mod error;
pub mod extract;
pub mod keys;
pub mod label;
pub mod observer;
pub mod options;
pub mod page;
pub mod skip;
pub mod snapshot;
pub mod widget;

pub use browser::FormBrowser;
pub use classify::FieldType;
pub use collector::{collect_all_form_fields, FieldCollector, FormField};
pub use config::{BrowserConfig, PollConfig, ScanConfig};
pub use country::{
    find_country_option_index, get_all_country_codes, get_country_info_from_code,
    is_valid_country_code, normalize_phone_number, CountryOptions, CountryPhoneInfo,
};
pub use dom::{Document, DomEvent, NodeId, NodeInfo};
pub use error::{Error, Result};
pub use keys::{FieldContext, KeyFn, KeyResolver, NoKeys};
pub use observer::{ScanEvent, ScanObserver, TracingObserver};
pub use page::Page;
pub use snapshot::HtmlSnapshot;
pub use widget::{AriaListboxAdapter, ReactSelectAdapter, WidgetAdapter};
