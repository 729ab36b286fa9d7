//! The field collection engine: one scan of a document into an ordered list
//! of typed, labelled fields.

use std::collections::HashSet;

use serde::Serialize;
use tracing::Instrument;

use crate::checkbox::{aggregate_fieldset, CheckboxGroup};
use crate::classify::{classify, ElementShape, FieldType};
use crate::config::ScanConfig;
use crate::dom::{Document, NodeId, NodeInfo};
use crate::error::Result;
use crate::extract::{DynamicExtractor, Extraction};
use crate::keys::{FieldContext, KeyResolver, NoKeys};
use crate::label::{field_container, resolve_label};
use crate::observer::{ScanEvent, ScanObserver, TracingObserver};
use crate::options::static_options;
use crate::skip::skip_reason;
use crate::widget::{AriaListboxAdapter, ReactSelectAdapter, WidgetAdapter};

/// Elements considered for discovery, in document order.
const CANDIDATES: &str = "input, select, textarea";

const MULTI_VALUE_CONTAINER: &str = "[class*=\"--is-multi\"]";

const REQUIRED_MARKER: &str =
    ".required, .asterisk, [class*=\"required\"], [class*=\"asterisk\"]";

/// One fillable unit discovered on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Representative element; the first checkbox for aggregated groups.
    pub element: NodeId,
    /// All checkboxes of an aggregated group.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<NodeId>,
    pub key: Option<String>,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub is_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// A single scan session over one document.
///
/// Holds no state between scans; create one per autofill attempt.
pub struct FieldCollector<'a> {
    doc: &'a dyn Document,
    config: ScanConfig,
    marker: ReactSelectAdapter,
    adapters: Vec<Box<dyn WidgetAdapter + 'a>>,
    keys: Box<dyn KeyResolver + 'a>,
    observer: Box<dyn ScanObserver + 'a>,
}

impl<'a> FieldCollector<'a> {
    pub fn new(doc: &'a dyn Document) -> Self {
        Self::with_config(doc, ScanConfig::default())
    }

    /// Collector with the built-in adapters for `config`'s widget prefix.
    pub fn with_config(doc: &'a dyn Document, config: ScanConfig) -> Self {
        let marker = ReactSelectAdapter::new(&config.widget_class_prefix);
        Self {
            doc,
            adapters: vec![Box::new(marker.clone()), Box::new(AriaListboxAdapter)],
            marker,
            config,
            keys: Box::new(NoKeys),
            observer: Box::new(TracingObserver),
        }
    }

    /// Try `adapter` before the built-in ones.
    pub fn adapter(mut self, adapter: impl WidgetAdapter + 'a) -> Self {
        self.adapters.insert(0, Box::new(adapter));
        self
    }

    /// Replace every registered adapter.
    pub fn adapters(mut self, adapters: Vec<Box<dyn WidgetAdapter + 'a>>) -> Self {
        self.adapters = adapters;
        self
    }

    pub fn key_resolver(mut self, keys: impl KeyResolver + 'a) -> Self {
        self.keys = Box::new(keys);
        self
    }

    pub fn observer(mut self, observer: impl ScanObserver + 'a) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan the document and return every fillable field in document order.
    ///
    /// A checkbox fieldset takes the position of its first checkbox.
    /// Per-field faults are reported to the observer and skipped; only a
    /// failure of the document itself is returned as an error.
    pub async fn collect_all_form_fields(&self) -> Result<Vec<FormField>> {
        self.scan()
            .instrument(tracing::info_span!("collect_form_fields"))
            .await
    }

    async fn scan(&self) -> Result<Vec<FormField>> {
        let candidates = self.doc.query_all(CANDIDATES).await?;
        let mut grouped = HashSet::new();
        let mut fields = Vec::new();

        for node in candidates {
            match self.collect_one(node, &mut grouped).await {
                Ok(Some(field)) => {
                    self.observer.on_event(&ScanEvent::Collected {
                        node: field.element,
                        label: field.label.clone(),
                        field_type: field.field_type,
                    });
                    fields.push(field);
                }
                Ok(None) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => self.observer.on_event(&ScanEvent::FieldFailed {
                    node,
                    error: e.to_string(),
                }),
            }
        }

        tracing::info!(count = fields.len(), "form fields collected");
        Ok(fields)
    }

    /// `grouped` holds every checkbox already emitted as a group member, so a
    /// checkbox in nested fieldsets belongs to the outermost group only.
    async fn collect_one(
        &self,
        node: NodeId,
        grouped: &mut HashSet<NodeId>,
    ) -> Result<Option<FormField>> {
        if grouped.contains(&node) {
            return Ok(None);
        }
        let info = self.doc.describe(node).await?;
        if let Some(pattern) = skip_reason(&info) {
            self.observer.on_event(&ScanEvent::Skipped { node, pattern });
            return Ok(None);
        }

        let shape = self.shape(node, &info).await?;
        let Some(field_type) = classify(&shape) else {
            self.observer.on_event(&ScanEvent::Unclassified {
                node,
                tag: info.tag.clone(),
            });
            return Ok(None);
        };

        if field_type == FieldType::Checkbox {
            if let Some(fieldset) = self.outermost_fieldset(node).await? {
                if let Some(group) = aggregate_fieldset(self.doc, fieldset).await? {
                    grouped.extend(group.members.iter().copied());
                    return self.group_field(group).await.map(Some);
                }
            }
        }

        let label = resolve_label(self.doc, node).await?;
        let is_required = self.is_required(node, &info).await?;
        let options = match field_type {
            FieldType::Select => Some(static_options(self.doc, node).await?),
            combobox if combobox.is_combobox() => self.dynamic_options(node, &label).await?,
            _ => None,
        }
        .filter(|options| !options.is_empty());

        let key = self.resolve_key(node, &label, field_type).await;
        Ok(Some(FormField {
            element: node,
            members: Vec::new(),
            key,
            label,
            field_type,
            is_required,
            options,
        }))
    }

    async fn outermost_fieldset(&self, node: NodeId) -> Result<Option<NodeId>> {
        let mut outermost = self.doc.closest(node, "fieldset").await?;
        while let Some(fieldset) = outermost {
            let Some(parent) = self.doc.parent(fieldset).await? else {
                break;
            };
            match self.doc.closest(parent, "fieldset").await? {
                Some(outer) => outermost = Some(outer),
                None => break,
            }
        }
        Ok(outermost)
    }

    async fn shape(&self, node: NodeId, info: &NodeInfo) -> Result<ElementShape> {
        let mut shape = ElementShape::from_info(info);
        if info.tag != "input" || info.is_input_of_type("checkbox") || info.is_input_of_type("radio") {
            return Ok(shape);
        }
        shape.widget_marker = info
            .attr("class")
            .is_some_and(|c| c.contains(self.marker.input_class()))
            || self
                .doc
                .closest(node, self.marker.control_selector())
                .await?
                .is_some();
        shape.in_multi_container = self.doc.closest(node, MULTI_VALUE_CONTAINER).await?.is_some();
        Ok(shape)
    }

    async fn group_field(&self, group: CheckboxGroup) -> Result<FormField> {
        let fieldset = self.doc.describe(group.fieldset).await?;
        let mut is_required = is_marked_required(&fieldset);
        for &member in &group.members {
            if is_required {
                break;
            }
            is_required = is_marked_required(&self.doc.describe(member).await?);
        }
        if !is_required {
            is_required = self.container_marks_required(group.representative).await?;
        }

        let key = self
            .resolve_key(group.representative, &group.label, FieldType::Checkbox)
            .await;
        Ok(FormField {
            element: group.representative,
            key,
            label: group.label,
            field_type: FieldType::Checkbox,
            is_required,
            options: Some(group.options).filter(|options| !options.is_empty()),
            members: group.members,
        })
    }

    async fn is_required(&self, node: NodeId, info: &NodeInfo) -> Result<bool> {
        if is_marked_required(info) {
            return Ok(true);
        }
        self.container_marks_required(node).await
    }

    /// A required marker element, or an asterisk in the caption, inside the
    /// field's container.
    async fn container_marks_required(&self, node: NodeId) -> Result<bool> {
        let Some(container) = field_container(self.doc, node).await? else {
            return Ok(false);
        };
        if !self.doc.query_within(container, REQUIRED_MARKER).await?.is_empty() {
            return Ok(true);
        }
        match self.doc.query_first_within(container, "label, legend").await? {
            Some(caption) => Ok(self.doc.text(caption).await?.contains('*')),
            None => Ok(false),
        }
    }

    async fn dynamic_options(&self, node: NodeId, label: &str) -> Result<Option<Vec<String>>> {
        if !self.config.extract_dynamic_options {
            return Ok(None);
        }
        let Some(adapter) = self.adapter_for(node).await? else {
            self.observer.on_event(&ScanEvent::NoAdapter {
                node,
                label: label.to_string(),
            });
            return Ok(None);
        };

        let extractor = DynamicExtractor::new(self.doc, &self.config);
        let extraction = extractor.extract(adapter, node).await?;
        match &extraction {
            Extraction::Options(_) => {}
            Extraction::MenuNotFound { triggers } => {
                self.observer.on_event(&ScanEvent::MenuNotFound {
                    node,
                    label: label.to_string(),
                    triggers: *triggers,
                });
            }
            Extraction::Failed(error) => {
                self.observer.on_event(&ScanEvent::ExtractionFailed {
                    node,
                    label: label.to_string(),
                    error: error.clone(),
                });
            }
        }
        Ok(extraction.into_options())
    }

    async fn adapter_for(&self, node: NodeId) -> Result<Option<&dyn WidgetAdapter>> {
        for adapter in &self.adapters {
            match adapter.matches(self.doc, node).await {
                Ok(true) => return Ok(Some(adapter.as_ref())),
                Ok(false) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::debug!(%node, adapter = adapter.name(), error = %e, "adapter probe failed");
                }
            }
        }
        Ok(None)
    }

    async fn resolve_key(&self, node: NodeId, label: &str, field_type: FieldType) -> Option<String> {
        self.keys
            .resolve(
                self.doc,
                FieldContext {
                    element: node,
                    label,
                    field_type,
                },
            )
            .await
    }
}

fn is_marked_required(info: &NodeInfo) -> bool {
    info.has_attr("required")
        || info
            .attr("aria-required")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Scan `doc` with the default configuration.
pub async fn collect_all_form_fields(doc: &dyn Document) -> Result<Vec<FormField>> {
    FieldCollector::new(doc).collect_all_form_fields().await
}
