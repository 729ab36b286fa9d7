//! Diagnostics emitted while scanning.
//!
//! None of these are errors: a scan always returns whatever it could
//! collect. Observers make the dropped and degraded cases visible.

use crate::classify::FieldType;
use crate::dom::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Bot-mitigation element excluded before classification.
    Skipped { node: NodeId, pattern: &'static str },
    /// Element matched no row of the classification table.
    Unclassified { node: NodeId, tag: String },
    /// A per-field host fault; the element was dropped.
    FieldFailed { node: NodeId, error: String },
    /// No registered widget adapter recognised the combobox.
    NoAdapter { node: NodeId, label: String },
    /// The combobox menu never appeared within the poll window.
    MenuNotFound { node: NodeId, label: String, triggers: usize },
    /// Dynamic extraction raised an error and was cleaned up.
    ExtractionFailed { node: NodeId, label: String, error: String },
    Collected { node: NodeId, label: String, field_type: FieldType },
}

pub trait ScanObserver {
    fn on_event(&self, event: &ScanEvent);
}

/// Logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn on_event(&self, event: &ScanEvent) {
        match event {
            ScanEvent::Skipped { node, pattern } => {
                tracing::debug!(%node, pattern, "skipping bot-mitigation element");
            }
            ScanEvent::Unclassified { node, tag } => {
                tracing::debug!(%node, tag = %tag, "dropping unclassifiable element");
            }
            ScanEvent::FieldFailed { node, error } => {
                tracing::warn!(%node, error = %error, "dropping field after host error");
            }
            ScanEvent::NoAdapter { node, label } => {
                tracing::debug!(%node, label = %label, "no widget adapter for combobox");
            }
            ScanEvent::MenuNotFound { node, label, triggers } => {
                tracing::debug!(%node, label = %label, triggers, "combobox menu did not open");
            }
            ScanEvent::ExtractionFailed { node, label, error } => {
                tracing::warn!(%node, label = %label, error = %error, "option extraction failed");
            }
            ScanEvent::Collected { node, label, field_type } => {
                tracing::trace!(%node, label = %label, field_type = %field_type, "collected field");
            }
        }
    }
}
