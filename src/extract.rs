//! Bounded open/poll/read/close protocol for combobox widgets.

use crate::config::ScanConfig;
use crate::dom::{Document, DomEvent, NodeId};
use crate::error::Result;
use crate::widget::WidgetAdapter;

/// How a dynamic extraction ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The menu opened; the options it listed (possibly none).
    Options(Vec<String>),
    /// No menu appeared after trying every trigger.
    MenuNotFound { triggers: usize },
    /// A non-fatal host error interrupted the interaction.
    Failed(String),
}

impl Extraction {
    /// Options worth reporting; empty lists count as nothing.
    pub fn into_options(self) -> Option<Vec<String>> {
        match self {
            Extraction::Options(options) if !options.is_empty() => Some(options),
            _ => None,
        }
    }
}

/// Drives one adapter through the extraction protocol.
pub struct DynamicExtractor<'a> {
    doc: &'a dyn Document,
    config: &'a ScanConfig,
}

impl<'a> DynamicExtractor<'a> {
    pub fn new(doc: &'a dyn Document, config: &'a ScanConfig) -> Self {
        Self { doc, config }
    }

    /// Open the widget behind `input`, collect its options, and close it.
    ///
    /// Only fatal host errors are returned; everything else is folded into
    /// [`Extraction::Failed`] after a best-effort cleanup.
    pub async fn extract(&self, adapter: &dyn WidgetAdapter, input: NodeId) -> Result<Extraction> {
        match self.interact(adapter, input).await {
            Ok(extraction) => Ok(extraction),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::debug!(%input, adapter = adapter.name(), error = %e, "cleaning up after failed extraction");
                self.cleanup(input).await;
                Ok(Extraction::Failed(e.to_string()))
            }
        }
    }

    async fn interact(&self, adapter: &dyn WidgetAdapter, input: NodeId) -> Result<Extraction> {
        let triggers = adapter.triggers(self.doc, input).await?;
        self.doc.dispatch(input, DomEvent::Focus).await?;

        let mut opened = false;
        for &trigger in &triggers {
            adapter.open(self.doc, input, trigger).await?;
            if self.wait_for_menu(adapter, input).await? {
                opened = true;
                break;
            }
        }

        let extraction = if opened {
            Extraction::Options(adapter.read_options(self.doc, input).await?)
        } else {
            Extraction::MenuNotFound {
                triggers: triggers.len(),
            }
        };

        adapter.close(self.doc, input).await?;
        tokio::time::sleep(self.config.close_settle()).await;
        Ok(extraction)
    }

    async fn wait_for_menu(&self, adapter: &dyn WidgetAdapter, input: NodeId) -> Result<bool> {
        let poll = self.config.poll;
        for attempt in 0..poll.max_attempts {
            tokio::time::sleep(poll.interval()).await;
            if adapter.is_menu_open(self.doc, input).await? {
                tracing::trace!(%input, attempt, "menu visible");
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Blur the input and click the document body; failures are ignored.
    async fn cleanup(&self, input: NodeId) {
        let _ = self.doc.dispatch(input, DomEvent::Blur).await;
        if let Ok(Some(body)) = self.doc.query_first("body").await {
            let _ = self.doc.dispatch(body, DomEvent::Click).await;
        }
    }
}
