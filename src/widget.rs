//! Interaction strategies for custom combobox widgets.
//!
//! A combobox mounts its option list only while open. Each widget family
//! has its own markup, so the open/inspect/close gestures live behind
//! [`WidgetAdapter`]; the bounded polling around them is in
//! [`crate::extract`].

use async_trait::async_trait;

use crate::dom::{css_string, Document, DomEvent, NodeId};
use crate::error::Result;

#[async_trait(?Send)]
pub trait WidgetAdapter {
    fn name(&self) -> &'static str;

    /// Whether this adapter knows how to drive the widget owning `input`.
    async fn matches(&self, doc: &dyn Document, input: NodeId) -> Result<bool>;

    /// Elements to try opening the widget with, most specific first.
    async fn triggers(&self, doc: &dyn Document, input: NodeId) -> Result<Vec<NodeId>>;

    async fn open(&self, doc: &dyn Document, input: NodeId, trigger: NodeId) -> Result<()>;

    async fn is_menu_open(&self, doc: &dyn Document, input: NodeId) -> Result<bool>;

    /// Text of every visible option, in document order, blanks removed.
    async fn read_options(&self, doc: &dyn Document, input: NodeId) -> Result<Vec<String>>;

    async fn close(&self, doc: &dyn Document, input: NodeId) -> Result<()>;
}

/// Press, release and click, the way a pointer would.
async fn press(doc: &dyn Document, target: NodeId) -> Result<()> {
    doc.dispatch(target, DomEvent::MouseDown).await?;
    doc.dispatch(target, DomEvent::MouseUp).await?;
    doc.dispatch(target, DomEvent::Click).await
}

async fn release_focus(doc: &dyn Document, input: NodeId) -> Result<()> {
    doc.dispatch(input, DomEvent::Blur).await?;
    doc.dispatch(input, DomEvent::Escape).await
}

async fn first_visible(doc: &dyn Document, nodes: Vec<NodeId>) -> Result<Option<NodeId>> {
    for node in nodes {
        if doc.is_visible(node).await? {
            return Ok(Some(node));
        }
    }
    Ok(None)
}

async fn visible_texts(doc: &dyn Document, nodes: Vec<NodeId>) -> Result<Vec<String>> {
    let mut texts = Vec::with_capacity(nodes.len());
    for node in nodes {
        if !doc.is_visible(node).await? {
            continue;
        }
        let text = doc.text(node).await?.trim().to_string();
        if !text.is_empty() {
            texts.push(text);
        }
    }
    Ok(texts)
}

/// Widgets following the `<prefix>__control` / `<prefix>__menu` class naming
/// scheme (react-select and its many re-skins).
#[derive(Debug, Clone)]
pub struct ReactSelectAdapter {
    control: String,
    menu: String,
    option: String,
    input_class: String,
}

impl ReactSelectAdapter {
    pub fn new(prefix: &str) -> Self {
        Self {
            control: format!("[class*=\"{prefix}__control\"]"),
            menu: format!("[class*=\"{prefix}__menu-list\"], [class*=\"{prefix}__menu\"]"),
            option: format!("[class*=\"{prefix}__option\"]"),
            input_class: format!("{prefix}__input"),
        }
    }

    /// Selector for the control wrapper around the input.
    pub fn control_selector(&self) -> &str {
        &self.control
    }

    /// Class fragment carried by the widget's own input.
    pub fn input_class(&self) -> &str {
        &self.input_class
    }

    /// The container that holds both the control and, once open, the menu.
    async fn container(&self, doc: &dyn Document, input: NodeId) -> Result<Option<NodeId>> {
        if let Some(control) = doc.closest(input, &self.control).await? {
            return doc.parent(control).await;
        }
        match doc.parent(input).await? {
            Some(parent) => doc.parent(parent).await,
            None => Ok(None),
        }
    }

    async fn visible_menu(&self, doc: &dyn Document, input: NodeId) -> Result<Option<NodeId>> {
        let Some(container) = self.container(doc, input).await? else {
            return Ok(None);
        };
        let menus = doc.query_within(container, &self.menu).await?;
        first_visible(doc, menus).await
    }
}

impl Default for ReactSelectAdapter {
    fn default() -> Self {
        Self::new("select")
    }
}

#[async_trait(?Send)]
impl WidgetAdapter for ReactSelectAdapter {
    fn name(&self) -> &'static str {
        "class-prefix"
    }

    async fn matches(&self, doc: &dyn Document, input: NodeId) -> Result<bool> {
        let info = doc.describe(input).await?;
        if info.attr("class").is_some_and(|c| c.contains(&self.input_class)) {
            return Ok(true);
        }
        Ok(doc.closest(input, &self.control).await?.is_some())
    }

    async fn triggers(&self, doc: &dyn Document, input: NodeId) -> Result<Vec<NodeId>> {
        let primary = doc.closest(input, &self.control).await?.unwrap_or(input);
        let mut triggers = vec![primary];
        if let Some(parent) = doc.parent(primary).await? {
            triggers.push(parent);
        }
        Ok(triggers)
    }

    async fn open(&self, doc: &dyn Document, _input: NodeId, trigger: NodeId) -> Result<()> {
        press(doc, trigger).await
    }

    async fn is_menu_open(&self, doc: &dyn Document, input: NodeId) -> Result<bool> {
        Ok(self.visible_menu(doc, input).await?.is_some())
    }

    async fn read_options(&self, doc: &dyn Document, input: NodeId) -> Result<Vec<String>> {
        let Some(menu) = self.visible_menu(doc, input).await? else {
            return Ok(Vec::new());
        };
        let options = doc.query_within(menu, &self.option).await?;
        visible_texts(doc, options).await
    }

    async fn close(&self, doc: &dyn Document, input: NodeId) -> Result<()> {
        release_focus(doc, input).await
    }
}

/// WAI-ARIA comboboxes: `role="combobox"` pointing at a `role="listbox"`
/// through `aria-controls` or `aria-owns`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AriaListboxAdapter;

impl AriaListboxAdapter {
    async fn listbox(&self, doc: &dyn Document, input: NodeId) -> Result<Option<NodeId>> {
        let info = doc.describe(input).await?;
        let Some(target) = info
            .non_empty_attr("aria-controls")
            .or_else(|| info.non_empty_attr("aria-owns"))
            .and_then(|ids| ids.split_whitespace().next())
        else {
            return Ok(None);
        };
        let selector = format!("[id={}]", css_string(target));
        let Some(listbox) = doc.query_first(&selector).await? else {
            return Ok(None);
        };
        if doc.is_visible(listbox).await? {
            Ok(Some(listbox))
        } else {
            Ok(None)
        }
    }
}

#[async_trait(?Send)]
impl WidgetAdapter for AriaListboxAdapter {
    fn name(&self) -> &'static str {
        "aria-listbox"
    }

    async fn matches(&self, doc: &dyn Document, input: NodeId) -> Result<bool> {
        let info = doc.describe(input).await?;
        let is_combobox = info
            .attr("role")
            .is_some_and(|r| r.eq_ignore_ascii_case("combobox"));
        Ok(is_combobox && (info.has_attr("aria-controls") || info.has_attr("aria-owns")))
    }

    async fn triggers(&self, doc: &dyn Document, input: NodeId) -> Result<Vec<NodeId>> {
        let mut triggers = vec![input];
        if let Some(parent) = doc.parent(input).await? {
            triggers.push(parent);
        }
        Ok(triggers)
    }

    async fn open(&self, doc: &dyn Document, _input: NodeId, trigger: NodeId) -> Result<()> {
        press(doc, trigger).await
    }

    async fn is_menu_open(&self, doc: &dyn Document, input: NodeId) -> Result<bool> {
        Ok(self.listbox(doc, input).await?.is_some())
    }

    async fn read_options(&self, doc: &dyn Document, input: NodeId) -> Result<Vec<String>> {
        let Some(listbox) = self.listbox(doc, input).await? else {
            return Ok(Vec::new());
        };
        let options = doc.query_within(listbox, "[role=\"option\"]").await?;
        visible_texts(doc, options).await
    }

    async fn close(&self, doc: &dyn Document, input: NodeId) -> Result<()> {
        release_focus(doc, input).await
    }
}
