//! [`Document`] over a static HTML snapshot.
//!
//! Useful for scanning saved pages offline and for exercising the scanner
//! without a browser. Nothing ever renders, so widget menus are only seen
//! if they are already present in the markup. Dispatched events are recorded
//! instead of executed.

use std::cell::RefCell;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Node, Selector};

use crate::dom::{Document, DomEvent, NodeId, NodeInfo};
use crate::error::{Error, Result};

pub struct HtmlSnapshot<'a> {
    /// Every element of the document, in document order; `NodeId` indexes it.
    elements: Vec<ElementRef<'a>>,
    events: RefCell<Vec<(NodeId, DomEvent)>>,
}

impl<'a> HtmlSnapshot<'a> {
    pub fn new(html: &'a Html) -> Self {
        let elements = html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .collect();
        Self {
            elements,
            events: RefCell::new(Vec::new()),
        }
    }

    /// Events dispatched so far, oldest first.
    pub fn events(&self) -> Vec<(NodeId, DomEvent)> {
        self.events.borrow().clone()
    }

    fn element(&self, node: NodeId) -> Result<ElementRef<'a>> {
        self.elements
            .get(node.0 as usize)
            .copied()
            .ok_or(Error::StaleNode(node))
    }

    fn id_of(&self, el: ElementRef<'a>) -> Option<NodeId> {
        self.elements
            .iter()
            .position(|candidate| candidate.id() == el.id())
            .map(|idx| NodeId(idx as u32))
    }

    fn parse(selector: &str) -> Result<Selector> {
        Selector::parse(selector).map_err(|e| Error::InvalidSelector(format!("{selector}: {e:?}")))
    }

    fn hidden_by_markup(el: ElementRef<'_>) -> bool {
        let value = el.value();
        if value.attr("hidden").is_some() {
            return true;
        }
        if value.name() == "input"
            && value
                .attr("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
        {
            return true;
        }
        let style: String = value
            .attr("style")
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        style.contains("display:none") || style.contains("visibility:hidden")
    }
}

#[async_trait(?Send)]
impl<'a> Document for HtmlSnapshot<'a> {
    async fn query_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let selector = Self::parse(selector)?;
        Ok(self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, el)| selector.matches(el))
            .map(|(idx, _)| NodeId(idx as u32))
            .collect())
    }

    async fn query_within(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let scope_el = self.element(scope)?;
        let selector = Self::parse(selector)?;
        Ok(scope_el
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.id() != scope_el.id() && selector.matches(el))
            .filter_map(|el| self.id_of(el))
            .collect())
    }

    async fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let selector = Self::parse(selector)?;
        let mut current = Some(self.element(node)?);
        while let Some(el) = current {
            if selector.matches(&el) {
                return Ok(self.id_of(el));
            }
            current = el.parent().and_then(ElementRef::wrap);
        }
        Ok(None)
    }

    async fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        let el = self.element(node)?;
        Ok(el
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|p| self.id_of(p)))
    }

    async fn describe(&self, node: NodeId) -> Result<NodeInfo> {
        let el = self.element(node)?;
        let value = el.value();
        Ok(NodeInfo {
            tag: value.name().to_ascii_lowercase(),
            attributes: value
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }

    async fn text(&self, node: NodeId) -> Result<String> {
        Ok(self.element(node)?.text().collect())
    }

    async fn following_text(&self, node: NodeId) -> Result<Option<String>> {
        let el = self.element(node)?;
        let mut sibling = el.next_sibling();
        while let Some(sib) = sibling {
            let text = match sib.value() {
                Node::Text(text) => (&**text).to_string(),
                Node::Element(_) => ElementRef::wrap(sib)
                    .map(|e| e.text().collect())
                    .unwrap_or_default(),
                _ => String::new(),
            };
            if !text.trim().is_empty() {
                return Ok(Some(text));
            }
            sibling = sib.next_sibling();
        }
        Ok(None)
    }

    async fn is_visible(&self, node: NodeId) -> Result<bool> {
        let mut current = Some(self.element(node)?);
        while let Some(el) = current {
            if Self::hidden_by_markup(el) {
                return Ok(false);
            }
            current = el.parent().and_then(ElementRef::wrap);
        }
        Ok(true)
    }

    async fn dispatch(&self, node: NodeId, event: DomEvent) -> Result<()> {
        self.element(node)?;
        self.events.borrow_mut().push((node, event));
        Ok(())
    }
}
