use async_trait::async_trait;
use chromiumoxide::page::Page as CrPage;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::dom::{Document, DomEvent, NodeId, NodeInfo};
use crate::error::{Error, Result};

/// Installs the node registry that backs [`NodeId`] handles on a live page.
///
/// Elements are registered the first time a query returns them and keep
/// their id while they stay attached. The registry only holds weak
/// references, and detached entries are swept every `SWEEP_EVERY`
/// registrations, so menus that are mounted and unmounted on every open do
/// not accumulate.
const REGISTRY_JS: &str = r#"
    if (!window.__formDiscovery) {
        const SWEEP_EVERY = 256;
        const nodes = new Map();
        const ids = new WeakMap();
        let next = 0;
        let sinceSweep = 0;
        const sweep = () => {
            for (const [id, ref] of nodes) {
                const el = ref.deref();
                if (!el || !el.isConnected) nodes.delete(id);
            }
        };
        window.__formDiscovery = {
            reg(el) {
                if (!el) return null;
                let id = ids.get(el);
                if (id === undefined) {
                    id = next++;
                    ids.set(el, id);
                    if (++sinceSweep >= SWEEP_EVERY) {
                        sinceSweep = 0;
                        sweep();
                    }
                }
                if (!nodes.has(id)) nodes.set(id, new WeakRef(el));
                return id;
            },
            get(id) {
                const ref = nodes.get(id);
                const el = ref && ref.deref();
                if (!el || !el.isConnected) throw new Error('stale node ' + id);
                return el;
            },
            size() {
                return nodes.size;
            },
        };
    }
    const __fd = window.__formDiscovery;
"#;

/// Reply envelope; script exceptions come back as `err` instead of a CDP
/// exception so transport failures stay distinguishable.
#[derive(Deserialize)]
struct Reply {
    #[serde(default)]
    ok: serde_json::Value,
    #[serde(default)]
    err: Option<String>,
}

/// A live Chrome tab exposed as a [`Document`].
pub struct Page {
    inner: CrPage,
}

impl Page {
    /// Wrap a chromiumoxide page that is already open.
    pub fn new(inner: CrPage) -> Self {
        Self { inner }
    }

    /// Returns a reference to the underlying chromiumoxide Page.
    pub fn inner(&self) -> &CrPage {
        &self.inner
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Navigate to the given URL and wait for the page to load.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.inner
            .goto(url)
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?;
        Ok(())
    }

    /// Replace the current document with the given markup.
    pub async fn set_html(&self, html: &str) -> Result<()> {
        let html_js = serde_json::to_string(html).map_err(|e| Error::JsError(e.to_string()))?;
        let js = format!(
            r#"
            (() => {{
                document.open();
                document.write({html_js});
                document.close();
                delete window.__formDiscovery;
                return true;
            }})()
            "#,
        );
        self.inner.evaluate(js).await?;
        Ok(())
    }

    /// Get the current page title.
    pub async fn title(&self) -> Result<String> {
        let result = self
            .inner
            .evaluate("document.title")
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        match result.into_value::<String>() {
            Ok(title) => Ok(title),
            Err(_) => Ok(String::new()),
        }
    }

    // ── Registry calls ──────────────────────────────────────────────

    /// Number of elements the handle registry currently tracks.
    pub async fn registered_nodes(&self) -> Result<usize> {
        self.call("return __fd.size();").await
    }

    /// Run `body` (a function body with the registry in scope as `__fd`) and
    /// decode its return value.
    async fn call<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        let js = format!(
            r#"
            (() => {{
                try {{
                    {REGISTRY_JS}
                    const __out = (() => {{ {body} }})();
                    return JSON.stringify({{ ok: __out === undefined ? null : __out }});
                }} catch (e) {{
                    return JSON.stringify({{ err: String((e && e.message) || e) }});
                }}
            }})()
            "#,
        );
        let result = self.inner.evaluate(js).await?;
        let json_str: String = result
            .into_value()
            .map_err(|e| Error::HostUnavailable(e.to_string()))?;
        let reply: Reply =
            serde_json::from_str(&json_str).map_err(|e| Error::JsError(e.to_string()))?;
        if let Some(err) = reply.err {
            return Err(Error::JsError(err));
        }
        serde_json::from_value(reply.ok).map_err(|e| Error::JsError(e.to_string()))
    }
}

fn js_str(value: &str) -> String {
    // A &str always serializes.
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn event_js(event: DomEvent) -> &'static str {
    match event {
        DomEvent::MouseDown => {
            "el.dispatchEvent(new MouseEvent('mousedown', { bubbles: true, cancelable: true, view: window }));"
        }
        DomEvent::MouseUp => {
            "el.dispatchEvent(new MouseEvent('mouseup', { bubbles: true, cancelable: true, view: window }));"
        }
        DomEvent::Click => {
            "el.dispatchEvent(new MouseEvent('click', { bubbles: true, cancelable: true, view: window }));"
        }
        DomEvent::Focus => "el.focus();",
        DomEvent::Blur => "el.blur();",
        DomEvent::Escape => {
            r#"
            const init = { key: 'Escape', code: 'Escape', keyCode: 27, which: 27, bubbles: true, cancelable: true };
            el.dispatchEvent(new KeyboardEvent('keydown', init));
            el.dispatchEvent(new KeyboardEvent('keyup', init));
            "#
        }
    }
}

#[async_trait(?Send)]
impl Document for Page {
    async fn query_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let body = format!(
            "return Array.from(document.querySelectorAll({})).map(el => __fd.reg(el));",
            js_str(selector)
        );
        let ids: Vec<u32> = self.call(&body).await?;
        Ok(ids.into_iter().map(NodeId).collect())
    }

    async fn query_within(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let body = format!(
            "return Array.from(__fd.get({}).querySelectorAll({})).map(el => __fd.reg(el));",
            scope.0,
            js_str(selector)
        );
        let ids: Vec<u32> = self.call(&body).await?;
        Ok(ids.into_iter().map(NodeId).collect())
    }

    async fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let body = format!(
            "return __fd.reg(__fd.get({}).closest({}));",
            node.0,
            js_str(selector)
        );
        let id: Option<u32> = self.call(&body).await?;
        Ok(id.map(NodeId))
    }

    async fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        let body = format!("return __fd.reg(__fd.get({}).parentElement);", node.0);
        let id: Option<u32> = self.call(&body).await?;
        Ok(id.map(NodeId))
    }

    async fn describe(&self, node: NodeId) -> Result<NodeInfo> {
        let body = format!(
            r#"
            const el = __fd.get({});
            const attributes = {{}};
            for (const a of Array.from(el.attributes)) attributes[a.name] = a.value;
            return {{ tag: el.tagName.toLowerCase(), attributes }};
            "#,
            node.0
        );
        self.call(&body).await
    }

    async fn text(&self, node: NodeId) -> Result<String> {
        let body = format!(
            "const el = __fd.get({}); return el.innerText || el.textContent || '';",
            node.0
        );
        self.call(&body).await
    }

    async fn following_text(&self, node: NodeId) -> Result<Option<String>> {
        let body = format!(
            r#"
            let sib = __fd.get({}).nextSibling;
            while (sib) {{
                const text = (sib.nodeType === Node.ELEMENT_NODE ? (sib.innerText || sib.textContent) : sib.textContent) || '';
                if (text.trim()) return text;
                sib = sib.nextSibling;
            }}
            return null;
            "#,
            node.0
        );
        self.call(&body).await
    }

    async fn is_visible(&self, node: NodeId) -> Result<bool> {
        let body = format!(
            r#"
            const el = __fd.get({});
            const style = window.getComputedStyle(el);
            if (style.display === 'none' || style.visibility === 'hidden') return false;
            return el.offsetParent !== null || style.position === 'fixed';
            "#,
            node.0
        );
        self.call(&body).await
    }

    async fn dispatch(&self, node: NodeId, event: DomEvent) -> Result<()> {
        let body = format!(
            "const el = __fd.get({}); {} return null;",
            node.0,
            event_js(event)
        );
        self.call(&body).await
    }
}
