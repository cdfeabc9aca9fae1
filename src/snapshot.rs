//! In-memory page snapshot implementing [`Page`].
//!
//! A snapshot is a tree of elements with their attributes, rendered boxes
//! and text, serialized as JSON. It stands in for a live DOM in the CLI and
//! in tests; injected content is recorded on the elements so the result can
//! be written back out.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::inject::html_to_plain_text;
use crate::page::{Page, Rect, Selector};

/// Serialized form of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub elements: Vec<ElementSpec>,
}

/// Serialized form of one element and its subtree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    pub rect: Rect,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// HTML written into the element by an import.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,
}

/// Width given to elements placed with [`ElementSpec::at`].
const DEFAULT_WIDTH: f64 = 680.0;

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Place the element at `top` with the given height and a fixed width.
    pub fn at(mut self, top: f64, height: f64) -> Self {
        self.rect = Rect::new(top, 0.0, DEFAULT_WIDTH, height);
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// Handle to an element of a [`Snapshot`]. Stable across content writes.
///
/// A handle is an index into the snapshot that produced it. Passing a handle
/// from another snapshot, or one built by hand past the last element, to any
/// [`Page`] method panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    rect: Rect,
    text: String,
    html: Option<String>,
    children: Vec<NodeId>,
}

/// Arena-backed element tree.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    elements: Vec<Element>,
    roots: Vec<NodeId>,
}

impl Snapshot {
    pub fn from_elements(elements: Vec<ElementSpec>) -> Self {
        Self::from_spec(PageSpec { elements })
    }

    pub fn from_spec(spec: PageSpec) -> Self {
        let mut snapshot = Snapshot::default();
        for element in spec.elements {
            let id = snapshot.insert(element);
            snapshot.roots.push(id);
        }
        snapshot
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let spec: PageSpec = serde_json::from_str(json)?;
        Ok(Self::from_spec(spec))
    }

    pub fn to_spec(&self) -> PageSpec {
        PageSpec {
            elements: self.roots.iter().map(|id| self.spec_of(*id)).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_spec())?)
    }

    pub fn tag_name(&self, node: &NodeId) -> String {
        self.element(node).tag.clone()
    }

    /// HTML last written into the element, if any.
    pub fn html(&self, node: &NodeId) -> Option<&str> {
        self.element(node).html.as_deref()
    }

    fn insert(&mut self, spec: ElementSpec) -> NodeId {
        let id = NodeId(self.elements.len());
        self.elements.push(Element {
            tag: spec.tag.to_ascii_lowercase(),
            attributes: spec.attributes,
            rect: spec.rect,
            text: spec.text,
            html: spec.html,
            children: Vec::new(),
        });
        for child in spec.children {
            let child_id = self.insert(child);
            self.elements[id.0].children.push(child_id);
        }
        id
    }

    fn spec_of(&self, id: NodeId) -> ElementSpec {
        let element = self.element(&id);
        ElementSpec {
            tag: element.tag.clone(),
            attributes: element.attributes.clone(),
            rect: element.rect,
            text: element.text.clone(),
            html: element.html.clone(),
            children: element.children.iter().map(|c| self.spec_of(*c)).collect(),
        }
    }

    // Out-of-range handles panic; see `NodeId`
    fn element(&self, node: &NodeId) -> &Element {
        &self.elements[node.0]
    }

    fn walk(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        for child in &self.element(&id).children {
            self.walk(*child, out);
        }
    }

    fn document_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.elements.len());
        for root in &self.roots {
            self.walk(*root, &mut out);
        }
        out
    }

    fn matches_element(element: &Element, selector: &Selector) -> bool {
        selector.matches_parts(&element.tag, |name| {
            element.attributes.get(name).map(String::as_str)
        })
    }

    /// Replaced content detaches the old subtree.
    fn replace_content(&mut self, node: &NodeId, text: String, html: Option<String>) {
        let element = &mut self.elements[node.0];
        element.children.clear();
        element.text = text;
        element.html = html;
    }
}

impl Page for Snapshot {
    type Node = NodeId;

    fn query_any(&self, selectors: &[Selector]) -> Vec<NodeId> {
        self.document_order()
            .into_iter()
            .filter(|id| {
                let element = self.element(id);
                selectors
                    .iter()
                    .any(|selector| Self::matches_element(element, selector))
            })
            .collect()
    }

    fn descendants(&self, node: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(*node, &mut out);
        out.remove(0);
        out
    }

    fn matches(&self, node: &NodeId, selector: &Selector) -> bool {
        Self::matches_element(self.element(node), selector)
    }

    fn bounding_box(&self, node: &NodeId) -> Rect {
        self.element(node).rect
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.element(node).attributes.get(name).cloned()
    }

    fn text_content(&self, node: &NodeId) -> String {
        let mut ids = Vec::new();
        self.walk(*node, &mut ids);
        ids.iter().map(|id| self.element(id).text.as_str()).collect()
    }

    fn replace_text(&mut self, node: &NodeId, text: &str) {
        self.replace_content(node, text.to_string(), None);
    }

    fn replace_html(&mut self, node: &NodeId, html: &str) -> bool {
        // Like a browser, a plaintext-only surface refuses rich insertion
        if self.element(node).attributes.get("contenteditable").map(String::as_str)
            == Some("plaintext-only")
        {
            return false;
        }
        self.replace_content(node, html_to_plain_text(html), Some(html.to_string()));
        true
    }
}
