//! Capability interface over a host page.
//!
//! The resolver only talks to the page through [`Page`], so the same
//! detection heuristics run against a live DOM adapter or an in-memory
//! [`Snapshot`](crate::snapshot::Snapshot).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Rendered bounding box of a node, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Attribute-based marker that makes a node directly editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `[contenteditable]`
    ContentEditable,
    /// `[role="textbox"]`
    TextboxRole,
}

/// Case-insensitive substring test on an attribute: `[name*="needle" i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrContains {
    pub name: &'static str,
    pub needle: &'static str,
}

/// A compound selector: every part that is set must match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub tag: Option<&'static str>,
    pub marker: Option<Marker>,
    pub attr: Option<AttrContains>,
}

/// Tags that accept typed text natively.
pub const NATIVE_INPUT_TAGS: &[&str] = &["textarea", "input"];

impl Selector {
    pub fn tag(tag: &'static str) -> Self {
        Self {
            tag: Some(tag),
            ..Self::default()
        }
    }

    pub fn marked(marker: Marker) -> Self {
        Self {
            marker: Some(marker),
            ..Self::default()
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn attr_contains(mut self, name: &'static str, needle: &'static str) -> Self {
        self.attr = Some(AttrContains { name, needle });
        self
    }

    /// The selector group for anything that looks like a text field,
    /// in the order a host would list them.
    pub fn editable() -> Vec<Selector> {
        vec![
            Selector::marked(Marker::ContentEditable),
            Selector::marked(Marker::TextboxRole),
            Selector::tag("textarea"),
            Selector::tag("input"),
        ]
    }

    /// Match against plain node data; adapters without a native selector
    /// engine use this.
    pub fn matches_parts<'a>(
        &self,
        tag: &str,
        attribute: impl Fn(&str) -> Option<&'a str>,
    ) -> bool {
        if let Some(expected) = self.tag {
            if !tag.eq_ignore_ascii_case(expected) {
                return false;
            }
        }

        match self.marker {
            Some(Marker::ContentEditable) if attribute("contenteditable").is_none() => {
                return false;
            }
            Some(Marker::TextboxRole) if attribute("role") != Some("textbox") => return false,
            _ => {}
        }

        if let Some(clause) = &self.attr {
            let Some(value) = attribute(clause.name) else {
                return false;
            };
            if !value
                .to_lowercase()
                .contains(&clause.needle.to_lowercase())
            {
                return false;
            }
        }

        true
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = self.tag {
            f.write_str(tag)?;
        }
        match self.marker {
            Some(Marker::ContentEditable) => f.write_str("[contenteditable]")?,
            Some(Marker::TextboxRole) => f.write_str("[role=\"textbox\"]")?,
            None => {}
        }
        if let Some(clause) = &self.attr {
            write!(f, "[{}*=\"{}\" i]", clause.name, clause.needle)?;
        }
        if self.tag.is_none() && self.marker.is_none() && self.attr.is_none() {
            f.write_str("*")?;
        }
        Ok(())
    }
}

/// What the resolver needs from a host page.
///
/// Every query reads the current state of the page; nothing is cached
/// between calls because the host may re-render at any time.
pub trait Page {
    type Node: Clone + PartialEq + fmt::Debug;

    /// Nodes matching any selector of the group (a CSS selector list),
    /// in document order, each listed once.
    fn query_any(&self, selectors: &[Selector]) -> Vec<Self::Node>;

    /// All nodes matching `selector`, in document order.
    fn query_all(&self, selector: &Selector) -> Vec<Self::Node> {
        self.query_any(std::slice::from_ref(selector))
    }

    /// Descendants of `node` in document order, excluding `node`.
    fn descendants(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn matches(&self, node: &Self::Node, selector: &Selector) -> bool;

    fn bounding_box(&self, node: &Self::Node) -> Rect;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn text_content(&self, node: &Self::Node) -> String;

    /// Replace the node's contents with plain text.
    fn replace_text(&mut self, node: &Self::Node, text: &str);

    /// Replace the node's contents with an HTML fragment. Returns false if
    /// the host refused rich insertion and nothing was written.
    fn replace_html(&mut self, node: &Self::Node, html: &str) -> bool;

    /// Yield to the host between detection attempts.
    fn pause(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}
