// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`HostDocument`] over the live DOM.
//!
//! Every call goes through the fallible `web-sys` bindings and collapses
//! errors (invalid selectors, detached nodes, exceptions from host scripts)
//! into `None` or `false`.

use alloc::string::String;

use wasm_bindgen::JsCast as _;
use web_sys::{Document, Element, HtmlElement, Node};
use ytspeed_core::backend::HostDocument;
use ytspeed_core::mount::MountMode;

use crate::style;

/// The page document, seen through the [`HostDocument`] contract.
pub struct WebDocument {
    document: Document,
    aria_label: &'static str,
}

impl core::fmt::Debug for WebDocument {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebDocument")
            .field("document", &"Document")
            .field("aria_label", &self.aria_label)
            .finish()
    }
}

impl WebDocument {
    /// Wraps `document`. Indicators created through it carry `aria_label`.
    #[must_use]
    pub fn new(document: Document, aria_label: &'static str) -> Self {
        Self {
            document,
            aria_label,
        }
    }

    /// Wraps the current window's document, if there is one.
    #[must_use]
    pub fn from_window(aria_label: &'static str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self::new(document, aria_label))
    }

    /// Returns the underlying document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl HostDocument for WebDocument {
    type Node = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn first_element_child(&self, node: &Element) -> Option<Element> {
        node.first_element_child()
    }

    fn create_indicator(&mut self, id: &str, mode: MountMode, text: &str) -> Option<Element> {
        let el: HtmlElement = self.document.create_element("span").ok()?.dyn_into().ok()?;
        el.set_id(id);
        el.set_text_content(Some(text));
        let _ = el.set_attribute("aria-label", self.aria_label);
        style::apply_mount_style(&el, mode);
        Some(el.into())
    }

    fn insert_first(&mut self, parent: &Element, child: &Element) -> bool {
        let reference: Option<Node> = parent
            .first_element_child()
            .map(Node::from)
            .or_else(|| parent.first_child());
        parent.insert_before(child, reference.as_ref()).is_ok()
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }
}
