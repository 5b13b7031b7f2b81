// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host doubles for unit tests.
//!
//! [`FakeDocument`] is a tiny arena-backed node tree that understands the
//! selector forms the crate actually uses (`.class`, `#id`, `tag`,
//! `[class*='x']` and descendant combinations of those). Anything else is
//! treated as an invalid selector and matches nothing.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::Cell;

use crate::acquire::{CapabilityError, Diagnostics, PlayerHandle};
use crate::backend::{HostDocument, PreferenceStore};
use crate::mount::MountMode;

/// Handle to a node in a [`FakeDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FakeNode(usize);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    attributes: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<usize>,
    mode: Option<MountMode>,
}

/// Arena-backed document. Node 0 is the body and is always attached.
#[derive(Debug)]
pub(crate) struct FakeDocument {
    nodes: Vec<NodeData>,
    text_writes: usize,
}

enum Simple<'s> {
    Class(&'s str),
    Id(&'s str),
    Tag(&'s str),
    ClassContains(&'s str),
}

impl FakeDocument {
    pub(crate) fn new() -> Self {
        let body = NodeData {
            tag: "body".to_string(),
            ..NodeData::default()
        };
        Self {
            nodes: alloc::vec![body],
            text_writes: 0,
        }
    }

    pub(crate) fn root(&self) -> FakeNode {
        FakeNode(0)
    }

    pub(crate) fn append(&mut self, parent: FakeNode, classes: &[&str]) -> FakeNode {
        self.append_element(parent, "div", None, classes)
    }

    pub(crate) fn append_element(
        &mut self,
        parent: FakeNode,
        tag: &str,
        id: Option<&str>,
        classes: &[&str],
    ) -> FakeNode {
        let index = self.nodes.len();
        self.nodes.push(NodeData {
            tag: tag.to_string(),
            id: id.map(ToString::to_string),
            classes: classes.iter().map(ToString::to_string).collect(),
            parent: Some(parent.0),
            ..NodeData::default()
        });
        self.nodes[parent.0].children.push(index);
        FakeNode(index)
    }

    pub(crate) fn set_id(&mut self, node: FakeNode, id: &str) {
        self.nodes[node.0].id = Some(id.to_string());
    }

    /// Sets text without counting it as an indicator write.
    pub(crate) fn set_text_raw(&mut self, node: FakeNode, text: &str) {
        self.nodes[node.0].text = text.to_string();
    }

    /// Simulates the host removing a node.
    pub(crate) fn detach(&mut self, node: FakeNode) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent].children.retain(|&c| c != node.0);
        }
    }

    pub(crate) fn children(&self, node: FakeNode) -> Vec<FakeNode> {
        self.nodes[node.0].children.iter().map(|&c| FakeNode(c)).collect()
    }

    pub(crate) fn mode_of(&self, node: FakeNode) -> Option<MountMode> {
        self.nodes[node.0].mode
    }

    pub(crate) fn text_writes(&self) -> usize {
        self.text_writes
    }

    /// Number of attached nodes carrying `id`.
    pub(crate) fn count_id(&self, id: &str) -> usize {
        self.preorder()
            .into_iter()
            .filter(|&n| self.nodes[n].id.as_deref() == Some(id))
            .count()
    }

    fn preorder(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![0];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n].children.iter().rev());
        }
        out
    }

    fn is_attached(&self, mut n: usize) -> bool {
        loop {
            if n == 0 {
                return true;
            }
            match self.nodes[n].parent {
                Some(p) => n = p,
                None => return false,
            }
        }
    }

    fn parse_simple(part: &str) -> Option<Simple<'_>> {
        if let Some(inner) = part
            .strip_prefix("[class*='")
            .and_then(|s| s.strip_suffix("']"))
        {
            return Some(Simple::ClassContains(inner));
        }
        let valid = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };
        if let Some(class) = part.strip_prefix('.') {
            return valid(class).then_some(Simple::Class(class));
        }
        if let Some(id) = part.strip_prefix('#') {
            return valid(id).then_some(Simple::Id(id));
        }
        valid(part).then_some(Simple::Tag(part))
    }

    fn matches(&self, n: usize, simple: &Simple<'_>) -> bool {
        let data = &self.nodes[n];
        match simple {
            Simple::Class(c) => data.classes.iter().any(|k| k.as_str() == *c),
            Simple::Id(id) => data.id.as_deref() == Some(*id),
            Simple::Tag(tag) => data.tag == *tag,
            Simple::ClassContains(s) => data.classes.join(" ").contains(*s),
        }
    }

    fn matches_chain(&self, n: usize, chain: &[Simple<'_>]) -> bool {
        let Some((last, ancestors)) = chain.split_last() else {
            return false;
        };
        if !self.matches(n, last) {
            return false;
        }
        let mut remaining = ancestors;
        let mut cursor = self.nodes[n].parent;
        while let Some((want, rest)) = remaining.split_last() {
            loop {
                let Some(p) = cursor else {
                    return false;
                };
                cursor = self.nodes[p].parent;
                if self.matches(p, want) {
                    break;
                }
            }
            remaining = rest;
        }
        true
    }

    fn collect_text(&self, n: usize, out: &mut String) {
        out.push_str(&self.nodes[n].text);
        for &c in &self.nodes[n].children {
            self.collect_text(c, out);
        }
    }
}

impl HostDocument for FakeDocument {
    type Node = FakeNode;

    fn query(&self, selector: &str) -> Option<FakeNode> {
        let chain: Option<Vec<Simple<'_>>> = selector
            .split_whitespace()
            .map(Self::parse_simple)
            .collect();
        let chain = chain?;
        self.preorder()
            .into_iter()
            .skip(1)
            .find(|&n| self.matches_chain(n, &chain))
            .map(FakeNode)
    }

    fn element_by_id(&self, id: &str) -> Option<FakeNode> {
        self.preorder()
            .into_iter()
            .find(|&n| self.nodes[n].id.as_deref() == Some(id))
            .map(FakeNode)
    }

    fn text_content(&self, node: &FakeNode) -> String {
        let mut out = String::new();
        self.collect_text(node.0, &mut out);
        out
    }

    fn parent(&self, node: &FakeNode) -> Option<FakeNode> {
        self.nodes[node.0].parent.map(FakeNode)
    }

    fn first_element_child(&self, node: &FakeNode) -> Option<FakeNode> {
        self.nodes[node.0].children.first().copied().map(FakeNode)
    }

    fn create_indicator(&mut self, id: &str, mode: MountMode, text: &str) -> Option<FakeNode> {
        let index = self.nodes.len();
        self.nodes.push(NodeData {
            tag: "span".to_string(),
            id: Some(id.to_string()),
            text: text.to_string(),
            mode: Some(mode),
            ..NodeData::default()
        });
        Some(FakeNode(index))
    }

    fn insert_first(&mut self, parent: &FakeNode, child: &FakeNode) -> bool {
        if parent == child || !self.is_attached(parent.0) {
            return false;
        }
        self.detach(*child);
        self.nodes[parent.0].children.insert(0, child.0);
        self.nodes[child.0].parent = Some(parent.0);
        true
    }

    fn remove(&mut self, node: &FakeNode) {
        self.detach(*node);
    }

    fn set_text(&mut self, node: &FakeNode, text: &str) {
        self.text_writes += 1;
        let children = core::mem::take(&mut self.nodes[node.0].children);
        for c in children {
            self.nodes[c].parent = None;
        }
        self.nodes[node.0].text = text.to_string();
    }

    fn attribute(&self, node: &FakeNode, name: &str) -> Option<String> {
        self.nodes[node.0]
            .attributes
            .iter()
            .find_map(|(k, v)| (k == name).then(|| v.clone()))
    }

    fn set_attribute(&mut self, node: &FakeNode, name: &str, value: &str) {
        let attributes = &mut self.nodes[node.0].attributes;
        match attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }
}

/// Scripted player. Every capability defaults to [`CapabilityError::Unsupported`].
#[derive(Debug)]
pub(crate) struct FakePlayer {
    stats_arg0: Result<Diagnostics, CapabilityError>,
    stats: Result<Diagnostics, CapabilityError>,
    debug_text: Result<String, CapabilityError>,
    calls: Cell<usize>,
}

impl FakePlayer {
    pub(crate) fn new() -> Self {
        Self {
            stats_arg0: Err(CapabilityError::Unsupported),
            stats: Err(CapabilityError::Unsupported),
            debug_text: Err(CapabilityError::Unsupported),
            calls: Cell::new(0),
        }
    }

    pub(crate) fn with_stats_arg0(mut self, result: Result<Diagnostics, CapabilityError>) -> Self {
        self.stats_arg0 = result;
        self
    }

    pub(crate) fn with_stats(mut self, result: Result<Diagnostics, CapabilityError>) -> Self {
        self.stats = result;
        self
    }

    pub(crate) fn with_debug_text(mut self, result: Result<String, CapabilityError>) -> Self {
        self.debug_text = result;
        self
    }

    /// Replaces the debug text result, e.g. to simulate a stalled stream.
    pub(crate) fn set_debug_text(&mut self, result: Result<String, CapabilityError>) {
        self.debug_text = result;
    }

    /// Number of capability calls made so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl PlayerHandle for FakePlayer {
    fn stats_for_nerds(&self, arg: Option<u32>) -> Result<Diagnostics, CapabilityError> {
        self.calls.set(self.calls.get() + 1);
        match arg {
            Some(_) => self.stats_arg0.clone(),
            None => self.stats.clone(),
        }
    }

    fn debug_text(&self) -> Result<String, CapabilityError> {
        self.calls.set(self.calls.get() + 1);
        self.debug_text.clone()
    }
}

/// Preference store backed by a vector.
#[derive(Debug, Default)]
pub(crate) struct MemoryPreferences {
    entries: Vec<(String, String)>,
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then(|| v.clone()))
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.retain(|(k, _)| k != key);
        self.entries.push((key.to_string(), value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors() {
        let mut doc = FakeDocument::new();
        let root = doc.root();
        let host = doc.append_element(root, "ytd-player", None, &[]);
        let player = doc.append_element(host, "div", Some("movie_player"), &["html5-video-player"]);
        let panel = doc.append(player, &["html5-video-info-panel-content"]);

        assert_eq!(doc.query("ytd-player #movie_player"), Some(player));
        assert_eq!(doc.query(".html5-video-player"), Some(player));
        assert_eq!(doc.query("[class*='video-info-panel']"), Some(panel));
        assert_eq!(doc.query("[[invalid"), None);
        assert_eq!(doc.query("section #movie_player"), None);
    }

    #[test]
    fn appended_element_keeps_id_and_classes() {
        let mut doc = FakeDocument::new();
        let root = doc.root();
        let node = doc.append_element(root, "div", Some("panel"), &["first", "second"]);
        assert_eq!(doc.element_by_id("panel"), Some(node));
        assert_eq!(doc.query(".first"), Some(node));
        assert_eq!(doc.query(".second"), Some(node));
        assert_eq!(doc.query("div"), Some(node));
        assert_eq!(doc.count_id("panel"), 1);
    }

    #[test]
    fn detached_nodes_are_invisible() {
        let mut doc = FakeDocument::new();
        let root = doc.root();
        let a = doc.append(root, &["a"]);
        doc.append_element(a, "span", Some("x"), &[]);
        assert_eq!(doc.count_id("x"), 1);
        doc.detach(a);
        assert_eq!(doc.element_by_id("x"), None);
        assert_eq!(doc.query(".a"), None);
    }
}
