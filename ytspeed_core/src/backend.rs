// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for platform integrations.
//!
//! The core never touches a browser directly. A backend crate supplies the
//! following pieces:
//!
//! - **Document**: Implements [`HostDocument`] over the live page. The core
//!   reads a handful of selector-identified nodes (controls strip, fallback
//!   controls, player root, diagnostics panel) and writes exactly one node it
//!   owns, the indicator.
//!
//! - **Player**: Implements [`PlayerHandle`](crate::acquire::PlayerHandle)
//!   over the embedded player object, probing each capability defensively.
//!
//! - **Time**: A `now() -> HostTime` free function reading the platform's
//!   monotonic clock.
//!
//! - **Tick source**: Calls [`Session::route_tick`] and
//!   [`Session::sample_tick`] periodically. Not abstracted by a trait
//!   because timer setup differs fundamentally across hosts.
//!
//! - **Preferences**: Implements [`PreferenceStore`] for the single
//!   persisted display-unit choice.
//!
//! # Crate boundaries
//!
//! `ytspeed_core` owns parsing, classification, lifecycle, and this contract
//! module. Backend crates depend on `ytspeed_core` and provide host glue.
//! Application code depends on both and wires them together in its timers.
//!
//! [`Session::route_tick`]: crate::session::Session::route_tick
//! [`Session::sample_tick`]: crate::session::Session::sample_tick

use alloc::string::String;

use crate::mount::MountMode;

/// A view of the host page's node tree.
///
/// Every method is best-effort: an invalid selector, a detached node, or an
/// exception thrown by the host degrades to `None`/`false` instead of an
/// error, because the page may be rewritten between any two calls.
///
/// Both the real DOM and the in-memory test document implement this trait,
/// so the reconciler and session can be exercised without a browser.
pub trait HostDocument {
    /// A handle to a node. Equality means "same node".
    type Node: Clone + PartialEq;

    /// Returns the first node matching `selector`, if any.
    fn query(&self, selector: &str) -> Option<Self::Node>;

    /// Returns the node attached to the document with the given `id`.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Returns the node's text content (empty if unavailable).
    fn text_content(&self, node: &Self::Node) -> String;

    /// Returns the node's parent element.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Returns the node's first element child.
    fn first_element_child(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Creates a detached indicator node with the given `id` and initial
    /// `text`, styled for `mode`.
    fn create_indicator(&mut self, id: &str, mode: MountMode, text: &str) -> Option<Self::Node>;

    /// Moves (or inserts) `child` so that it becomes the first child of
    /// `parent`. Returns `true` on success.
    fn insert_first(&mut self, parent: &Self::Node, child: &Self::Node) -> bool;

    /// Detaches `node` from the document.
    fn remove(&mut self, node: &Self::Node);

    /// Replaces the node's text content.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// Returns the value of an attribute on the node.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Sets an attribute on the node.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Returns the first node matching any of `selectors`, tried in order.
    fn query_first(&self, selectors: &[&str]) -> Option<Self::Node> {
        selectors.iter().find_map(|sel| self.query(sel))
    }
}

/// A string key/value store that survives page reloads.
///
/// Only the display-unit preference is persisted. Lookups that fail for
/// any reason read as absent.
pub trait PreferenceStore {
    /// Reads a stored value.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value. Failures are ignored.
    fn set(&mut self, key: &str, value: &str);
}
