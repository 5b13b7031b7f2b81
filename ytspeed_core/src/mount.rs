// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mount-point resolution and the indicator reconciler.
//!
//! The host repaints its player chrome whenever it likes, so the indicator's
//! position is never cached. Every sample tick resolves the mount point
//! again and the [`Reconciler`] brings the page back to the desired shape:
//! exactly one indicator, the leftmost child of the right-side controls when
//! they exist.
//!
//! Mount point priority:
//!
//! | Mode | Container |
//! |---|---|
//! | [`Primary`](MountMode::Primary) | right-side controls |
//! | [`Fallback`](MountMode::Fallback) | any control strip |
//! | [`Overlay`](MountMode::Overlay) | the player root, absolutely positioned |

use crate::backend::HostDocument;
use crate::config::MountSelectors;

/// How the indicator is attached, which determines its styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MountMode {
    /// Inline in the right-side controls.
    Primary,
    /// Inline in a fallback control strip.
    Fallback,
    /// Floating over the player.
    Overlay,
}

impl MountMode {
    /// Returns a short name for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "controls",
            Self::Fallback => "controls-fallback",
            Self::Overlay => "overlay",
        }
    }

    /// Returns `true` for the two inline modes.
    #[must_use]
    pub const fn is_inline(self) -> bool {
        matches!(self, Self::Primary | Self::Fallback)
    }
}

/// A resolved mount point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountDescriptor<N> {
    /// The container node.
    pub target: N,
    /// How to attach to it.
    pub mode: MountMode,
}

/// What a reconciliation pass did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MountOutcome {
    /// The indicator was missing and has been created.
    Created(MountMode),
    /// The indicator existed and was moved to the leftmost position.
    Moved,
    /// The page already had the desired shape.
    Unchanged,
    /// No mount point could be found this tick.
    Unresolved,
}

impl MountOutcome {
    /// Returns `true` if the pass changed the document.
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Created(_) | Self::Moved)
    }
}

/// Finds the player root: by id first, then by selector.
pub fn resolve_player_root<D>(document: &D, selectors: &MountSelectors) -> Option<D::Node>
where
    D: HostDocument + ?Sized,
{
    document
        .element_by_id(selectors.player_root_id)
        .or_else(|| document.query_first(selectors.player_roots))
}

/// Resolves the mount point with the highest priority available right now.
pub fn resolve_mount<D>(document: &D, selectors: &MountSelectors) -> Option<MountDescriptor<D::Node>>
where
    D: HostDocument + ?Sized,
{
    if let Some(target) = document.query(selectors.primary) {
        return Some(MountDescriptor {
            target,
            mode: MountMode::Primary,
        });
    }
    if let Some(target) = document.query_first(selectors.fallbacks) {
        return Some(MountDescriptor {
            target,
            mode: MountMode::Fallback,
        });
    }
    resolve_player_root(document, selectors).map(|target| MountDescriptor {
        target,
        mode: MountMode::Overlay,
    })
}

/// Keeps exactly one indicator mounted in the right place.
#[derive(Clone, Copy, Debug)]
pub struct Reconciler {
    indicator_id: &'static str,
    selectors: MountSelectors,
}

impl Reconciler {
    /// Creates a reconciler for the indicator with the given element id.
    #[must_use]
    pub const fn new(indicator_id: &'static str, selectors: MountSelectors) -> Self {
        Self {
            indicator_id,
            selectors,
        }
    }

    /// Returns the indicator node if it is attached to the document.
    pub fn find<D: HostDocument + ?Sized>(&self, document: &D) -> Option<D::Node> {
        document.element_by_id(self.indicator_id)
    }

    /// Brings the document to the desired shape.
    ///
    /// Creates the indicator (with `text`) under the resolved mount point if
    /// it is missing, then moves it to the front of the right-side controls
    /// if those exist. Running it again without host changes does nothing.
    ///
    /// Returns the indicator node, if one is attached afterwards.
    pub fn reconcile<D: HostDocument + ?Sized>(
        &self,
        document: &mut D,
        text: &str,
    ) -> (Option<D::Node>, MountOutcome) {
        let Some(mount) = resolve_mount(&*document, &self.selectors) else {
            return (self.find(&*document), MountOutcome::Unresolved);
        };

        let (node, created) = match self.find(&*document) {
            Some(node) => (node, false),
            None => {
                let Some(node) = document.create_indicator(self.indicator_id, mount.mode, text)
                else {
                    return (None, MountOutcome::Unresolved);
                };
                if !document.insert_first(&mount.target, &node) {
                    return (None, MountOutcome::Unresolved);
                }
                (node, true)
            }
        };

        let moved = self.move_to_leftmost(document, &node);
        let outcome = match (created, moved) {
            (true, _) => MountOutcome::Created(mount.mode),
            (false, true) => MountOutcome::Moved,
            (false, false) => MountOutcome::Unchanged,
        };
        (Some(node), outcome)
    }

    /// Removes the indicator. Returns `true` if one was attached.
    pub fn remove<D: HostDocument + ?Sized>(&self, document: &mut D) -> bool {
        match self.find(&*document) {
            Some(node) => {
                document.remove(&node);
                true
            }
            None => false,
        }
    }

    fn move_to_leftmost<D: HostDocument + ?Sized>(&self, document: &mut D, node: &D::Node) -> bool {
        let Some(primary) = document.query(self.selectors.primary) else {
            return false;
        };
        let in_place = document.parent(node).as_ref() == Some(&primary)
            && document.first_element_child(&primary).as_ref() == Some(node);
        if in_place {
            return false;
        }
        document.insert_first(&primary, node)
    }
}
