// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page identity and target-route matching.
//!
//! The host is a single-page application: navigation rewrites the URL
//! without reloading the script, so page identity is polled. Two locations
//! are the same page exactly when their [`route_key`](Location::route_key)s
//! are equal.

use alloc::format;
use alloc::string::String;

/// The parts of the page URL that determine identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Location {
    /// The path, e.g. `/watch`.
    pub path: String,
    /// The query string including its leading `?`, or empty.
    pub query: String,
}

impl Location {
    /// Creates a location from its path and query string.
    #[must_use]
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    /// Returns the identity key `path|query`.
    #[must_use]
    pub fn route_key(&self) -> String {
        format!("{}|{}", self.path, self.query)
    }

    /// Returns `true` for pages that host the player.
    #[must_use]
    pub fn is_target(&self) -> bool {
        is_target_route(&self.path)
    }

    /// Returns the raw value of the first query parameter called `name`.
    ///
    /// Values are not percent-decoded. A parameter without `=` reads as an
    /// empty value.
    #[must_use]
    pub fn query_flag(&self, name: &str) -> Option<&str> {
        let query = self.query.strip_prefix('?').unwrap_or(&self.query);
        query
            .split('&')
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .find_map(|(key, value)| (key == name).then_some(value))
    }
}

/// Returns `true` for `/watch` and any path under `/shorts`.
#[must_use]
pub fn is_target_route(path: &str) -> bool {
    path == "/watch" || path.starts_with("/shorts")
}

/// Whether the indicator should exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Not on a target page. No node, no acquisition.
    #[default]
    Inactive,
    /// On a target page. The indicator is kept mounted.
    Active,
}

impl Lifecycle {
    /// The lifecycle a page at `location` should be in.
    #[must_use]
    pub fn for_location(location: &Location) -> Self {
        if location.is_target() {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// Returns a short lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_routes() {
        assert!(is_target_route("/watch"));
        assert!(is_target_route("/shorts"));
        assert!(is_target_route("/shorts/abc123"));
        assert!(!is_target_route("/watch/later"));
        assert!(!is_target_route("/"));
        assert!(!is_target_route("/results"));
        assert!(!is_target_route(""));
    }

    #[test]
    fn route_key_includes_query() {
        let a = Location::new("/watch", "?v=A");
        let b = Location::new("/watch", "?v=B");
        assert_eq!(a.route_key(), "/watch|?v=A");
        assert_ne!(a.route_key(), b.route_key());
        assert_eq!(Location::new("/", "").route_key(), "/|");
    }

    #[test]
    fn query_flags() {
        let loc = Location::new("/watch", "?v=abc&yt_speed_debug=1&t");
        assert_eq!(loc.query_flag("yt_speed_debug"), Some("1"));
        assert_eq!(loc.query_flag("v"), Some("abc"));
        assert_eq!(loc.query_flag("t"), Some(""));
        assert_eq!(loc.query_flag("list"), None);
        assert_eq!(Location::default().query_flag("v"), None);
    }

    #[test]
    fn lifecycle_for_location() {
        assert_eq!(Lifecycle::for_location(&Location::new("/watch", "?v=1")), Lifecycle::Active);
        assert_eq!(Lifecycle::for_location(&Location::new("/feed", "")), Lifecycle::Inactive);
    }
}
