// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`PlayerHandle`] over the embedded player object.
//!
//! The player element exposes undocumented methods whose presence and return
//! shapes vary between releases. Each lookup finds the method with
//! `Reflect`, calls it inside the binding's exception catch, and converts the
//! result into core types without trusting its shape.

use alloc::format;
use alloc::string::String;

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast as _, JsValue};
use ytspeed_core::acquire::{CapabilityError, Diagnostics, PlayerHandle};
use ytspeed_core::backend::HostDocument;
use ytspeed_core::config::MountSelectors;
use ytspeed_core::mount::resolve_player_root;
use ytspeed_core::stats::{StatsMap, StatsValue};

const STATS_METHOD: &str = "getStatsForNerds";
const DEBUG_TEXT_METHOD: &str = "getDebugText";

/// The player element, queried through JS reflection.
pub struct JsPlayer {
    object: JsValue,
}

impl core::fmt::Debug for JsPlayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JsPlayer")
            .field("object", &"JsValue")
            .finish()
    }
}

impl JsPlayer {
    /// Wraps a player object.
    #[must_use]
    pub fn new(object: JsValue) -> Self {
        Self { object }
    }

    /// Locates the player root in `document`.
    pub fn find<D>(document: &D, selectors: &MountSelectors) -> Option<Self>
    where
        D: HostDocument + ?Sized,
        D::Node: Into<JsValue>,
    {
        resolve_player_root(document, selectors).map(|root| Self::new(root.into()))
    }

    fn method(&self, name: &str) -> Result<Function, CapabilityError> {
        let value = Reflect::get(&self.object, &JsValue::from_str(name)).map_err(threw)?;
        value.dyn_into::<Function>().map_err(|_| CapabilityError::Unsupported)
    }
}

impl PlayerHandle for JsPlayer {
    fn stats_for_nerds(&self, arg: Option<u32>) -> Result<Diagnostics, CapabilityError> {
        let method = self.method(STATS_METHOD)?;
        let value = match arg {
            Some(arg) => method.call1(&self.object, &JsValue::from(arg)),
            None => method.call0(&self.object),
        }
        .map_err(threw)?;
        Ok(diagnostics_from(&value))
    }

    fn debug_text(&self) -> Result<String, CapabilityError> {
        let method = self.method(DEBUG_TEXT_METHOD)?;
        let value = method.call0(&self.object).map_err(threw)?;
        value.as_string().ok_or(CapabilityError::Malformed)
    }
}

/// Classifies a diagnostics return value.
fn diagnostics_from(value: &JsValue) -> Diagnostics {
    if let Some(text) = value.as_string() {
        Diagnostics::Text(text)
    } else if value.is_object() {
        Diagnostics::Fields(stats_from_object(value))
    } else {
        Diagnostics::Empty
    }
}

/// Flattens an object's own string-keyed properties, in property order.
///
/// Properties whose getters throw are skipped.
fn stats_from_object(object: &JsValue) -> StatsMap {
    let mut stats = StatsMap::new();
    let Ok(keys) = Reflect::own_keys(object) else {
        return stats;
    };
    for key in keys.iter() {
        let Some(name) = key.as_string() else {
            continue;
        };
        if let Ok(value) = Reflect::get(object, &key) {
            stats.insert(name, stats_value(&value));
        }
    }
    stats
}

fn stats_value(value: &JsValue) -> StatsValue {
    if value.is_null() || value.is_undefined() {
        StatsValue::Null
    } else if let Some(text) = value.as_string() {
        StatsValue::Text(text)
    } else if let Some(n) = value.as_f64() {
        StatsValue::Number(n)
    } else if let Some(b) = value.as_bool() {
        StatsValue::Bool(b)
    } else {
        StatsValue::Nested
    }
}

/// Turns a caught JS exception into a capability error.
fn threw(error: JsValue) -> CapabilityError {
    let message = error
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| error.as_string())
        .unwrap_or_else(|| format!("{error:?}"));
    CapabilityError::Threw(message)
}
