// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`PreferenceStore`] over `localStorage`.

use alloc::string::String;

use web_sys::Storage;
use ytspeed_core::backend::PreferenceStore;

/// The window's `localStorage`.
///
/// Storage can be missing (sandboxed frames) or refuse access (privacy
/// modes); both read as empty and drop writes.
pub struct LocalPreferences {
    storage: Option<Storage>,
}

impl core::fmt::Debug for LocalPreferences {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocalPreferences")
            .field("available", &self.storage.is_some())
            .finish()
    }
}

impl LocalPreferences {
    /// Opens the current window's `localStorage`.
    #[must_use]
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }
}

impl PreferenceStore for LocalPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.set_item(key, value);
        }
    }
}
