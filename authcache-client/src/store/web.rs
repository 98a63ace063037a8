/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Browser `window.localStorage` store.

use super::SessionStore;

/// Store backed by `window.localStorage`.
///
/// The storage handle is looked up on every call, so the type holds no JS
/// values and stays `Send + Sync`. Outside a window (e.g. in a worker) every
/// read is a miss and writes are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl SessionStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|storage| storage.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("localStorage rejected write for key {key}");
            }
        }
    }

    fn delete(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            if storage.remove_item(key).is_err() {
                log::warn!("localStorage rejected delete for key {key}");
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        let Some(storage) = Self::storage() else {
            return Vec::new();
        };
        let len = storage.length().unwrap_or_default();
        (0..len)
            .filter_map(|i| storage.key(i).ok().flatten())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn set_get_delete_and_list_keys() {
        let store = LocalStorageStore::new();
        store.set("oidc.test", "p");
        assert_eq!(store.get("oidc.test").as_deref(), Some("p"));
        assert!(store.keys().contains(&"oidc.test".to_string()));

        store.delete("oidc.test");
        assert_eq!(store.get("oidc.test"), None);
        assert!(!store.keys().contains(&"oidc.test".to_string()));

        // Deleting a missing key is not an error.
        store.delete("oidc.test");
    }
}
