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

//! The session cache: at most one [`SessionRecord`] under one store key.
//!
//! The presence of a parseable record is the only "signed in" signal. There
//! is no expiry check and no signature verification here; both belong to the
//! identity provider.

use std::fmt;
use std::sync::Arc;

use authcache_types::SessionRecord;

use crate::store::SessionStore;

/// Store key holding the serialized session record.
pub const SESSION_KEY: &str = "user";

/// A single mutable slot holding the current user's session.
///
/// Cloning is cheap and clones share the same store.
#[derive(Clone)]
pub struct SessionCache {
    store: Arc<dyn SessionStore>,
    key: String,
}

impl fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCache").field("key", &self.key).finish()
    }
}

impl SessionCache {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::with_key(store, SESSION_KEY)
    }

    /// Use a key other than [`SESSION_KEY`], e.g. when several apps share
    /// one store.
    pub fn with_key(store: Arc<dyn SessionStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Read and parse the stored record.
    ///
    /// A malformed value is a miss, not an error.
    pub fn get_record(&self) -> Option<SessionRecord> {
        let raw = self.store.get(&self.key)?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Ignoring malformed session record under {:?}: {e}", self.key);
                None
            }
        }
    }

    /// Overwrite the stored record.
    pub fn set_record(&self, record: &SessionRecord) {
        match serde_json::to_string(record) {
            Ok(raw) => {
                log::debug!("Storing session record under {:?}", self.key);
                self.store.set(&self.key, &raw);
            }
            Err(e) => log::warn!("Failed to serialize session record: {e}"),
        }
    }

    pub fn clear_record(&self) {
        log::debug!("Clearing session record under {:?}", self.key);
        self.store.delete(&self.key);
    }

    pub fn is_signed_in(&self) -> bool {
        self.get_record().is_some()
    }

    /// Email, else username claim, else `""`.
    pub fn display_name(&self) -> String {
        self.get_record()
            .and_then(|r| r.profile.display_name().map(str::to_string))
            .unwrap_or_default()
    }

    /// The stored `id_token` verbatim, or `""` when signed out.
    pub fn bearer_token(&self) -> String {
        self.get_record().map(|r| r.id_token).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use authcache_types::Profile;

    fn cache() -> (Arc<MemoryStore>, SessionCache) {
        let store = Arc::new(MemoryStore::new());
        let cache = SessionCache::new(store.clone());
        (store, cache)
    }

    #[test]
    fn set_then_get_returns_the_same_record() {
        let (_, cache) = cache();
        let mut record = SessionRecord::new("tok123", Profile::with_email("a@b.com"));
        record.access_token = Some("at".to_string());
        record
            .profile
            .claims
            .insert("custom:tenant".to_string(), serde_json::json!("acme"));

        cache.set_record(&record);
        assert_eq!(cache.get_record(), Some(record));
    }

    #[test]
    fn writing_overwrites_the_previous_record() {
        let (store, cache) = cache();
        cache.set_record(&SessionRecord::new("first", Profile::with_email("a@b.com")));
        cache.set_record(&SessionRecord::new("second", Profile::with_email("c@d.com")));

        assert_eq!(cache.bearer_token(), "second");
        assert_eq!(cache.display_name(), "c@d.com");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_signs_out() {
        let (_, cache) = cache();
        cache.set_record(&SessionRecord::new("tok", Profile::default()));
        assert!(cache.is_signed_in());

        cache.clear_record();
        assert_eq!(cache.get_record(), None);
        assert!(!cache.is_signed_in());
    }

    #[test]
    fn malformed_value_is_a_miss() {
        let (store, cache) = cache();
        store.set(SESSION_KEY, "definitely not json");
        assert_eq!(cache.get_record(), None);
        assert!(!cache.is_signed_in());
        assert_eq!(cache.bearer_token(), "");
    }

    #[test]
    fn stored_json_scenario() {
        let (store, cache) = cache();
        store.set(
            SESSION_KEY,
            r#"{"profile":{"email":"a@b.com"},"id_token":"tok123"}"#,
        );
        assert!(cache.is_signed_in());
        assert_eq!(cache.display_name(), "a@b.com");
        assert_eq!(cache.bearer_token(), "tok123");
    }

    #[test]
    fn empty_store_scenario() {
        let (_, cache) = cache();
        assert!(!cache.is_signed_in());
        assert_eq!(cache.display_name(), "");
        assert_eq!(cache.bearer_token(), "");
    }

    #[test]
    fn display_name_uses_cognito_username_without_email() {
        let (store, cache) = cache();
        store.set(
            SESSION_KEY,
            r#"{"profile":{"cognito:username":"alice"},"id_token":"t"}"#,
        );
        assert_eq!(cache.display_name(), "alice");
    }

    #[test]
    fn bearer_token_is_not_transformed() {
        let (_, cache) = cache();
        let token = "eyJhbGciOiJSUzI1NiJ9.e30.sig with spaces ";
        cache.set_record(&SessionRecord::new(token, Profile::default()));
        assert_eq!(cache.bearer_token(), token);
    }

    #[test]
    fn custom_key_isolates_records() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let a = SessionCache::new(store.clone());
        let b = SessionCache::with_key(store.clone(), "admin-user");

        a.set_record(&SessionRecord::new("a", Profile::default()));
        assert!(!b.is_signed_in());
        assert_eq!(store.get("admin-user"), None);
    }
}
