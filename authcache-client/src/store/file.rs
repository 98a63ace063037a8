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

//! JSON-file store for native targets.
//!
//! All keys live in one JSON object (`{"user": "...", ...}`). Every write
//! rewrites the file through a temporary sibling and a rename, so a crash
//! never leaves a half-written file behind. On Unix the file is created
//! owner-only (0600) since it holds bearer tokens and PKCE verifiers.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::SessionStore;

const APP_DIR: &str = "authcache";
const FILE_NAME: &str = "session.json";

/// Owner read/write (Unix only).
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `<data dir>/authcache/session.json`, if the platform has a data dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(APP_DIR).join(FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entries. A missing file is empty and unparseable JSON is
    /// ignored (it gets replaced on the next write); any other read error is
    /// returned so callers do not clobber a file they could not read.
    fn load(&self) -> io::Result<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e),
        };
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!(
                "Session store {} is not valid JSON, ignoring it: {e}",
                self.path.display()
            );
            BTreeMap::new()
        }))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        // The mode only applies on creation, so never reuse a leftover.
        match fs::remove_file(&tmp) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
            _ => {}
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(FILE_MODE);
        }
        let mut file = options.open(&tmp)?;
        file.write_all(body.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) {
        let _guard = self.lock.lock();
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!(
                    "Failed to read session store {}, not writing: {e}",
                    self.path.display()
                );
                return;
            }
        };
        f(&mut entries);
        if let Err(e) = self.save(&entries) {
            log::warn!("Failed to write session store {}: {e}", self.path.display());
        }
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock();
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                log::warn!("Failed to read session store {}: {e}", self.path.display());
                None
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        let _guard = self.lock.lock();
        self.load()
            .map(|entries| entries.into_keys().collect())
            .unwrap_or_default()
    }

    fn set(&self, key: &str, value: &str) {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn delete(&self, key: &str) {
        self.update(|entries| {
            entries.remove(key);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        assert_eq!(store.get("user"), None);
    }

    #[test]
    fn values_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileStore::new(&path).set("user", r#"{"id_token":"t"}"#);
        FileStore::new(&path).set("other", "x");

        let store = FileStore::new(&path);
        assert_eq!(store.get("user").as_deref(), Some(r#"{"id_token":"t"}"#));
        assert_eq!(store.get("other").as_deref(), Some("x"));

        store.delete("user");
        assert_eq!(FileStore::new(&path).get("user"), None);
        assert_eq!(FileStore::new(&path).get("other").as_deref(), Some("x"));
    }

    #[test]
    fn corrupt_file_reads_as_empty_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("user"), None);

        store.set("user", "v");
        assert_eq!(store.get("user").as_deref(), Some("v"));
    }

    #[test]
    fn unreadable_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let original = [0xff, 0xfe, 0x00, 0x7b];
        fs::write(&path, original).unwrap();

        let store = FileStore::new(&path);
        store.set("user", "v");
        store.delete("other");

        assert_eq!(fs::read(&path).unwrap(), original);
        assert_eq!(store.get("user"), None);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn keys_lists_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        store.set("user", "u");
        store.set("oidc.abc", "p");
        assert_eq!(store.keys(), vec!["oidc.abc".to_string(), "user".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileStore::new(&path);
        store.set("user", r#"{"id_token":"t"}"#);
        store.set("user", r#"{"id_token":"t2"}"#);

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
