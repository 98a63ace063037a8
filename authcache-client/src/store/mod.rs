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

//! Durable key-value stores backing the session cache.
//!
//! A store maps string keys to string values. Operations never fail from the
//! caller's point of view: implementations log and swallow I/O errors, and a
//! value that cannot be read is reported as absent.

mod file;
mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

use std::sync::Arc;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

/// Get/set/delete over string keys.
///
/// Methods take `&self` so one store can be shared (behind an [`Arc`])
/// between the session cache and the login flow.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn delete(&self, key: &str);
    /// Every key currently held, in no particular order.
    fn keys(&self) -> Vec<String>;
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) {
        (**self).delete(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}
