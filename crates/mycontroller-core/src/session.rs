//! Session context shared by every settings screen.
//!
//! The session context caches the server's global configuration and the
//! active language. It is passed explicitly through [`Services`] instead of
//! living in a global. Readers take snapshots; the only writer is the
//! post-save configuration refresh of the system controller, which is why
//! [`SessionHandle::apply_config`] is crate-private.
//!
//! [`Services`]: crate::services::Services

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use mycontroller_types::GlobalConfig;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::Result;
use crate::traits::SessionStore;

/// Key under which the session snapshot is persisted.
pub const SESSION_KEY: &str = "mchelper";

/// Cached configuration and language for the current session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Last global configuration fetched from the server.
    #[serde(default)]
    pub cfg: Option<GlobalConfig>,
    /// When `cfg` was last refreshed.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub refreshed_at: Option<OffsetDateTime>,
}

impl SessionContext {
    /// Active language id, if a configuration has been loaded.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.cfg.as_ref().map(|cfg| cfg.language_id.as_str())
    }
}

/// Shared handle to the session context.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<SessionContext>>,
}

impl SessionHandle {
    pub fn new(context: SessionContext) -> Self {
        Self {
            inner: Arc::new(RwLock::new(context)),
        }
    }

    /// Copy of the current context.
    #[must_use]
    pub fn snapshot(&self) -> SessionContext {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the cached configuration and return the updated context.
    pub(crate) fn apply_config(&self, cfg: GlobalConfig) -> SessionContext {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.cfg = Some(cfg);
        guard.refreshed_at = Some(OffsetDateTime::now_utc());
        guard.clone()
    }
}

/// Session store keeping snapshots in memory.
///
/// Used when a front end has nowhere to persist the session, and in tests to
/// count writes.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, SessionContext>>,
    writes: Mutex<usize>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last snapshot stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<SessionContext> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    /// Number of `put` calls so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        *self
            .writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn put(&self, key: &str, session: &SessionContext) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), session.clone());
        *self
            .writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
        Ok(())
    }
}
