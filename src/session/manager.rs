//! Session Manager
//!
//! Maps project/session identifiers to their memory stores. The manager is
//! caller-owned and passed explicitly; holding the map behind `Arc<Mutex>`
//! only serializes registry access. Per-store single-writer discipline
//! remains the host's responsibility.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{MemoryError, Result};
use crate::memory::{MemoryConfig, MemoryStore};

/// A project session and its memory store
#[derive(Debug, Clone)]
pub struct ProjectSession {
    /// Project/session ID
    pub project_id: String,
    /// Creation timestamp
    pub created_at: u64,
    /// Last accessed timestamp
    pub last_accessed: u64,
    /// Conversation memory for this project
    pub store: MemoryStore,
}

impl ProjectSession {
    pub fn new(project_id: String, config: MemoryConfig) -> Self {
        let now = now_secs();
        Self {
            store: MemoryStore::with_config(project_id.clone(), config),
            project_id,
            created_at: now,
            last_accessed: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_accessed = now_secs();
    }
}

/// Manager for multiple project sessions
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<String, ProjectSession>>>,
    store_config: MemoryConfig,
    /// Maximum session age in seconds (default: 1 hour)
    max_session_age: u64,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::with_config(MemoryConfig::default())
    }

    pub fn with_config(store_config: MemoryConfig) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            store_config,
            max_session_age: 3600, // 1 hour
        }
    }

    pub fn with_max_age(mut self, max_age_secs: u64) -> Self {
        self.max_session_age = max_age_secs;
        self
    }

    /// Restores an existing session or creates a new one, returning its id.
    /// Generated ids are short uuid prefixes, unique within this manager.
    pub fn open(&self, restore_id: Option<&str>) -> String {
        let mut sessions = self.sessions.lock().unwrap();

        if let Some(id) = restore_id {
            if let Some(session) = sessions.get_mut(id) {
                session.touch();
                return session.project_id.clone();
            }
            // Caller asked for a specific id; register it as-is.
            let session = ProjectSession::new(id.to_string(), self.store_config);
            sessions.insert(id.to_string(), session);
            tracing::debug!(project_id = %id, "opened named project session");
            return id.to_string();
        }

        let mut id = short_id();
        while sessions.contains_key(&id) {
            id = short_id();
        }
        let session = ProjectSession::new(id.clone(), self.store_config);
        sessions.insert(id.clone(), session);
        tracing::debug!(project_id = %id, "opened generated project session");
        id
    }

    /// Runs `f` against a session's store read-only.
    pub fn with_store<T>(&self, id: &str, f: impl FnOnce(&MemoryStore) -> T) -> Result<T> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| MemoryError::ProjectNotFound(id.to_string()))?;
        session.touch();
        Ok(f(&session.store))
    }

    /// Runs `f` against a session's store with mutable access.
    pub fn with_store_mut<T>(&self, id: &str, f: impl FnOnce(&mut MemoryStore) -> T) -> Result<T> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| MemoryError::ProjectNotFound(id.to_string()))?;
        session.touch();
        Ok(f(&mut session.store))
    }

    /// Close a session, discarding its store
    pub fn close(&self, id: &str) -> bool {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.remove(id).is_some()
    }

    /// Clean up expired sessions
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.lock().unwrap();
        let now = now_secs();

        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| now - s.last_accessed > self.max_session_age)
            .map(|(id, _)| id.clone())
            .collect();

        let count = expired.len();
        for id in expired {
            sessions.remove(&id);
        }
        if count > 0 {
            tracing::debug!(removed = count, "cleaned up expired project sessions");
        }
        count
    }

    /// Get session count
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn short_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}
