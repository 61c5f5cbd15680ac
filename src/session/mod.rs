//! Session-scoped conversation storage
//!
//! The chat service only needs "get the conversation for session X" and
//! "replace the conversation for session X". [`SessionStore`] captures that
//! contract; [`InMemorySessionStore`] is the process-local implementation
//! used by the server, with idle expiry. [`SessionLocks`] serializes
//! read-modify-write cycles per session.

use crate::chat::Conversation;
use crate::error::Result;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

/// Opaque session identity carried by the session cookie
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a fresh random identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a client-supplied identity if it is a well-formed UUID
    ///
    /// # Examples
    ///
    /// ```
    /// use tutorchat::session::SessionId;
    ///
    /// let id = SessionId::generate();
    /// assert_eq!(SessionId::parse(id.as_str()), Some(id));
    /// assert!(SessionId::parse("../../etc").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim())
            .ok()
            .map(|uuid| Self(uuid.to_string()))
    }

    /// String form, as stored in the cookie
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key-value store of conversations by session
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Conversation for a session; empty when none is stored
    async fn get(&self, id: &SessionId) -> Result<Conversation>;

    /// Replace the conversation for a session
    async fn put(&self, id: &SessionId, conversation: Conversation) -> Result<()>;

    /// Drop the conversation for a session entirely
    async fn remove(&self, id: &SessionId) -> Result<()>;

    /// Discard expired sessions, returning how many were removed
    async fn purge_expired(&self) -> Result<usize> {
        Ok(0)
    }
}

#[derive(Debug, Clone)]
struct StoredConversation {
    conversation: Conversation,
    last_access: DateTime<Utc>,
}

/// Process-local session store with optional idle expiry
///
/// # Examples
///
/// ```
/// use tutorchat::chat::Conversation;
/// use tutorchat::session::{InMemorySessionStore, SessionId, SessionStore};
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let store = InMemorySessionStore::new(None);
/// let id = SessionId::generate();
///
/// let mut conversation = Conversation::new();
/// conversation.push_user("hello");
/// store.put(&id, conversation).await.unwrap();
///
/// assert_eq!(store.get(&id).await.unwrap().len(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<SessionId, StoredConversation>>,
    ttl: Option<chrono::Duration>,
}

impl InMemorySessionStore {
    /// Create a store; `ttl` of `None` (or zero) never expires sessions
    pub fn new(ttl: Option<Duration>) -> Self {
        let ttl = ttl
            .filter(|ttl| !ttl.is_zero())
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok());
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Create a store from the `session.ttl_seconds` setting
    pub fn with_ttl_seconds(ttl_seconds: u64) -> Self {
        Self::new(Some(Duration::from_secs(ttl_seconds)))
    }

    fn is_expired(&self, entry: &StoredConversation, now: DateTime<Utc>) -> bool {
        match self.ttl {
            Some(ttl) => now - entry.last_access > ttl,
            None => false,
        }
    }

    /// Number of sessions currently held, expired or not
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether no sessions are held
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remove every session idle since before `now - ttl`
    pub async fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        before - entries.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &SessionId) -> Result<Conversation> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;

        let expired = match entries.get_mut(id) {
            Some(entry) if !self.is_expired(entry, now) => {
                entry.last_access = now;
                return Ok(entry.conversation.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            tracing::debug!("Session {} expired; starting a new conversation", id);
            entries.remove(id);
        }
        Ok(Conversation::new())
    }

    async fn put(&self, id: &SessionId, conversation: Conversation) -> Result<()> {
        self.entries.write().await.insert(
            id.clone(),
            StoredConversation {
                conversation,
                last_access: Utc::now(),
            },
        );
        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> Result<()> {
        self.entries.write().await.remove(id);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        Ok(self.purge_expired_at(Utc::now()).await)
    }
}

/// Per-session async locks
///
/// Holding the guard returned by [`SessionLocks::acquire`] gives exclusive
/// access to one session's read-modify-write cycle. Different sessions never
/// contend.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: std::sync::Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    /// Create an empty lock table
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`
    pub async fn acquire(&self, id: &SessionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.entry(id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Forget locks nobody is holding or waiting on
    pub fn prune(&self) -> usize {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - locks.len()
    }

    /// Number of sessions with a lock entry
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .map(|locks| locks.len())
            .unwrap_or_default()
    }

    /// Whether the lock table is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
