//! In-process backend used by tests and local development.
//!
//! Each service mirrors the hosted behaviour closely enough for handler
//! tests: inserts get a fresh id and timestamp, storage refuses to
//! overwrite, and sessions are opaque tokens. Failure switches let tests
//! simulate an outage of one operation at a time.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use playora_core::catalog::{newest_first, CatalogQuery};
use playora_core::game::{Game, NewGame};
use playora_core::status::GameStatus;
use tokio::sync::RwLock;

use crate::auth::{AuthProvider, Credentials, Session, SessionUser};
use crate::error::BackendError;
use crate::records::RecordStore;
use crate::storage::{public_object_url, ObjectStore};
use crate::Backend;

/// Message GoTrue returns for a wrong email/password pair.
pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";

/// Lifetime reported for in-memory sessions.
const SESSION_TTL_SECS: i64 = 3600;

fn outage(operation: &str) -> BackendError {
    BackendError::Api {
        status: 503,
        message: format!("simulated {operation} outage"),
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryRecords {
    games: RwLock<Vec<Game>>,
    fail_reads: AtomicBool,
    fail_inserts: AtomicBool,
    fail_updates: AtomicBool,
    deny_updates: AtomicBool,
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records as-is, keeping their ids and timestamps.
    pub async fn seed(&self, games: impl IntoIterator<Item = Game>) {
        self.games.write().await.extend(games);
    }

    /// Snapshot of every stored record, in insertion order.
    pub async fn snapshot(&self) -> Vec<Game> {
        self.games.read().await.clone()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Make updates match no rows, as a row policy denying the write does.
    pub fn set_deny_updates(&self, deny: bool) {
        self.deny_updates.store(deny, Ordering::SeqCst);
    }

    /// Delete a record behind every reader's back.
    pub async fn remove(&self, id: &str) {
        self.games.write().await.retain(|g| g.id != id);
    }

    fn check_reads(&self) -> Result<(), BackendError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(outage("read"));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecords {
    async fn list_catalog(&self, query: &CatalogQuery) -> Result<Vec<Game>, BackendError> {
        self.check_reads()?;
        Ok(query.apply(self.games.read().await.clone()))
    }

    async fn list_all(&self, _access_token: &str) -> Result<Vec<Game>, BackendError> {
        self.check_reads()?;
        let mut games = self.games.read().await.clone();
        newest_first(&mut games);
        Ok(games)
    }

    async fn get(&self, id: &str) -> Result<Option<Game>, BackendError> {
        self.check_reads()?;
        Ok(self.games.read().await.iter().find(|g| g.id == id).cloned())
    }

    async fn insert(&self, game: &NewGame) -> Result<Game, BackendError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(outage("insert"));
        }
        let stored = Game {
            id: uuid::Uuid::new_v4().to_string(),
            title: game.title.clone(),
            description: game.description.clone(),
            category: game.category,
            thumbnail_url: Some(game.thumbnail_url.clone()),
            game_url: game.game_url.clone(),
            developer_email: Some(game.developer_email.clone()),
            status: game.status(),
            created_at: Utc::now(),
        };
        self.games.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn update_status(
        &self,
        id: &str,
        status: GameStatus,
        _access_token: &str,
    ) -> Result<Game, BackendError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(outage("update"));
        }
        if self.deny_updates.load(Ordering::SeqCst) {
            return Err(BackendError::NotFound);
        }
        let mut games = self.games.write().await;
        let game = games
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(BackendError::NotFound)?;
        game.status = status;
        Ok(game.clone())
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        self.check_reads()
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// A stored object: content type and bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct InMemoryStorage {
    base_url: String,
    bucket: String,
    objects: RwLock<HashMap<String, StoredObject>>,
    fail_uploads: AtomicBool,
}

impl InMemoryStorage {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
            fail_uploads: AtomicBool::new(false),
        }
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn get(&self, name: &str) -> Option<StoredObject> {
        self.objects.read().await.get(name).cloned()
    }
}

#[async_trait]
impl ObjectStore for InMemoryStorage {
    async fn upload(
        &self,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), BackendError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(outage("upload"));
        }
        let mut objects = self.objects.write().await;
        if objects.contains_key(name) {
            return Err(BackendError::Api {
                status: 409,
                message: "The resource already exists".into(),
            });
        }
        objects.insert(
            name.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        public_object_url(&self.base_url, &self.bucket, name)
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryAuth {
    users: HashMap<String, (String, SessionUser)>,
    sessions: RwLock<HashMap<String, SessionUser>>,
    fail_sign_out: AtomicBool,
}

impl InMemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reviewer account.
    pub fn with_user(mut self, email: &str, password: &str) -> Self {
        let user = SessionUser {
            id: uuid::Uuid::new_v4().to_string(),
            email: Some(email.to_string()),
        };
        self.users
            .insert(email.to_string(), (password.to_string(), user));
        self
    }

    pub fn set_fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuth {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, BackendError> {
        let user = match self.users.get(&credentials.email) {
            Some((password, user)) if *password == credentials.password => user.clone(),
            _ => return Err(BackendError::Rejected(INVALID_CREDENTIALS.into())),
        };
        let access_token = uuid::Uuid::new_v4().to_string();
        self.sessions
            .write()
            .await
            .insert(access_token.clone(), user.clone());
        Ok(Session {
            access_token,
            refresh_token: uuid::Uuid::new_v4().to_string(),
            expires_in: SESSION_TTL_SECS,
            user,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(outage("sign-out"));
        }
        self.sessions.write().await.remove(access_token);
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<SessionUser>, BackendError> {
        Ok(self.sessions.read().await.get(access_token).cloned())
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// Concrete handles to every in-memory service, so tests can seed data and
/// flip failure switches while the same services sit behind a [`Backend`].
#[derive(Clone)]
pub struct InMemoryBackend {
    pub records: Arc<InMemoryRecords>,
    pub storage: Arc<InMemoryStorage>,
    pub auth: Arc<InMemoryAuth>,
}

impl InMemoryBackend {
    pub fn new(auth: InMemoryAuth) -> Self {
        Self {
            records: Arc::new(InMemoryRecords::new()),
            storage: Arc::new(InMemoryStorage::new("http://storage.test", "thumbnails")),
            auth: Arc::new(auth),
        }
    }

    pub fn backend(&self) -> Backend {
        Backend {
            records: self.records.clone(),
            storage: self.storage.clone(),
            auth: self.auth.clone(),
        }
    }
}
