//! In-memory store for development and tests.

use crate::ports::{CallStore, StoreError, UserStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Call, Credentials, Recording, User};
use std::sync::atomic::{AtomicBool, Ordering};

/// Users, calls and recordings held in process memory.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<(User, String)>>,
    calls: RwLock<Vec<Call>>,
    recordings: RwLock<Vec<Recording>>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with a plaintext password.
    pub fn add_user(&self, user: User, password: impl Into<String>) {
        self.users.write().push((user, password.into()));
    }

    pub fn add_call(&self, call: Call) {
        self.calls.write().push(call);
    }

    pub fn add_recording(&self, recording: Recording) {
        self.recordings.write().push(recording);
    }

    /// Make every operation fail as if the store were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("in-memory store marked unavailable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_user(&self, credentials: &Credentials) -> Result<Option<User>, StoreError> {
        self.check_available()?;
        Ok(self
            .users
            .read()
            .iter()
            .find(|(user, password)| {
                user.username == credentials.username && *password == credentials.password
            })
            .map(|(user, _)| user.clone()))
    }
}

#[async_trait]
impl CallStore for InMemoryStore {
    async fn list_calls(&self, limit: u32) -> Result<Vec<Call>, StoreError> {
        self.check_available()?;
        Ok(self.calls.read().iter().take(limit as usize).cloned().collect())
    }

    async fn list_recordings(&self, limit: u32) -> Result<Vec<Recording>, StoreError> {
        self.check_available()?;
        Ok(self
            .recordings
            .read()
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
