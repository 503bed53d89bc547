//! In-memory store backend
//!
//! Suitable for tests, development and single-process deployments.
//! State lives behind a single `tokio::sync::RwLock`; every operation
//! takes the lock for its full duration, which gives the same
//! per-record atomicity a real document store would.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{Document, SignupCode, User};
use crate::store::Store;

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    documents: HashMap<Uuid, Document>,
    // Vec keeps insertion order; the code string is not unique
    signup_codes: Vec<SignupCode>,
}

/// In-memory implementation of the [`Store`] contract.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        if state.users.contains_key(&user.id) {
            return Err(StoreError::Conflict);
        }
        // Unique username index
        if state.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict);
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let state = self.inner.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.inner.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, user: &User) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        if !state.users.contains_key(&user.id) {
            return Err(StoreError::NotFound);
        }
        if state
            .users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(StoreError::Conflict);
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        let user = state.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.last_login = Some(at);
        user.fails = 0;
        Ok(())
    }

    async fn record_failed_login(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        let user = state.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.fails += 1;
        Ok(())
    }

    async fn remove_user(&self, id: Uuid) -> StoreResult<u64> {
        let mut state = self.inner.write().await;
        Ok(u64::from(state.users.remove(&id).is_some()))
    }

    async fn insert_document(&self, doc: &Document) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        if state.documents.contains_key(&doc.id) {
            return Err(StoreError::Conflict);
        }
        state.documents.insert(doc.id, doc.clone());
        Ok(())
    }

    async fn find_document(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Document>> {
        let state = self.inner.read().await;
        Ok(state
            .documents
            .get(&id)
            .filter(|d| d.owner == owner)
            .cloned())
    }

    async fn find_documents_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Document>> {
        let state = self.inner.read().await;
        Ok(state
            .documents
            .values()
            .filter(|d| d.owner == owner)
            .cloned()
            .collect())
    }

    async fn update_document(&self, owner: Uuid, doc: &Document) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        match state.documents.get_mut(&doc.id) {
            Some(existing) if existing.owner == owner => {
                *existing = doc.clone();
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }

    async fn set_document_owner(
        &self,
        id: Uuid,
        current_owner: Uuid,
        new_owner: Uuid,
        at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let mut state = self.inner.write().await;
        match state.documents.get_mut(&id) {
            Some(doc) if doc.owner == current_owner => {
                doc.owner = new_owner;
                doc.last_modified = Some(at);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn reassign_documents(&self, from_owner: Uuid, to_owner: Uuid) -> StoreResult<u64> {
        let mut state = self.inner.write().await;
        let mut moved = 0;
        for doc in state.documents.values_mut() {
            if doc.owner == from_owner {
                doc.owner = to_owner;
                moved += 1;
            }
        }
        Ok(moved)
    }

    async fn remove_document(&self, owner: Uuid, id: Uuid) -> StoreResult<u64> {
        let mut state = self.inner.write().await;
        let owned = state.documents.get(&id).is_some_and(|d| d.owner == owner);
        if owned {
            state.documents.remove(&id);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn insert_signup_code(&self, code: &SignupCode) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        if state.signup_codes.iter().any(|c| c.id == code.id) {
            return Err(StoreError::Conflict);
        }
        state.signup_codes.push(code.clone());
        Ok(())
    }

    async fn find_signup_codes(&self, code: &str) -> StoreResult<Vec<SignupCode>> {
        let state = self.inner.read().await;
        Ok(state
            .signup_codes
            .iter()
            .filter(|c| c.code == code)
            .cloned()
            .collect())
    }

    async fn update_signup_code(&self, code: &SignupCode) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        match state.signup_codes.iter_mut().find(|c| c.id == code.id) {
            Some(existing) => {
                *existing = code.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}
