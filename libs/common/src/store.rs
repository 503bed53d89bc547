//! Document-store contract required by the domain core
//!
//! Backends implement this trait so the core doesn't depend on any
//! specific database engine. Filters are field-equality matches only.
//!
//! Backends are expected to maintain three indexes:
//! - a unique index on `User.username`,
//! - a secondary index on `(Document.owner, Document.tags)`,
//! - a non-unique index on `SignupCode.code`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{Document, SignupCode, User};

/// Persistence collaborator for users, documents and signup codes.
///
/// Removal operations return the number of records removed instead of
/// failing on a missing record, so multi-step flows (account merging
/// in particular) can be safely re-run after an interruption.
#[async_trait]
pub trait Store: Send + Sync {
    // --- users ---

    /// Insert a new user. The unique username index rejects a
    /// duplicate with [`StoreError::Conflict`](crate::StoreError).
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Replace the record matched by `user.id`.
    async fn update_user(&self, user: &User) -> StoreResult<()>;

    /// Stamp a successful login: set last-login, zero the failure
    /// counter.
    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;

    /// Increment the failed-login counter.
    async fn record_failed_login(&self, id: Uuid) -> StoreResult<()>;

    /// Remove a user by id, returning how many records matched.
    async fn remove_user(&self, id: Uuid) -> StoreResult<u64>;

    // --- documents ---

    async fn insert_document(&self, doc: &Document) -> StoreResult<()>;

    /// Find one document matched by id and owner.
    async fn find_document(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Document>>;

    async fn find_documents_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Document>>;

    /// Replace the document matched by `doc.id` and `owner`.
    async fn update_document(&self, owner: Uuid, doc: &Document) -> StoreResult<()>;

    /// Rewrite owner and last-modified of the document matched by id
    /// and current owner, returning how many records matched.
    async fn set_document_owner(
        &self,
        id: Uuid,
        current_owner: Uuid,
        new_owner: Uuid,
        at: DateTime<Utc>,
    ) -> StoreResult<u64>;

    /// Bulk owner rewrite used by account merging, returning how many
    /// documents moved.
    async fn reassign_documents(&self, from_owner: Uuid, to_owner: Uuid) -> StoreResult<u64>;

    /// Remove the document matched by id and owner, returning how many
    /// records matched.
    async fn remove_document(&self, owner: Uuid, id: Uuid) -> StoreResult<u64>;

    // --- signup codes ---

    async fn insert_signup_code(&self, code: &SignupCode) -> StoreResult<()>;

    /// All codes sharing the given code string, oldest first. The code
    /// string is deliberately not unique.
    async fn find_signup_codes(&self, code: &str) -> StoreResult<Vec<SignupCode>>;

    /// Replace the record matched by `code.id`.
    async fn update_signup_code(&self, code: &SignupCode) -> StoreResult<()>;
}
