//! Account lifecycle: registration, login bookkeeping, credential
//! checks, and account merging

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use common::{Store, User};

use crate::credentials;
use crate::error::{CoreError, CoreResult, ignore_on_failure};
use crate::mailer::NotificationDispatcher;
use crate::validation::{validate_email, validate_username};

/// Length in bytes of the random email verification code.
const VERIFICATION_CODE_BYTES: usize = 35;

/// Set a new username after basic checking; the stored value is
/// normalized to lowercase. Uniqueness is enforced by the store's
/// unique index, not here. The user is left untouched on failure.
pub fn set_username(user: &mut User, username: &str) -> CoreResult<()> {
    validate_username(username)?;
    user.username = username.to_lowercase();
    Ok(())
}

/// Set the user's email after validation. The user is left untouched
/// on failure.
pub fn set_email(user: &mut User, address: &str) -> CoreResult<()> {
    validate_email(address)?;
    user.email = address.to_string();
    Ok(())
}

/// Set a new password, generating a fresh salt. Writes neither hash
/// nor salt when the length check fails. Doesn't check for
/// authentication.
pub fn set_password(user: &mut User, plaintext: &str) -> CoreResult<()> {
    let salt = credentials::generate_salt();
    let hash = credentials::hash_password(plaintext, &salt)?;
    user.salt = salt;
    user.password = hash;
    Ok(())
}

/// Coordinates account state changes against the store.
#[derive(Clone)]
pub struct AccountManager {
    store: Arc<dyn Store>,
    notifications: NotificationDispatcher,
}

impl AccountManager {
    /// Create a new account manager.
    pub fn new(store: Arc<dyn Store>, notifications: NotificationDispatcher) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Register a new account.
    ///
    /// Validates and normalizes the candidate's fields, derives the
    /// password hash from the entered password, stamps the
    /// verification code and last-login, and inserts the record. The
    /// confirmation email is queued fire-and-forget; a delivery
    /// failure never fails the registration. Returns the freshly
    /// stored record, re-read by username.
    pub async fn register(&self, candidate: User) -> CoreResult<User> {
        info!(username = %candidate.username, "registering new user");
        let mut user = candidate;

        let username = user.username.clone();
        set_username(&mut user, &username)?;
        let email = user.email.clone();
        set_email(&mut user, &email)?;
        let plaintext = std::mem::take(&mut user.entered_password);
        set_password(&mut user, &plaintext)?;

        user.is_registered = true;
        user.is_active = true;
        user.has_password = true;
        user.confirm_code = credentials::random_urlsafe(VERIFICATION_CODE_BYTES);
        user.last_login = Some(Utc::now());
        if user.id.is_nil() {
            user.id = Uuid::now_v7();
        }

        self.store.insert_user(&user).await?;
        self.notifications.dispatch_confirmation(&user);

        self.store
            .find_user_by_username(&user.username)
            .await?
            .ok_or(CoreError::NotFound)
    }

    /// Mark a user officially authenticated: zero the failure counter
    /// and stamp last-login. A persistence failure surfaces as a
    /// recoverable error.
    pub async fn login(&self, user: &User) -> CoreResult<()> {
        self.store.record_login(user.id, Utc::now()).await?;
        Ok(())
    }

    /// Count a failed login attempt. Best-effort telemetry under the
    /// ignore-on-failure policy; no lockout hangs off this counter.
    pub async fn record_failed_login(&self, user: &User) {
        ignore_on_failure(
            self.store.record_failed_login(user.id).await,
            "record_failed_login",
        );
    }

    /// Check the entered password against the stored credentials,
    /// reloading the authoritative record by username first so a stale
    /// in-memory copy can't be attacked. Returns the reloaded record.
    pub async fn check_password(&self, user: &User) -> CoreResult<User> {
        let stored = self
            .store
            .find_user_by_username(&user.username)
            .await?
            .ok_or(CoreError::NotFound)?;
        credentials::verify_password(&user.entered_password, &stored.salt, &stored.password)?;
        Ok(stored)
    }

    /// Look up a user by the textual form of its id. A malformed id is
    /// rejected before any storage round-trip.
    pub async fn get_user_by_id(&self, id: &str) -> CoreResult<User> {
        let id = Uuid::parse_str(id).map_err(|_| CoreError::InvalidId(id.to_string()))?;
        self.store
            .find_user_by_id(id)
            .await?
            .ok_or(CoreError::NotFound)
    }

    /// Look up a user by username.
    pub async fn get_user_by_name(&self, username: &str) -> CoreResult<User> {
        self.store
            .find_user_by_username(username)
            .await?
            .ok_or(CoreError::NotFound)
    }

    /// Reconcile two records believed to represent the same person,
    /// preferring the primary's values and falling back to the
    /// secondary's field by field. Every document owned by the
    /// secondary moves to the primary, the secondary record is
    /// deleted, and the merged primary is persisted — in that fixed
    /// order, each step safe to re-run after an interruption so a
    /// crash mid-merge cannot orphan documents.
    pub async fn merge_and_clean(&self, primary: &User, secondary: &User) -> CoreResult<User> {
        info!(primary = %primary.id, secondary = %secondary.id, "merging accounts");
        let mut merged = primary.clone();

        if merged.is_anonymous() {
            merged.username = secondary.username.clone();
        }
        if merged.name.is_empty() {
            merged.name = secondary.name.clone();
        }
        if merged.location.is_empty() {
            merged.location = secondary.location.clone();
        }
        if merged.url.is_empty() {
            merged.url = secondary.url.clone();
        }
        if merged.email.is_empty() || (!merged.email_verified && secondary.email_verified) {
            merged.email = secondary.email.clone();
            merged.email_verified = secondary.email_verified;
        }
        if !merged.has_password && secondary.has_password {
            merged.has_password = true;
            merged.password = secondary.password.clone();
            merged.salt = secondary.salt.clone();
        }
        if merged.oauth_sub.is_empty() {
            merged.oauth_sub = secondary.oauth_sub.clone();
        }
        if secondary.last_login > merged.last_login {
            merged.last_login = secondary.last_login;
        }
        merged.is_registered = merged.is_registered || secondary.is_registered;

        if !secondary.id.is_nil() {
            self.store
                .reassign_documents(secondary.id, merged.id)
                .await?;
            self.store.remove_user(secondary.id).await?;
        }
        self.store.update_user(&merged).await?;
        Ok(merged)
    }
}
